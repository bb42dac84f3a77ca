//! Text normalization with weighted finite-state grammars.
//!
//! Written text goes in, spoken words come out:
//!
//! ```text
//! "I have $5."          -> "I have five dollars."
//! "call 555-1234"       -> "call five five five, one two three four"
//! "1+2"                 -> "one plus two"
//! ```
//!
//! Every category (cardinal, date, money, ...) is a pair of transducers: a
//! classifier that maps raw text to a token and a verbalizer that maps the
//! token to words. The engine unions the classifiers under named priorities,
//! picks the cheapest tokenization of the whole input and verbalizes each
//! token.
//!
//! See [`Normalizer`] for the entry point and [`NormalizerConfig`] for the
//! knobs.

#[macro_use]
mod macros;

mod api;
pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod fst;
pub mod grammar;
pub mod lexicon;
pub mod priority;
pub mod rewrite;
pub mod rules;
pub mod token;

pub use api::{NormalizeDetails, Normalizer, normalize, normalizer_for};
pub use config::{InputCase, NormalizerConfig};
pub use engine::{BuildMetrics, Engine, GrammarMetrics, RunMetrics};
pub use error::{Error, Result};
pub use lexicon::Lexicon;
pub use priority::Priority;
pub use token::Token;
