//! Weighted finite-state transducers over the tropical semiring.
//!
//! This module is the algebra every grammar in the crate is written in.
//!
//! ```text
//!   constructors          accept, cross, insert, delete, string_map, any_of
//!        │
//!        v
//!   rational ops          a | b, a + b, closure, plus, optional, repeat,
//!        │                add_weight, invert, project, difference
//!        v
//!   composition           a.compose(&b)            (compose.rs)
//!        │
//!        v
//!   optimize              rm_epsilon -> determinize_encoded -> connect -> arc sort
//!        │
//!        v
//!   decoding              shortest_path / apply / best_output
//! ```
//!
//! ## Invariants
//!
//! - Labels are Unicode scalar values; `0` is epsilon.
//! - Weights are costs: they add along a path and the minimum wins.
//! - No algorithm iterates a hash map to produce output; arc order is always
//!   insertion order or an explicit sort, so every construction is reproducible.
//! - Negative-weight cycles are rejected by [`check_negative_cycles`] before a
//!   graph is used for decoding.

#[path = "fst/alphabet.rs"]
mod alphabet;
#[path = "fst/compose.rs"]
mod compose;
#[path = "fst/connect.rs"]
mod connect;
#[path = "fst/determinize.rs"]
mod determinize;
#[path = "fst/dfa.rs"]
mod dfa;
#[path = "fst/difference.rs"]
mod difference;
#[path = "fst/ops.rs"]
mod ops;
#[path = "fst/optimize.rs"]
mod optimize;
#[path = "fst/props.rs"]
mod props;
#[path = "fst/rmepsilon.rs"]
mod rmepsilon;
#[path = "fst/shortest.rs"]
mod shortest;
#[path = "fst/vector.rs"]
mod vector;
#[path = "fst/verify.rs"]
mod verify;
#[path = "fst/weight.rs"]
mod weight;

pub use alphabet::Alphabet;
pub(crate) use dfa::Dfa;
pub use ops::ProjectType;
pub use props::FstProperties;
pub use shortest::BestPath;
pub use vector::{Arc, EPSILON, Fst, Label, StateId, label, label_char};
pub use verify::{check_negative_cycles, worst_case_weight};
pub use weight::Weight;
