//! Error type shared by every layer of the crate.
//!
//! Errors fall into three classes:
//!
//! - **configuration** errors (bad lexicon data, negative-weight cycles, a
//!   fallback that does not dominate) are raised while grammars are built and
//!   are fatal for that configuration;
//! - **input** errors (`OutOfAlphabet`) are raised by `normalize` for text that
//!   the compiled grammars cannot even read;
//! - **cache** errors are reported to the caller of the archive functions, but
//!   the normalizer itself logs them and rebuilds.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("lexicon table `{table}` line {line}: {reason}")]
    Lexicon { table: String, line: usize, reason: String },

    #[error("lexicon has no table named `{0}`")]
    MissingTable(String),

    #[error("lexicon table `{table}` has no entry for `{key}`")]
    MissingEntry { table: String, key: String },

    #[error("grammar `{grammar}` contains a negative-weight cycle through state {state}")]
    NegativeCycle { grammar: String, state: usize },

    #[error(
        "fallback weight {fallback} does not dominate the combined worst-case weight {worst} of the real categories"
    )]
    FallbackNotDominant { fallback: f32, worst: f32 },

    #[error("character {ch:?} at offset {offset} is outside the grammar alphabet")]
    OutOfAlphabet { ch: char, offset: usize },

    #[error("no path through the `{graph}` graph for input {input:?}")]
    NoPath { graph: String, input: String },

    #[error("malformed token stream near {0:?}")]
    MalformedTokens(String),

    #[error("no verbalizer registered for category `{0}`")]
    UnknownCategory(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("unsupported language `{0}`")]
    UnsupportedLanguage(String),

    #[error("cache archive {path}: {reason}")]
    Cache { path: PathBuf, reason: String },

    #[error("failed to read or write file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to (de)serialize archive: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
