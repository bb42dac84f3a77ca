//! Build and run metrics.
//!
//! This module defines a small set of structs used to observe and debug
//! engine performance.
//!
//! The intended usage is:
//!
//! - `Engine::build` returns [`BuildMetrics`] once per configuration.
//! - `Engine::run` returns [`RunMetrics`] per input, alongside the tokens.
//!
//! ## Design notes
//!
//! - `GrammarMetrics` is collected for every category, including ones that
//!   never win on a given input.
//! - A restored archive has no per-grammar timings; only `total` is set.

use crate::priority::Priority;
use crate::token::Token;
use std::time::Duration;

// --- Build -------------------------------------------------------------------

#[derive(Debug, Default, Clone)]
pub struct BuildMetrics {
    /// Total elapsed time for constructing (or restoring) the engine.
    pub total: Duration,
    /// Whether the graphs came from a cache archive.
    pub restored: bool,
    /// Per-category statistics, in declaration order.
    pub grammars: Vec<GrammarMetrics>,
    /// Time spent compiling the preprocessing cascade.
    pub cascade: Duration,
    /// Size of the whole-sentence graph.
    pub sentence_states: usize,
    pub sentence_arcs: usize,
    /// Combined worst-case weight of the ranked categories, which the
    /// fallback weight must exceed.
    pub worst_case_total: f32,
}

/// Size, bound and build time of one category grammar.
#[derive(Debug, Clone)]
pub struct GrammarMetrics {
    pub category: &'static str,
    pub priority: Priority,
    pub states: usize,
    pub arcs: usize,
    /// Worst-case path weight, biases excluded.
    pub worst_case: f32,
    pub duration: Duration,
}

// --- Run ---------------------------------------------------------------------

#[derive(Debug, Default, Clone)]
pub struct RunMetrics {
    /// Total elapsed time for `Engine::run`.
    pub total: Duration,
    /// Time spent in the preprocessing cascade.
    pub preprocess: Duration,
    /// Composition with the sentence graph plus shortest-path decoding.
    pub classify: Duration,
    /// Per-token verbalization and joining.
    pub verbalize: Duration,
}

/// Engine output bundled with timing information.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Input after the preprocessing cascade.
    pub preprocessed: String,
    /// Tokens chosen by the decoder.
    pub tokens: Vec<Token>,
    /// Final spoken text.
    pub spoken: String,
    /// Timing measurements for the run.
    pub metrics: RunMetrics,
}
