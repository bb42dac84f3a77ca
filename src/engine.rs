//! Classification, tokenization and verbalization engine.
//!
//! ## How the parts work together
//!
//! At a high level, normalizing an input string is a pipeline:
//!
//! ```text
//! category grammars ──┐
//!                     │  classify_union            (classify.rs)
//!                     │    - negative-cycle check per grammar
//!                     │    - worst-case bound, fallback dominance
//!                     │    - token markers + priority bias
//!                     v
//!              build_sentence_graph                (tokenize.rs)
//!                     │
//! input ── RewriteCascade::apply ──┐
//!          (preprocessing)         │
//!                                  v
//!                          decode (decode.rs)
//!                            - compose input with the sentence graph
//!                            - shortest path, parse tokens
//!                                  │
//!                                  v
//!                    CompiledVerbalizer::verbalize per token
//!                                  │
//!                                  v
//!                            join -> spoken text
//! ```
//!
//! Selection is global: the decoder minimizes the total weight over the whole
//! input, so a locally dearer reading can win when it makes the sentence
//! cheaper overall.
//!
//! ## Responsibilities by module
//!
//! - `classify.rs`: verifies each category and builds the weighted union.
//! - `tokenize.rs`: wraps the union with whitespace and punctuation handling.
//! - `decode.rs`: shortest-path decoding, field reordering, verbalization and
//!   joining. Punctuation tokens carry the whitespace written around them,
//!   so the spoken text keeps the input's spacing.
//! - `metrics.rs`: build and run timings.
//!
//! ## Debugging
//!
//! Run with `RUST_LOG=spokenform=trace` to see each rewrite that fires and
//! the raw token stream the decoder picks.

#[path = "engine/classify.rs"]
mod classify;
#[path = "engine/decode.rs"]
mod decode;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/tokenize.rs"]
mod tokenize;

pub use decode::CompiledVerbalizer;
pub use metrics::{BuildMetrics, GrammarMetrics, RunMetrics, RunResult};

use crate::error::{Error, Result};
use crate::fst::{Alphabet, Fst, check_negative_cycles};
use crate::grammar::GrammarContext;
use crate::rewrite::RewriteCascade;
use crate::rules;
use crate::token::Token;
use std::collections::BTreeMap;
use std::time::Instant;

/// Compiled graphs of one configuration. Immutable once built.
#[derive(Debug, Clone)]
pub struct Engine {
    alphabet: Alphabet,
    cascade: RewriteCascade,
    tokenizer: Fst,
    verbalizers: BTreeMap<String, CompiledVerbalizer>,
}

impl Engine {
    /// Builds every grammar, checks them and assembles the sentence graph.
    pub fn build(ctx: &GrammarContext, fallback_weight: f32) -> Result<(Engine, BuildMetrics)> {
        let started = Instant::now();

        let cascade_started = Instant::now();
        let cascade = RewriteCascade::preprocessing(ctx.alphabet())?;
        let cascade_elapsed = cascade_started.elapsed();

        let grammars = rules::build(ctx)?;
        let union = classify::classify_union(&grammars, fallback_weight)?;
        let tokenizer = tokenize::build_sentence_graph(ctx, &union.fst, grammars.punctuation.classify())?;

        let mut verbalizers = BTreeMap::new();
        for verbalizer in &grammars.verbalizers {
            check_negative_cycles(verbalizer.verbalize(), verbalizer.category())?;
            verbalizers.insert(verbalizer.category().to_string(), CompiledVerbalizer::from_grammar(verbalizer.as_ref()));
        }

        let metrics = BuildMetrics {
            total: started.elapsed(),
            restored: false,
            grammars: union.grammars,
            cascade: cascade_elapsed,
            sentence_states: tokenizer.num_states(),
            sentence_arcs: tokenizer.num_arcs(),
            worst_case_total: union.worst_case_total,
        };
        tracing::info!(
            categories = metrics.grammars.len(),
            states = metrics.sentence_states,
            arcs = metrics.sentence_arcs,
            elapsed = ?metrics.total,
            "grammars built"
        );

        Ok((Engine { alphabet: ctx.alphabet().clone(), cascade, tokenizer, verbalizers }, metrics))
    }

    /// Reassembles an engine from archived parts.
    pub(crate) fn from_parts(
        alphabet: Alphabet,
        cascade: RewriteCascade,
        tokenizer: Fst,
        verbalizers: BTreeMap<String, CompiledVerbalizer>,
    ) -> Result<Engine> {
        check_negative_cycles(&tokenizer, "tokenize")?;
        Ok(Engine { alphabet, cascade, tokenizer, verbalizers })
    }

    pub fn cascade(&self) -> &RewriteCascade {
        &self.cascade
    }

    pub fn tokenizer(&self) -> &Fst {
        &self.tokenizer
    }

    pub fn verbalizers(&self) -> &BTreeMap<String, CompiledVerbalizer> {
        &self.verbalizers
    }

    pub fn preprocess(&self, text: &str) -> Result<String> {
        self.alphabet.check(text)?;
        self.cascade.apply(text)
    }

    /// Tokens for already preprocessed text.
    pub fn classify(&self, text: &str) -> Result<Vec<Token>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        decode::decode(&self.tokenizer, text)
    }

    /// Preprocesses and classifies raw text.
    pub fn tokenize(&self, text: &str) -> Result<Vec<Token>> {
        let preprocessed = self.preprocess(text)?;
        self.classify(&preprocessed)
    }

    /// Speaks a token sequence.
    pub fn verbalize(&self, tokens: &[Token]) -> Result<String> {
        let pieces = tokens
            .iter()
            .map(|token| {
                self.verbalizers
                    .get(&token.category)
                    .ok_or_else(|| Error::UnknownCategory(token.category.clone()))?
                    .verbalize(token)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(decode::join(tokens, &pieces))
    }

    /// Full pipeline with timings.
    pub fn run(&self, text: &str) -> Result<RunResult> {
        let started = Instant::now();

        let preprocessed = self.preprocess(text)?;
        let preprocess = started.elapsed();

        let classify_started = Instant::now();
        let tokens = self.classify(&preprocessed)?;
        let classify = classify_started.elapsed();

        let verbalize_started = Instant::now();
        let spoken = self.verbalize(&tokens)?;
        let verbalize = verbalize_started.elapsed();

        let metrics = RunMetrics { total: started.elapsed(), preprocess, classify, verbalize };
        tracing::debug!(tokens = tokens.len(), elapsed = ?metrics.total, "normalized");
        Ok(RunResult { preprocessed, tokens, spoken, metrics })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InputCase;
    use crate::grammar::{Classifier, Verbalizer};
    use crate::lexicon::Lexicon;
    use crate::priority::Priority;
    use crate::rules::{Grammars, Punctuation, Word};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    /// A category that reads `abc` exactly like any other instance.
    struct Literal {
        name: &'static str,
        classify: Fst,
        verbalize: Fst,
    }

    impl Literal {
        fn new(ctx: &GrammarContext, name: &'static str) -> Self {
            Literal {
                name,
                classify: ctx.field("value", &Fst::accept("abc")).optimize(),
                verbalize: ctx.read_field("value"),
            }
        }
    }

    impl Classifier for Literal {
        fn category(&self) -> &'static str {
            self.name
        }

        fn priority(&self) -> Priority {
            Priority::Generic
        }

        fn classify(&self) -> &Fst {
            &self.classify
        }
    }

    impl Verbalizer for Literal {
        fn category(&self) -> &'static str {
            self.name
        }

        fn verbalize(&self) -> &Fst {
            &self.verbalize
        }
    }

    fn context() -> GrammarContext {
        GrammarContext::new(
            Arc::new(Lexicon::builtin("en").expect("builtin")),
            Arc::new(Alphabet::new(('a'..='z').chain([' ', ',', '.']))),
            true,
            InputCase::Cased,
        )
    }

    fn categories_for(order: [&'static str; 2], text: &str) -> Vec<String> {
        let ctx = context();
        let grammars = Grammars {
            classifiers: vec![
                Arc::new(Literal::new(&ctx, order[0])) as Arc<dyn Classifier>,
                Arc::new(Literal::new(&ctx, order[1])),
                Arc::new(Word::new(&ctx)),
            ],
            verbalizers: Vec::new(),
            punctuation: Arc::new(Punctuation::new(&ctx)),
            timings: Vec::new(),
        };
        let union = classify::classify_union(&grammars, 100.0).expect("union");
        let graph = tokenize::build_sentence_graph(&ctx, &union.fst, grammars.punctuation.classify()).expect("graph");
        decode::decode(&graph, text).expect("decodes").into_iter().map(|token| token.category).collect()
    }

    #[test]
    fn equal_readings_go_to_the_first_declared_category() {
        assert_eq!(categories_for(["x", "longer_name"], "abc"), vec!["x"]);
        assert_eq!(categories_for(["longer_name", "x"], "abc"), vec!["longer_name"]);
        assert_eq!(
            categories_for(["longer_name", "x"], "abc, abc."),
            vec!["longer_name", "punctuation", "longer_name", "punctuation"]
        );
    }

    #[test]
    fn punctuation_records_surrounding_whitespace() {
        let ctx = context();
        let grammars = Grammars {
            classifiers: vec![
                Arc::new(Literal::new(&ctx, "literal")) as Arc<dyn Classifier>,
                Arc::new(Word::new(&ctx)),
            ],
            verbalizers: Vec::new(),
            punctuation: Arc::new(Punctuation::new(&ctx)),
            timings: Vec::new(),
        };
        let union = classify::classify_union(&grammars, 100.0).expect("union");
        let graph = tokenize::build_sentence_graph(&ctx, &union.fst, grammars.punctuation.classify()).expect("graph");
        let wire = |text: &str| {
            let tokens = decode::decode(&graph, text).expect("decodes");
            crate::token::to_wire(&tokens)
        };
        assert_eq!(
            wire("  ab , cd.  "),
            r#"tokens { word { name: "ab" } } tokens { punctuation { space_before: "true" name: "," space_after: "true" } } tokens { word { name: "cd" } } tokens { punctuation { name: "." } }"#
        );
        assert_eq!(
            wire("ab,cd"),
            r#"tokens { word { name: "ab" } } tokens { punctuation { name: "," } } tokens { word { name: "cd" } }"#
        );
        assert_eq!(
            wire(". , ."),
            r#"tokens { punctuation { name: "." space_after: "true" } } tokens { punctuation { name: "," space_after: "true" } } tokens { punctuation { name: "." } }"#
        );
    }
}
