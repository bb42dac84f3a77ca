//! Context-dependent rewrite rules compiled to transducers.
//!
//! A rule `τ / λ __ ρ` rewrites every occurrence of `dom(τ)` that is preceded
//! by `λ` and followed by `ρ` (both read on the input side), leftmost first,
//! without overlaps, and obligatorily; everything else is copied.
//!
//! The transducer is built directly as a product of small automata instead of
//! the classic marker-insertion cascade:
//!
//! ```text
//!   L  complete DFA of Σ*λ        where does the left context hold?
//!   τ  the rule itself            what does a match read and write?
//!   R  complete DFA of ρΣ*        obligations queued when a match ends
//!   M  complete DFA of dom(τ)ρΣ*  checks queued when a match is declined
//!
//!   state = (L state, Copy | Match(τ state, consumed), {R states}, {M states}, fresh)
//! ```
//!
//! At a position where `L` is final the path either opens a match or declines
//! it. Declining queues an `M` check, which kills the path the moment it
//! proves a match was available, so rewriting is obligatory. Ending a match
//! queues an `R` obligation, which must be discharged before the end of the
//! string. `fresh` marks a position where an empty match was just made, so
//! insertions fire once per position.
//!
//! Contexts built with [`Context::boundary`] or [`Context::anchored`] are tied
//! to the start (left) or end (right) of the string.

use crate::error::{Error, Result};
use crate::fst::{Alphabet, Arc, Dfa, EPSILON, Fst, Label, ProjectType, StateId, Weight, label_char};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, VecDeque};

/// One side of a rewrite's context.
#[derive(Debug, Clone)]
pub struct Context {
    pattern: Fst,
    anchored: bool,
}

impl Context {
    /// No restriction.
    pub fn any() -> Self {
        Context { pattern: Fst::epsilon(), anchored: false }
    }

    /// `pattern` must end right before (left) or start right after (right)
    /// the match.
    pub fn new(pattern: Fst) -> Self {
        Context { pattern, anchored: false }
    }

    /// The start (left) or end (right) of the string.
    pub fn boundary() -> Self {
        Context { pattern: Fst::epsilon(), anchored: true }
    }

    /// `pattern` must span from the string boundary to the match.
    pub fn anchored(pattern: Fst) -> Self {
        Context { pattern, anchored: true }
    }

    fn accepts_empty(&self) -> bool {
        self.pattern.best_output("").is_some()
    }
}

/// An uncompiled rewrite rule.
#[derive(Debug, Clone)]
pub struct RewriteRule {
    name: String,
    tau: Fst,
    left: Context,
    right: Context,
}

impl RewriteRule {
    pub fn new(name: impl Into<String>, tau: Fst, left: Context, right: Context) -> Self {
        RewriteRule { name: name.into(), tau, left, right }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Builds the rewrite transducer over `sigma` (extended with every symbol
    /// the rule itself mentions).
    pub fn compile(&self, sigma: &Alphabet) -> Result<Rewrite> {
        let tau = self.tau.optimize();
        if tau.is_empty() {
            return Err(Error::Config(format!("rewrite rule `{}` matches nothing", self.name)));
        }

        let mut labels: BTreeSet<Label> = sigma.labels().into_iter().collect();
        labels.extend(tau.input_labels());
        labels.extend(self.left.pattern.input_labels());
        labels.extend(self.right.pattern.input_labels());
        let labels: Vec<Label> = labels.into_iter().collect();
        let sigma_star = Fst::any_of(labels.iter().filter_map(|&l| label_char(l))).closure();

        let left_lang = if self.left.anchored {
            self.left.pattern.clone()
        } else {
            &sigma_star + &self.left.pattern
        };
        let right_lang = if self.right.anchored {
            self.right.pattern.clone()
        } else {
            &self.right.pattern + &sigma_star
        };
        let check_lang = tau.project(ProjectType::Input) + &right_lang;

        let compiler = Compiler {
            tau: &tau,
            left: Dfa::from_input(&left_lang, &labels),
            right: Dfa::from_input(&right_lang, &labels),
            check: Dfa::from_input(&check_lang, &labels),
            labels: &labels,
            out: Fst::new(),
            index: HashMap::new(),
            queue: VecDeque::new(),
        };
        let fst = compiler.run().optimize();
        tracing::debug!(rule = %self.name, states = fst.num_states(), arcs = fst.num_arcs(), "compiled rewrite rule");

        Ok(Rewrite { name: self.name.clone(), fst, triggers: self.triggers(&tau) })
    }

    /// Characters of which at least one must occur for the rule to change
    /// anything; `None` when no such set exists.
    fn triggers(&self, tau: &Fst) -> Option<BTreeSet<char>> {
        let to_chars = |fst: &Fst| fst.input_labels().into_iter().filter_map(label_char).collect();
        if tau.best_output("").is_none() {
            Some(to_chars(tau))
        } else if !self.left.accepts_empty() {
            Some(to_chars(&self.left.pattern))
        } else if !self.right.accepts_empty() {
            Some(to_chars(&self.right.pattern))
        } else {
            None
        }
    }
}

/// A compiled rewrite rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rewrite {
    name: String,
    fst: Fst,
    triggers: Option<BTreeSet<char>>,
}

impl Rewrite {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fst(&self) -> &Fst {
        &self.fst
    }

    /// False only when the rule is certainly the identity on `text`.
    pub fn may_apply(&self, text: &str) -> bool {
        match &self.triggers {
            Some(chars) => text.chars().any(|c| chars.contains(&c)),
            None => true,
        }
    }

    /// One obligatory left-to-right pass over `text`.
    pub fn apply(&self, text: &str) -> Result<String> {
        if !self.may_apply(text) {
            return Ok(text.to_string());
        }
        self.fst
            .apply(text)
            .ok_or_else(|| Error::NoPath { graph: self.name.clone(), input: text.to_string() })
    }
}

// --- Product construction ---------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Mode {
    Copy,
    Match { phi: StateId, consumed: bool },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Config {
    left: usize,
    mode: Mode,
    pending: Vec<usize>,
    checks: Vec<usize>,
    fresh: bool,
}

struct Compiler<'a> {
    tau: &'a Fst,
    left: Dfa,
    right: Dfa,
    check: Dfa,
    labels: &'a [Label],
    out: Fst,
    index: HashMap<Config, StateId>,
    queue: VecDeque<Config>,
}

impl Compiler<'_> {
    fn intern(&mut self, config: Config) -> StateId {
        if let Some(&s) = self.index.get(&config) {
            return s;
        }
        let s = self.out.add_state();
        self.index.insert(config.clone(), s);
        self.queue.push_back(config);
        s
    }

    /// Moves every context automaton over one input symbol. `None` when an
    /// obligation died or a check proved a declined match was available.
    fn advance(&self, config: &Config, sym: Label, decline: bool) -> Option<(usize, Vec<usize>, Vec<usize>)> {
        let left = self.left.step(config.left, sym);

        let mut pending = Vec::with_capacity(config.pending.len());
        for &q in &config.pending {
            let next = self.right.step(q, sym);
            if !self.right.is_live(next) {
                return None;
            }
            if !self.right.is_universal(next) {
                pending.push(next);
            }
        }

        let mut checks = Vec::with_capacity(config.checks.len() + 1);
        let queued = decline.then_some(self.check.start());
        for q in config.checks.iter().copied().chain(queued) {
            let next = self.check.step(q, sym);
            if self.check.is_universal(next) {
                return None;
            }
            if self.check.is_live(next) {
                checks.push(next);
            }
        }

        pending.sort_unstable();
        pending.dedup();
        checks.sort_unstable();
        checks.dedup();
        Some((left, pending, checks))
    }

    fn accepting(&self, config: &Config) -> bool {
        let declined_at_end =
            !config.fresh && self.left.is_final(config.left) && self.check.is_final(self.check.start());
        config.mode == Mode::Copy
            && config.pending.iter().all(|&q| self.right.is_final(q))
            && !config.checks.iter().any(|&q| self.check.is_final(q))
            && !declined_at_end
    }

    fn run(mut self) -> Fst {
        let Some(phi0) = self.tau.start() else { return Fst::new() };
        let initial =
            Config { left: self.left.start(), mode: Mode::Copy, pending: Vec::new(), checks: Vec::new(), fresh: false };
        let start = self.intern(initial);
        self.out.set_start(start);

        while let Some(config) = self.queue.pop_front() {
            let s = self.index[&config];
            match config.mode {
                Mode::Copy => {
                    if self.accepting(&config) {
                        self.out.set_final(s, Weight::ONE);
                    }
                    let in_context = self.left.is_final(config.left) && !config.fresh;
                    if in_context {
                        let open = Config { mode: Mode::Match { phi: phi0, consumed: false }, ..config.clone() };
                        let t = self.intern(open);
                        self.out.add_arc(s, Arc::new(EPSILON, EPSILON, Weight::ONE, t));
                    }
                    for &sym in self.labels {
                        if let Some((left, pending, checks)) = self.advance(&config, sym, in_context) {
                            let next = Config { left, mode: Mode::Copy, pending, checks, fresh: false };
                            let t = self.intern(next);
                            self.out.add_arc(s, Arc::new(sym, sym, Weight::ONE, t));
                        }
                    }
                }
                Mode::Match { phi, consumed } => {
                    for arc in self.tau.arcs(phi) {
                        let next = if arc.ilabel == EPSILON {
                            Config { mode: Mode::Match { phi: arc.nextstate, consumed }, ..config.clone() }
                        } else {
                            let Some((left, pending, checks)) = self.advance(&config, arc.ilabel, false) else {
                                continue;
                            };
                            Config {
                                left,
                                mode: Mode::Match { phi: arc.nextstate, consumed: true },
                                pending,
                                checks,
                                fresh: config.fresh,
                            }
                        };
                        let t = self.intern(next);
                        self.out.add_arc(s, Arc::new(arc.ilabel, arc.olabel, arc.weight, t));
                    }
                    if let Some(fw) = self.tau.final_weight(phi) {
                        let r0 = self.right.start();
                        if !self.right.is_live(r0) {
                            continue;
                        }
                        let mut pending = config.pending.clone();
                        if !self.right.is_universal(r0) {
                            pending.push(r0);
                            pending.sort_unstable();
                            pending.dedup();
                        }
                        let close = Config {
                            left: config.left,
                            mode: Mode::Copy,
                            pending,
                            checks: config.checks.clone(),
                            fresh: !consumed,
                        };
                        let t = self.intern(close);
                        self.out.add_arc(s, Arc::new(EPSILON, EPSILON, fw, t));
                    }
                }
            }
        }
        self.out.connect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sigma() -> Alphabet {
        Alphabet::new((' '..='~').chain(['—', '√']))
    }

    fn digit() -> Fst {
        Fst::any_of('0'..='9')
    }

    fn letter() -> Fst {
        Fst::any_of(('a'..='z').chain('A'..='Z'))
    }

    #[test]
    fn rewrites_only_inside_context() {
        let rule = RewriteRule::new("hyphen", Fst::cross("-", " "), Context::new(digit()), Context::new(letter()));
        let rw = rule.compile(&sigma()).expect("compiles");
        let cases = vec![
            ("3 apples", "3-apples"),
            ("10-2", "10-2"),
            ("a-b", "a-b"),
            ("1 a 2 b", "1-a 2-b"),
        ];
        for (expected, input) in cases {
            assert_eq!(rw.apply(input).expect("total"), expected, "rewriting {input:?}");
        }
    }

    #[test]
    fn insertion_fires_once_per_position() {
        let rule = RewriteRule::new(
            "sqrt",
            Fst::insert(" "),
            Context::new(Fst::accept("√")),
            Context::new(digit() | letter()),
        );
        let rw = rule.compile(&sigma()).expect("compiles");
        assert_eq!(rw.apply("√2").expect("total"), "√ 2");
        assert_eq!(rw.apply("√ 2").expect("total"), "√ 2");
        assert_eq!(rw.apply("x√y√").expect("total"), "x√ y√");
    }

    #[test]
    fn leftmost_non_overlapping() {
        let rule = RewriteRule::new("aa", Fst::cross("aa", "b"), Context::any(), Context::any());
        let rw = rule.compile(&sigma()).expect("compiles");
        assert_eq!(rw.apply("aaa").expect("total"), "ba");
        assert_eq!(rw.apply("aaaa").expect("total"), "bb");
    }

    #[test]
    fn boundary_contexts() {
        let rule = RewriteRule::new("final-y", Fst::cross("y", "ie"), Context::any(), Context::boundary());
        let rw = rule.compile(&sigma()).expect("compiles");
        assert_eq!(rw.apply("twenty").expect("total"), "twentie");
        assert_eq!(rw.apply("yay").expect("total"), "yaie");
    }

    #[test]
    fn idempotent_on_own_output() {
        let rule = RewriteRule::new(
            "equals",
            Fst::cross("=", " = "),
            Context::new(Fst::any_of(('a'..='z').chain(['(', ')']))),
            Context::new(digit()),
        );
        let rw = rule.compile(&sigma()).expect("compiles");
        for input in ["x=5", "a=1 and b=2", "1=2", "no match"] {
            let once = rw.apply(input).expect("total");
            let twice = rw.apply(&once).expect("total");
            assert_eq!(once, twice, "idempotence on {input:?}");
        }
        assert_eq!(rw.apply("x=5").expect("total"), "x = 5");
    }

    #[test]
    fn triggers_skip_irrelevant_input() {
        let rule = RewriteRule::new("underscore", Fst::cross("_", " "), Context::new(digit()), Context::new(letter()));
        let rw = rule.compile(&sigma()).expect("compiles");
        assert!(!rw.may_apply("plain text"));
        assert!(rw.may_apply("3_x"));
        assert_eq!(rw.apply("3_x").expect("total"), "3 x");
    }
}
