//! Rational operations and string constructors.
//!
//! Every operation here is a plain structural construction: it glues copies of
//! its operands together with epsilon arcs and never optimizes. Grammar code
//! calls [`Fst::optimize`] after each non-trivial step.
//!
//! `a | b` is union and `a + b` is concatenation, for both owned and borrowed
//! operands.

use super::vector::{Arc, EPSILON, Fst, Label, StateId, label};
use super::weight::Weight;
use std::collections::BTreeMap;
use std::ops::{Add, BitOr};

/// Which tape survives a projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectType {
    Input,
    Output,
}

impl Fst {
    /// Accepts exactly the empty string.
    pub fn epsilon() -> Fst {
        let mut fst = Fst::new();
        let s = fst.add_state();
        fst.set_start(s);
        fst.set_final(s, Weight::ONE);
        fst
    }

    /// Accepts exactly `text`.
    pub fn accept(text: &str) -> Fst {
        let mut fst = Fst::new();
        let mut cur = fst.add_state();
        fst.set_start(cur);
        for c in text.chars() {
            let next = fst.add_state();
            fst.add_arc(cur, Arc::new(label(c), label(c), Weight::ONE, next));
            cur = next;
        }
        fst.set_final(cur, Weight::ONE);
        fst
    }

    /// Accepts any single character from `chars`.
    pub fn any_of(chars: impl IntoIterator<Item = char>) -> Fst {
        let mut fst = Fst::new();
        let s = fst.add_state();
        let t = fst.add_state();
        fst.set_start(s);
        fst.set_final(t, Weight::ONE);
        let mut seen = std::collections::BTreeSet::new();
        for c in chars {
            if seen.insert(c) {
                fst.add_arc(s, Arc::new(label(c), label(c), Weight::ONE, t));
            }
        }
        fst.arc_sort_input();
        fst
    }

    /// Maps `from` to `to` with zero weight.
    pub fn cross(from: &str, to: &str) -> Fst {
        Fst::string_map([(from, to)])
    }

    /// Reads nothing and writes `text`.
    pub fn insert(text: &str) -> Fst {
        Fst::cross("", text)
    }

    /// Reads `text` and writes nothing.
    pub fn delete(text: &str) -> Fst {
        Fst::cross(text, "")
    }

    /// Union of crosses, compiled as a trie over the input keys.
    pub fn string_map<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Fst {
        let mut trie = TrieBuilder::new();
        for (from, to) in pairs {
            trie.insert(from, to, Weight::ONE);
        }
        trie.finish()
    }

    pub(crate) fn weighted_string_map<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str, Weight)>) -> Fst {
        let mut trie = TrieBuilder::new();
        for (from, to, weight) in entries {
            trie.insert(from, to, weight);
        }
        trie.finish()
    }

    pub fn union(&self, other: &Fst) -> Fst {
        Fst::union_all([self, other])
    }

    /// Union of every operand, with branches in iteration order.
    pub fn union_all<'a>(items: impl IntoIterator<Item = &'a Fst>) -> Fst {
        let mut out = Fst::new();
        let start = out.add_state();
        out.set_start(start);
        for fst in items {
            if let Some(s) = fst.start() {
                let offset = out.append(fst);
                out.add_arc(start, Arc::new(EPSILON, EPSILON, Weight::ONE, s + offset));
            }
        }
        out
    }

    pub fn concat(&self, other: &Fst) -> Fst {
        let (Some(a0), Some(b0)) = (self.start(), other.start()) else { return Fst::new() };
        let mut out = self.clone();
        let offset = out.append(other);
        let finals: Vec<(StateId, Weight)> = self.finals().collect();
        for (f, w) in finals {
            out.set_final(f, Weight::ZERO);
            out.add_arc(f, Arc::new(EPSILON, EPSILON, w, b0 + offset));
        }
        out.set_start(a0);
        out
    }

    /// Concatenation of every operand, left to right.
    pub fn concat_all<'a>(items: impl IntoIterator<Item = &'a Fst>) -> Fst {
        items.into_iter().fold(Fst::epsilon(), |acc, f| acc.concat(f))
    }

    /// Kleene star.
    pub fn closure(&self) -> Fst {
        let mut out = Fst::new();
        let s = out.add_state();
        out.set_start(s);
        out.set_final(s, Weight::ONE);
        if let Some(a0) = self.start() {
            let offset = out.append(self);
            out.add_arc(s, Arc::new(EPSILON, EPSILON, Weight::ONE, a0 + offset));
            for (f, w) in self.finals() {
                out.add_arc(f + offset, Arc::new(EPSILON, EPSILON, w, a0 + offset));
            }
        }
        out
    }

    /// One or more repetitions.
    pub fn plus(&self) -> Fst {
        let Some(a0) = self.start() else { return Fst::new() };
        let mut out = self.clone();
        let finals: Vec<(StateId, Weight)> = self.finals().collect();
        for (f, w) in finals {
            out.add_arc(f, Arc::new(EPSILON, EPSILON, w, a0));
        }
        out
    }

    /// Zero or one occurrence.
    pub fn optional(&self) -> Fst {
        self.union(&Fst::epsilon())
    }

    /// Between `min` and `max` repetitions; `None` leaves the upper bound open.
    ///
    /// The optional tail is nested (`(a (a a?)?)?`) so each repetition count
    /// has exactly one path.
    pub fn repeat(&self, min: usize, max: Option<usize>) -> Fst {
        let mut out = Fst::epsilon();
        for _ in 0..min {
            out = out.concat(self);
        }
        match max {
            None => out.concat(&self.closure()),
            Some(max) if max < min => Fst::new(),
            Some(max) => {
                let mut tail = Fst::epsilon();
                for _ in min..max {
                    tail = self.concat(&tail).optional();
                }
                out.concat(&tail)
            }
        }
    }

    /// Multiplies every final weight by `weight`.
    pub fn add_weight(&self, weight: impl Into<Weight>) -> Fst {
        let weight = weight.into();
        let mut out = self.clone();
        let finals: Vec<(StateId, Weight)> = self.finals().collect();
        for (f, w) in finals {
            out.set_final(f, w.times(weight));
        }
        out
    }

    /// Swaps input and output tapes.
    pub fn invert(&self) -> Fst {
        self.map_arcs(|a| Arc { ilabel: a.olabel, olabel: a.ilabel, ..a })
    }

    pub fn project(&self, side: ProjectType) -> Fst {
        match side {
            ProjectType::Input => self.map_arcs(|a| Arc { olabel: a.ilabel, ..a }),
            ProjectType::Output => self.map_arcs(|a| Arc { ilabel: a.olabel, ..a }),
        }
    }

    /// Reads what `self` reads and writes nothing.
    pub fn deleted(&self) -> Fst {
        self.map_arcs(|a| Arc { olabel: EPSILON, ..a })
    }

    /// Drops weights from arcs and finals.
    pub fn unweighted(&self) -> Fst {
        let mut out = self.map_arcs(|a| Arc { weight: Weight::ONE, ..a });
        let finals: Vec<StateId> = self.finals().map(|(f, _)| f).collect();
        for f in finals {
            out.set_final(f, Weight::ONE);
        }
        out
    }

    /// Input labels that occur anywhere in the automaton.
    pub fn input_labels(&self) -> Vec<Label> {
        let mut labels: Vec<Label> =
            self.states().flat_map(|s| self.arcs(s).iter().map(|a| a.ilabel)).filter(|&l| l != EPSILON).collect();
        labels.sort_unstable();
        labels.dedup();
        labels
    }

    fn map_arcs(&self, f: impl Fn(Arc) -> Arc) -> Fst {
        let mut out = self.clone();
        for s in self.states() {
            for arc in out.arcs_mut(s).iter_mut() {
                *arc = f(*arc);
            }
        }
        out
    }
}

/// Input-side trie; the output string is spelled out after each key.
struct TrieBuilder {
    fst: Fst,
    children: BTreeMap<(StateId, Label), StateId>,
}

impl TrieBuilder {
    fn new() -> Self {
        let mut fst = Fst::new();
        let root = fst.add_state();
        fst.set_start(root);
        TrieBuilder { fst, children: BTreeMap::new() }
    }

    fn insert(&mut self, from: &str, to: &str, weight: Weight) {
        let mut node = 0;
        for c in from.chars() {
            let key = (node, label(c));
            node = match self.children.get(&key) {
                Some(&next) => next,
                None => {
                    let next = self.fst.add_state();
                    self.fst.add_arc(node, Arc::new(label(c), EPSILON, Weight::ONE, next));
                    self.children.insert(key, next);
                    next
                }
            };
        }
        if to.is_empty() {
            let w = self.fst.final_weight(node).map_or(weight, |old| old.plus(weight));
            self.fst.set_final(node, w);
            return;
        }
        for c in to.chars() {
            let next = self.fst.add_state();
            self.fst.add_arc(node, Arc::new(EPSILON, label(c), Weight::ONE, next));
            node = next;
        }
        self.fst.set_final(node, weight);
    }

    fn finish(self) -> Fst {
        self.fst
    }
}

macro_rules! forward_binop {
    ($trait:ident, $method:ident, $op:ident) => {
        impl $trait<Fst> for Fst {
            type Output = Fst;
            fn $method(self, rhs: Fst) -> Fst {
                Fst::$op(&self, &rhs)
            }
        }
        impl $trait<&Fst> for Fst {
            type Output = Fst;
            fn $method(self, rhs: &Fst) -> Fst {
                Fst::$op(&self, rhs)
            }
        }
        impl $trait<Fst> for &Fst {
            type Output = Fst;
            fn $method(self, rhs: Fst) -> Fst {
                Fst::$op(self, &rhs)
            }
        }
        impl $trait<&Fst> for &Fst {
            type Output = Fst;
            fn $method(self, rhs: &Fst) -> Fst {
                Fst::$op(self, rhs)
            }
        }
    };
}

forward_binop!(BitOr, bitor, union);
forward_binop!(Add, add, concat);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_and_concat_accept_expected_strings() {
        let ab = Fst::accept("a") | Fst::accept("b");
        let abc = &ab + Fst::accept("c");
        assert_eq!(abc.apply("ac").as_deref(), Some("ac"));
        assert_eq!(abc.apply("bc").as_deref(), Some("bc"));
        assert_eq!(abc.apply("cc"), None);
    }

    #[test]
    fn closure_accepts_empty_and_repeats() {
        let star = Fst::accept("ab").closure();
        assert_eq!(star.apply("").as_deref(), Some(""));
        assert_eq!(star.apply("ababab").as_deref(), Some("ababab"));
        assert_eq!(star.apply("aba"), None);
        assert_eq!(Fst::accept("a").plus().apply(""), None);
    }

    #[test]
    fn repeat_respects_bounds() {
        let digits = Fst::any_of('0'..='9').repeat(2, Some(3));
        let cases = vec![("1", false), ("12", true), ("123", true), ("1234", false)];
        for (input, accepted) in cases {
            assert_eq!(digits.apply(input).is_some(), accepted, "repeat(2,3) on {input:?}");
        }
        let open = Fst::accept("x").repeat(1, None);
        assert!(open.apply("xxxxx").is_some());
    }

    #[test]
    fn string_map_shares_prefixes_and_maps() {
        let map = Fst::string_map([("1", "one"), ("10", "ten"), ("11", "eleven")]);
        assert_eq!(map.apply("1").as_deref(), Some("one"));
        assert_eq!(map.apply("10").as_deref(), Some("ten"));
        assert_eq!(map.apply("11").as_deref(), Some("eleven"));
        assert_eq!(map.apply("2"), None);
    }

    #[test]
    fn add_weight_changes_preference() {
        let a = Fst::cross("x", "a").add_weight(1.0);
        let b = Fst::cross("x", "b").add_weight(0.5);
        assert_eq!((&a | &b).apply("x").as_deref(), Some("b"));
        assert_eq!((a | b.add_weight(1.0)).apply("x").as_deref(), Some("a"));
    }

    #[test]
    fn invert_and_project() {
        let map = Fst::cross("ab", "xyz");
        assert_eq!(map.invert().apply("xyz").as_deref(), Some("ab"));
        assert_eq!(map.project(ProjectType::Input).apply("ab").as_deref(), Some("ab"));
        assert_eq!(map.project(ProjectType::Output).apply("xyz").as_deref(), Some("xyz"));
    }
}
