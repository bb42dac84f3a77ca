//! Complete deterministic automata over a fixed alphabet.
//!
//! Built from the input tape of any `Fst` by subset construction; weights are
//! ignored. Every state has a transition on every alphabet symbol (a sink
//! absorbs the rest), which makes complement-style reasoning straightforward.
//! Used by `difference` and by the context-rewrite compiler.

use super::vector::{EPSILON, Fst, Label, StateId};
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone)]
pub(crate) struct Dfa {
    alphabet: Vec<Label>,
    trans: Vec<Vec<usize>>,
    finals: Vec<bool>,
    live: Vec<bool>,
    universal: Vec<bool>,
    start: usize,
    sink: usize,
}

impl Dfa {
    /// Determinizes the input-side language of `fst` over `alphabet`.
    /// Symbols outside `alphabet` lead to the sink.
    pub(crate) fn from_input(fst: &Fst, alphabet: &[Label]) -> Dfa {
        let mut alphabet: Vec<Label> = alphabet.iter().copied().filter(|&l| l != EPSILON).collect();
        alphabet.sort_unstable();
        alphabet.dedup();

        let mut subsets: Vec<Vec<StateId>> = Vec::new();
        let mut index: HashMap<Vec<StateId>, usize> = HashMap::new();
        let mut trans: Vec<Vec<usize>> = Vec::new();

        let sink = intern(&mut subsets, &mut index, Vec::new());
        let start_set = match fst.start() {
            Some(s) => epsilon_closure(fst, [s]),
            None => Vec::new(),
        };
        let start = intern(&mut subsets, &mut index, start_set);

        let mut i = 0;
        while i < subsets.len() {
            let subset = subsets[i].clone();
            let mut row = Vec::with_capacity(alphabet.len());
            for &sym in &alphabet {
                let moved: Vec<StateId> = subset
                    .iter()
                    .flat_map(|&q| fst.arcs_with_input(q, sym).map(|a| a.nextstate))
                    .collect();
                let target = epsilon_closure(fst, moved);
                row.push(intern(&mut subsets, &mut index, target));
            }
            trans.push(row);
            i += 1;
        }

        let finals: Vec<bool> = subsets.iter().map(|set| set.iter().any(|&q| fst.is_final(q))).collect();
        let live = backward_reach(&trans, |q| finals[q]);
        let reaches_nonfinal = backward_reach(&trans, |q| !finals[q]);
        let universal = reaches_nonfinal.iter().map(|r| !r).collect();
        Dfa { alphabet, trans, finals, live, universal, start, sink }
    }

    pub(crate) fn start(&self) -> usize {
        self.start
    }

    pub(crate) fn step(&self, q: usize, sym: Label) -> usize {
        match self.alphabet.binary_search(&sym) {
            Ok(i) => self.trans[q][i],
            Err(_) => self.sink,
        }
    }

    pub(crate) fn is_final(&self, q: usize) -> bool {
        self.finals[q]
    }

    /// Some continuation reaches a final state.
    pub(crate) fn is_live(&self, q: usize) -> bool {
        self.live[q]
    }

    /// Every continuation stays final.
    pub(crate) fn is_universal(&self, q: usize) -> bool {
        self.universal[q]
    }

    pub(crate) fn accepts_empty(&self) -> bool {
        self.finals[self.start]
    }
}

fn intern(subsets: &mut Vec<Vec<StateId>>, index: &mut HashMap<Vec<StateId>, usize>, set: Vec<StateId>) -> usize {
    if let Some(&i) = index.get(&set) {
        return i;
    }
    subsets.push(set.clone());
    index.insert(set, subsets.len() - 1);
    subsets.len() - 1
}

/// Closure over input-epsilon arcs, as a sorted state set.
fn epsilon_closure(fst: &Fst, seeds: impl IntoIterator<Item = StateId>) -> Vec<StateId> {
    let mut set: BTreeSet<StateId> = BTreeSet::new();
    let mut stack: Vec<StateId> = Vec::new();
    for s in seeds {
        if set.insert(s) {
            stack.push(s);
        }
    }
    while let Some(s) = stack.pop() {
        for arc in fst.arcs_with_input(s, EPSILON) {
            if set.insert(arc.nextstate) {
                stack.push(arc.nextstate);
            }
        }
    }
    set.into_iter().collect()
}

/// States from which some state satisfying `target` is reachable.
fn backward_reach(trans: &[Vec<usize>], target: impl Fn(usize) -> bool) -> Vec<bool> {
    let n = trans.len();
    let mut reverse: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (q, row) in trans.iter().enumerate() {
        for &t in row {
            reverse[t].push(q);
        }
    }
    let mut seen = vec![false; n];
    let mut stack: Vec<usize> = (0..n).filter(|&q| target(q)).collect();
    for &q in &stack {
        seen[q] = true;
    }
    while let Some(q) = stack.pop() {
        for &p in &reverse[q] {
            if !seen[p] {
                seen[p] = true;
                stack.push(p);
            }
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fst::label;

    fn labels(s: &str) -> Vec<Label> {
        s.chars().map(label).collect()
    }

    fn run(dfa: &Dfa, input: &str) -> usize {
        input.chars().fold(dfa.start(), |q, c| dfa.step(q, label(c)))
    }

    #[test]
    fn recognises_suffix_language() {
        let sigma = Fst::any_of(['a', 'b']).closure();
        let dfa = Dfa::from_input(&(sigma + Fst::accept("ab")), &labels("ab"));
        assert!(dfa.is_final(run(&dfa, "aab")));
        assert!(!dfa.is_final(run(&dfa, "aba")));
        assert!(dfa.is_live(run(&dfa, "aba")));
    }

    #[test]
    fn universal_and_dead_states() {
        let sigma = Fst::any_of(['a', 'b']).closure();
        let dfa = Dfa::from_input(&(Fst::accept("a") + sigma), &labels("ab"));
        assert!(dfa.is_universal(run(&dfa, "ab")));
        assert!(!dfa.is_live(run(&dfa, "b")));
        assert!(!dfa.accepts_empty());
        assert!(!dfa.is_live(dfa.step(dfa.start(), label('z'))));
    }
}
