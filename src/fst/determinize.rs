//! Subset construction over encoded symbols.
//!
//! Each arc's `(ilabel, olabel, weight)` triple is treated as one opaque
//! symbol, so the classic unweighted subset construction applies to weighted
//! transducers too. The result is deterministic over encoded symbols and keeps
//! the exact set of weighted paths; the final weight of a subset is the
//! cheapest final weight among its members.
//!
//! The input must be epsilon-free (run [`Fst::rm_epsilon`] first).

use super::vector::{Arc, Fst, Label, StateId};
use super::weight::Weight;
use std::collections::{BTreeSet, HashMap};

impl Fst {
    /// Returns `None` once the result would exceed `max_states`.
    pub(crate) fn determinize_encoded(&self, max_states: usize) -> Option<Fst> {
        let Some(start) = self.start() else { return Some(Fst::new()) };
        let mut out = Fst::new();
        let mut subsets: Vec<Vec<StateId>> = vec![vec![start]];
        let mut index: HashMap<Vec<StateId>, StateId> = HashMap::from([(vec![start], 0)]);
        out.add_state();
        out.set_start(0);

        let mut i = 0;
        while i < subsets.len() {
            if subsets.len() > max_states {
                return None;
            }
            let subset = subsets[i].clone();

            let final_weight =
                subset.iter().filter_map(|&q| self.final_weight(q)).fold(Weight::ZERO, Weight::plus);
            out.set_final(i, final_weight);

            // Groups keep first-seen order so arc order stays stable.
            let mut keys: Vec<(Label, Label, Weight)> = Vec::new();
            let mut groups: HashMap<(Label, Label, u32), (usize, BTreeSet<StateId>)> = HashMap::new();
            for &q in &subset {
                for arc in self.arcs(q) {
                    let key = (arc.ilabel, arc.olabel, arc.weight.bits());
                    let entry = groups.entry(key).or_insert_with(|| {
                        keys.push((arc.ilabel, arc.olabel, arc.weight));
                        (keys.len() - 1, BTreeSet::new())
                    });
                    entry.1.insert(arc.nextstate);
                }
            }
            let mut ordered: Vec<(usize, (Label, Label, u32), BTreeSet<StateId>)> =
                groups.into_iter().map(|(k, (pos, set))| (pos, k, set)).collect();
            ordered.sort_by_key(|(pos, _, _)| *pos);

            for (pos, _, targets) in ordered {
                let (ilabel, olabel, weight) = keys[pos];
                let target: Vec<StateId> = targets.into_iter().collect();
                let t = match index.get(&target) {
                    Some(&t) => t,
                    None => {
                        let t = out.add_state();
                        index.insert(target.clone(), t);
                        subsets.push(target);
                        t
                    }
                };
                out.add_arc(i, Arc::new(ilabel, olabel, weight, t));
            }
            i += 1;
        }
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merges_shared_prefixes() {
        let fst = (Fst::accept("abc") | Fst::accept("abd")).rm_epsilon();
        let det = fst.determinize_encoded(1000).expect("within budget");
        assert!(det.num_states() < fst.num_states());
        assert!(det.apply("abc").is_some());
        assert!(det.apply("abd").is_some());
    }

    #[test]
    fn respects_state_budget() {
        let fst = (Fst::accept("abc") | Fst::accept("xyz")).rm_epsilon();
        assert!(fst.determinize_encoded(2).is_none());
    }
}
