//! Epsilon removal.
//!
//! Only arcs that are epsilon on *both* tapes are removed; insertions and
//! deletions (`ε:x`, `x:ε`) are real moves and stay. For each state `q` the
//! epsilon closure `{(r, d(q, r))}` is computed with a queue-based shortest
//! distance, then `q` receives every non-epsilon arc of every `r` with its
//! weight extended by `d(q, r)`, and a final weight of `min d(q, r) + final(r)`.

use super::vector::{Arc, Fst, Label, StateId};
use super::weight::Weight;
use std::collections::{HashMap, VecDeque};

impl Fst {
    pub fn rm_epsilon(&self) -> Fst {
        let mut out = Fst::new();
        for _ in self.states() {
            out.add_state();
        }
        let Some(start) = self.start() else { return Fst::new() };
        out.set_start(start);

        for q in self.states() {
            let closure = self.epsilon_closure(q);
            let mut final_weight = Weight::ZERO;
            let mut arcs: Vec<Arc> = Vec::new();
            let mut index: HashMap<(Label, Label, StateId), usize> = HashMap::new();
            for (r, d) in closure {
                if let Some(fw) = self.final_weight(r) {
                    final_weight = final_weight.plus(d.times(fw));
                }
                for arc in self.arcs(r) {
                    if arc.is_epsilon() {
                        continue;
                    }
                    let w = d.times(arc.weight);
                    let key = (arc.ilabel, arc.olabel, arc.nextstate);
                    match index.get(&key) {
                        Some(&i) => arcs[i].weight = arcs[i].weight.plus(w),
                        None => {
                            index.insert(key, arcs.len());
                            arcs.push(Arc { weight: w, ..*arc });
                        }
                    }
                }
            }
            out.set_final(q, final_weight);
            for arc in arcs {
                out.add_arc(q, arc);
            }
        }
        out.connect()
    }

    /// States reachable from `q` over epsilon arcs, with their shortest
    /// distance, in discovery order. `q` itself comes first at `ONE`.
    fn epsilon_closure(&self, q: StateId) -> Vec<(StateId, Weight)> {
        if !self.arcs(q).iter().any(Arc::is_epsilon) {
            return vec![(q, Weight::ONE)];
        }
        let mut order = vec![q];
        let mut dist: HashMap<StateId, Weight> = HashMap::from([(q, Weight::ONE)]);
        let mut relaxed: HashMap<StateId, usize> = HashMap::new();
        let mut queue = VecDeque::from([q]);
        let mut queued: HashMap<StateId, bool> = HashMap::from([(q, true)]);
        let limit = self.num_states();

        while let Some(r) = queue.pop_front() {
            queued.insert(r, false);
            let dr = dist[&r];
            for arc in self.arcs(r).iter().filter(|a| a.is_epsilon()) {
                let t = arc.nextstate;
                let candidate = dr.times(arc.weight);
                let improved = match dist.get(&t) {
                    None => {
                        order.push(t);
                        true
                    }
                    Some(&old) => candidate.value() < old.value(),
                };
                if !improved {
                    continue;
                }
                // A state relaxed more often than there are states sits on a
                // negative cycle; verification reports it, here we just stop.
                let count = relaxed.entry(t).or_insert(0);
                *count += 1;
                if *count > limit {
                    continue;
                }
                dist.insert(t, candidate);
                if !queued.get(&t).copied().unwrap_or(false) {
                    queued.insert(t, true);
                    queue.push_back(t);
                }
            }
        }
        order.into_iter().map(|s| (s, dist[&s])).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fst::FstProperties;

    #[test]
    fn removes_epsilons_and_keeps_language() {
        let fst = (Fst::accept("a") | Fst::accept("b")).concat(&Fst::accept("c").closure());
        let clean = fst.rm_epsilon();
        assert!(!clean.properties().contains(FstProperties::EPSILONS));
        for (input, accepted) in [("a", true), ("bccc", true), ("ab", false), ("", false)] {
            assert_eq!(clean.apply(input).is_some(), accepted, "input {input:?}");
        }
    }

    #[test]
    fn keeps_insertions() {
        let fst = Fst::insert("x") + Fst::accept("a");
        let clean = fst.rm_epsilon();
        assert_eq!(clean.apply("a").as_deref(), Some("xa"));
    }

    #[test]
    fn closure_weights_move_onto_arcs() {
        let fst = Fst::accept("a").add_weight(0.5) + Fst::accept("b");
        let clean = fst.rm_epsilon();
        let (_, weight) = clean.best_output("ab").expect("path");
        assert!(weight.approx_eq(Weight::new(0.5), 1e-6));
    }
}
