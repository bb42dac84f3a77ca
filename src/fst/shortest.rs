//! Shortest distance, single best path, and small path enumerations.
//!
//! Distances use a FIFO relaxation queue, which tolerates negative arcs as long
//! as there is no negative cycle. Relaxation is strict (`<`), so among paths of
//! exactly equal weight the one discovered first keeps its predecessor; with
//! arcs visited in stored order this makes the result deterministic.

use super::vector::{Arc, Fst, StateId, label_char};
use super::weight::Weight;
use std::collections::VecDeque;

/// The cheapest accepted path, spelled out on both tapes.
#[derive(Debug, Clone, PartialEq)]
pub struct BestPath {
    pub input: String,
    pub output: String,
    pub weight: Weight,
}

/// Upper bound on arcs per enumerated path, so cyclic graphs terminate.
const MAX_PATH_ARCS: usize = 256;

impl Fst {
    /// Cheapest distance from the start to every state, with the arc that
    /// achieved it. `None` when relaxation detects a negative cycle.
    fn relax_from_start(&self) -> Option<(Vec<Weight>, Vec<Option<(StateId, usize)>>)> {
        let n = self.num_states();
        let mut dist = vec![Weight::ZERO; n];
        let mut pred: Vec<Option<(StateId, usize)>> = vec![None; n];
        let Some(start) = self.start() else { return Some((dist, pred)) };

        let mut queued = vec![false; n];
        let mut relaxed = vec![0usize; n];
        let mut queue = VecDeque::from([start]);
        dist[start] = Weight::ONE;
        queued[start] = true;

        while let Some(s) = queue.pop_front() {
            queued[s] = false;
            let ds = dist[s];
            for (i, arc) in self.arcs(s).iter().enumerate() {
                let t = arc.nextstate;
                let candidate = ds.times(arc.weight);
                if candidate.value() < dist[t].value() {
                    relaxed[t] += 1;
                    if relaxed[t] > n {
                        return None;
                    }
                    dist[t] = candidate;
                    pred[t] = Some((s, i));
                    if !queued[t] {
                        queued[t] = true;
                        queue.push_back(t);
                    }
                }
            }
        }
        Some((dist, pred))
    }

    /// Cheapest distance from the start to every state (`ZERO` if unreachable).
    pub fn shortest_distance(&self) -> Vec<Weight> {
        match self.relax_from_start() {
            Some((dist, _)) => dist,
            None => vec![Weight::ZERO; self.num_states()],
        }
    }

    /// The single cheapest accepted path. Ties go to the lowest final state.
    pub fn shortest_path(&self) -> Option<BestPath> {
        let (dist, pred) = self.relax_from_start()?;
        let mut best: Option<(StateId, Weight)> = None;
        for (f, fw) in self.finals() {
            let total = dist[f].times(fw);
            if total.is_zero() {
                continue;
            }
            if best.is_none_or(|(_, w)| total.value() < w.value()) {
                best = Some((f, total));
            }
        }
        let (mut state, weight) = best?;

        let mut arcs: Vec<Arc> = Vec::new();
        while let Some((prev, i)) = pred[state] {
            arcs.push(self.arcs(prev)[i]);
            state = prev;
            if arcs.len() > self.num_states() {
                return None;
            }
        }
        arcs.reverse();
        let input = arcs.iter().filter_map(|a| label_char(a.ilabel)).collect();
        let output = arcs.iter().filter_map(|a| label_char(a.olabel)).collect();
        Some(BestPath { input, output, weight })
    }

    /// Best output for `input`, with its weight.
    pub fn best_output(&self, input: &str) -> Option<(String, Weight)> {
        Fst::accept(input).compose(self).shortest_path().map(|p| (p.output, p.weight))
    }

    /// Best output for `input`.
    pub fn apply(&self, input: &str) -> Option<String> {
        self.best_output(input).map(|(out, _)| out)
    }

    /// Up to `limit` accepted paths in depth-first arc order.
    pub fn paths(&self, limit: usize) -> Vec<BestPath> {
        let mut found = Vec::new();
        let Some(start) = self.start() else { return found };
        let mut stack = vec![(start, String::new(), String::new(), Weight::ONE, 0usize)];
        while let Some((s, input, output, weight, depth)) = stack.pop() {
            if found.len() >= limit {
                break;
            }
            if let Some(fw) = self.final_weight(s) {
                found.push(BestPath { input: input.clone(), output: output.clone(), weight: weight.times(fw) });
            }
            if depth >= MAX_PATH_ARCS {
                continue;
            }
            for arc in self.arcs(s).iter().rev() {
                let mut i = input.clone();
                let mut o = output.clone();
                i.extend(label_char(arc.ilabel));
                o.extend(label_char(arc.olabel));
                stack.push((arc.nextstate, i, o, weight.times(arc.weight), depth + 1));
            }
        }
        found
    }

    /// Every output (up to `limit`) that `self` produces for `input`.
    pub fn paths_for(&self, input: &str, limit: usize) -> Vec<String> {
        Fst::accept(input).compose(self).paths(limit).into_iter().map(|p| p.output).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fst::{EPSILON, label};

    #[test]
    fn picks_cheapest_branch() {
        let fst = Fst::cross("a", "x").add_weight(2.0) | Fst::cross("a", "y").add_weight(1.0);
        let best = fst.best_output("a").expect("path");
        assert_eq!(best.0, "y");
        assert!(best.1.approx_eq(Weight::new(1.0), 1e-6));
    }

    #[test]
    fn negative_arcs_are_handled() {
        let mut fst = Fst::new();
        let s0 = fst.add_state();
        let s1 = fst.add_state();
        let s2 = fst.add_state();
        fst.set_start(s0);
        fst.add_arc(s0, Arc::new(label('a'), label('a'), Weight::new(1.0), s2));
        fst.add_arc(s0, Arc::new(label('b'), label('b'), Weight::new(2.0), s1));
        fst.add_arc(s1, Arc::new(EPSILON, EPSILON, Weight::new(-1.5), s2));
        fst.set_final(s2, Weight::ONE);
        let best = fst.shortest_path().expect("path");
        assert_eq!(best.output, "b");
        assert!(best.weight.approx_eq(Weight::new(0.5), 1e-6));
    }

    #[test]
    fn equal_weights_keep_first_branch() {
        let fst = Fst::cross("a", "first") | Fst::cross("a", "second");
        assert_eq!(fst.apply("a").as_deref(), Some("first"));
        assert_eq!(fst.optimize().apply("a").as_deref(), Some("first"));
    }

    #[test]
    fn paths_lists_every_alternative() {
        let fst = Fst::string_map([("a", "1"), ("a", "2"), ("b", "3")]);
        let mut outs = fst.paths_for("a", 10);
        outs.sort();
        assert_eq!(outs, vec!["1".to_string(), "2".to_string()]);
    }
}
