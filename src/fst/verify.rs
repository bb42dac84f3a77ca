//! Static checks run on grammars before they are used.
//!
//! - [`check_negative_cycles`]: a negative-weight cycle makes "cheapest path"
//!   meaningless, so it is a configuration error.
//! - [`worst_case_weight`]: an upper bound on what one pass through a grammar
//!   can cost, used to prove the fallback category can never beat a real one.
//!
//! Both work on the strongly connected components of the graph.

use super::vector::{Fst, StateId};
use crate::error::{Error, Result};
use std::collections::VecDeque;

/// Strongly connected components in reverse topological order (sinks first),
/// plus the component index of every state.
pub(crate) fn strongly_connected(fst: &Fst) -> (Vec<Vec<StateId>>, Vec<usize>) {
    const UNVISITED: usize = usize::MAX;
    let n = fst.num_states();
    let mut index = vec![UNVISITED; n];
    let mut lowlink = vec![0usize; n];
    let mut on_stack = vec![false; n];
    let mut comp = vec![UNVISITED; n];
    let mut stack: Vec<StateId> = Vec::new();
    let mut components: Vec<Vec<StateId>> = Vec::new();
    let mut counter = 0;

    for root in fst.states() {
        if index[root] != UNVISITED {
            continue;
        }
        let mut work: Vec<(StateId, usize)> = vec![(root, 0)];
        index[root] = counter;
        lowlink[root] = counter;
        counter += 1;
        stack.push(root);
        on_stack[root] = true;

        while let Some(top) = work.last_mut() {
            let (s, next) = *top;
            let arcs = fst.arcs(s);
            if next < arcs.len() {
                top.1 += 1;
                let t = arcs[next].nextstate;
                if index[t] == UNVISITED {
                    index[t] = counter;
                    lowlink[t] = counter;
                    counter += 1;
                    stack.push(t);
                    on_stack[t] = true;
                    work.push((t, 0));
                } else if on_stack[t] {
                    lowlink[s] = lowlink[s].min(index[t]);
                }
                continue;
            }
            work.pop();
            if let Some(&(parent, _)) = work.last() {
                lowlink[parent] = lowlink[parent].min(lowlink[s]);
            }
            if lowlink[s] == index[s] {
                let id = components.len();
                let mut members = Vec::new();
                while let Some(m) = stack.pop() {
                    on_stack[m] = false;
                    comp[m] = id;
                    members.push(m);
                    if m == s {
                        break;
                    }
                }
                members.sort_unstable();
                components.push(members);
            }
        }
    }
    (components, comp)
}

/// Fails with [`Error::NegativeCycle`] if any cycle has negative total weight.
pub fn check_negative_cycles(fst: &Fst, grammar: &str) -> Result<()> {
    let (components, comp) = strongly_connected(fst);
    for (id, members) in components.iter().enumerate() {
        let internal_negative = members
            .iter()
            .any(|&s| fst.arcs(s).iter().any(|a| comp[a.nextstate] == id && a.weight.value() < 0.0));
        if !internal_negative {
            continue;
        }
        if let Some(state) = negative_cycle_in(fst, members, &comp, id) {
            return Err(Error::NegativeCycle { grammar: grammar.to_string(), state });
        }
    }
    Ok(())
}

/// Queue-based relaxation inside one component, every member starting at 0.
/// A state relaxed as many times as the component has members sits on a
/// negative cycle.
fn negative_cycle_in(fst: &Fst, members: &[StateId], comp: &[usize], id: usize) -> Option<StateId> {
    let limit = members.len();
    let mut dist: std::collections::HashMap<StateId, f32> = members.iter().map(|&s| (s, 0.0)).collect();
    let mut count: std::collections::HashMap<StateId, usize> = std::collections::HashMap::new();
    let mut queued: std::collections::HashSet<StateId> = members.iter().copied().collect();
    let mut queue: VecDeque<StateId> = members.iter().copied().collect();
    while let Some(s) = queue.pop_front() {
        queued.remove(&s);
        let ds = dist[&s];
        for arc in fst.arcs(s) {
            let t = arc.nextstate;
            if comp[t] != id {
                continue;
            }
            let candidate = ds + arc.weight.value();
            if candidate < dist[&t] - 1e-6 {
                dist.insert(t, candidate);
                let c = count.entry(t).or_insert(0);
                *c += 1;
                if *c >= limit {
                    return Some(t);
                }
                if queued.insert(t) {
                    queue.push_back(t);
                }
            }
        }
    }
    None
}

/// Upper bound on the weight of a start-to-final path that takes each loop at
/// most once.
///
/// Computed on the condensation graph: crossing arcs and final weights count
/// their positive part, and a component with internal arcs adds its heaviest
/// positive internal arc once. Returns `None` for an empty language.
pub fn worst_case_weight(fst: &Fst) -> Option<f32> {
    let start = fst.start()?;
    let (components, comp) = strongly_connected(fst);
    let mut heaviest: Vec<Option<f32>> = vec![None; components.len()];

    // Sinks come first, so successors are always resolved before use.
    for (id, members) in components.iter().enumerate() {
        let mut internal = 0.0f32;
        let mut best: Option<f32> = None;
        for &s in members {
            if let Some(fw) = fst.final_weight(s) {
                best = Some(best.map_or(fw.value().max(0.0), |b| b.max(fw.value().max(0.0))));
            }
            for arc in fst.arcs(s) {
                let w = arc.weight.value().max(0.0);
                let t = comp[arc.nextstate];
                if t == id {
                    internal = internal.max(w);
                } else if let Some(h) = heaviest[t] {
                    best = Some(best.map_or(w + h, |b| b.max(w + h)));
                }
            }
        }
        heaviest[id] = best.map(|b| b + internal);
    }
    heaviest[comp[start]]
}
