//! Structural properties of a transducer, computed on demand.

use super::vector::{EPSILON, Fst, StateId};
use bitflags::bitflags;
use std::collections::BTreeSet;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FstProperties: u32 {
        /// Every arc has `ilabel == olabel`.
        const ACCEPTOR          = 1 << 0;
        /// Some arc is epsilon on both tapes.
        const EPSILONS          = 1 << 1;
        /// Some arc has an epsilon input label.
        const I_EPSILONS        = 1 << 2;
        /// Some arc has an epsilon output label.
        const O_EPSILONS        = 1 << 3;
        /// Some arc or final weight differs from `Weight::ONE`.
        const WEIGHTED          = 1 << 4;
        /// A cycle is reachable from the start state.
        const CYCLIC            = 1 << 5;
        /// Arcs are sorted by input label.
        const I_LABEL_SORTED    = 1 << 6;
        /// No state has two arcs with the same input label, nor input epsilons.
        const I_DETERMINISTIC   = 1 << 7;
    }
}

impl FstProperties {
    pub(crate) fn compute(fst: &Fst) -> FstProperties {
        let mut props = FstProperties::ACCEPTOR | FstProperties::I_DETERMINISTIC;
        if fst.is_input_sorted() {
            props |= FstProperties::I_LABEL_SORTED;
        }
        for s in fst.states() {
            if fst.final_weight(s).is_some_and(|w| w.value() != 0.0) {
                props |= FstProperties::WEIGHTED;
            }
            let mut seen = BTreeSet::new();
            for arc in fst.arcs(s) {
                if arc.ilabel != arc.olabel {
                    props.remove(FstProperties::ACCEPTOR);
                }
                if arc.ilabel == EPSILON {
                    props |= FstProperties::I_EPSILONS;
                    props.remove(FstProperties::I_DETERMINISTIC);
                }
                if arc.olabel == EPSILON {
                    props |= FstProperties::O_EPSILONS;
                }
                if arc.is_epsilon() {
                    props |= FstProperties::EPSILONS;
                }
                if arc.weight.value() != 0.0 {
                    props |= FstProperties::WEIGHTED;
                }
                if !seen.insert(arc.ilabel) {
                    props.remove(FstProperties::I_DETERMINISTIC);
                }
            }
        }
        if has_cycle(fst) {
            props |= FstProperties::CYCLIC;
        }
        props
    }
}

/// Iterative three-color DFS from the start state.
fn has_cycle(fst: &Fst) -> bool {
    let Some(start) = fst.start() else { return false };
    // 0 = white, 1 = on stack, 2 = done
    let mut color = vec![0u8; fst.num_states()];
    let mut stack: Vec<(StateId, usize)> = vec![(start, 0)];
    color[start] = 1;
    while let Some(top) = stack.last_mut() {
        let (s, next) = *top;
        let arcs = fst.arcs(s);
        if next < arcs.len() {
            top.1 += 1;
            let t = arcs[next].nextstate;
            match color[t] {
                0 => {
                    color[t] = 1;
                    stack.push((t, 0));
                }
                1 => return true,
                _ => {}
            }
        } else {
            color[s] = 2;
            stack.pop();
        }
    }
    false
}
