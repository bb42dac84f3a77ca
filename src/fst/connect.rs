//! Trimming: keep only states that lie on some start-to-final path.

use super::vector::{Arc, Fst, StateId};

impl Fst {
    /// Removes states that are unreachable from the start or cannot reach a
    /// final state. Surviving states keep their relative order.
    pub fn connect(&self) -> Fst {
        let Some(start) = self.start() else { return Fst::new() };
        let n = self.num_states();

        let mut access = vec![false; n];
        let mut stack = vec![start];
        access[start] = true;
        while let Some(s) = stack.pop() {
            for arc in self.arcs(s) {
                if !access[arc.nextstate] {
                    access[arc.nextstate] = true;
                    stack.push(arc.nextstate);
                }
            }
        }

        let mut reverse: Vec<Vec<StateId>> = vec![Vec::new(); n];
        for s in self.states() {
            for arc in self.arcs(s) {
                reverse[arc.nextstate].push(s);
            }
        }
        let mut coaccess = vec![false; n];
        let mut stack: Vec<StateId> = self.finals().map(|(f, _)| f).collect();
        for &f in &stack {
            coaccess[f] = true;
        }
        while let Some(s) = stack.pop() {
            for &p in &reverse[s] {
                if !coaccess[p] {
                    coaccess[p] = true;
                    stack.push(p);
                }
            }
        }

        if !coaccess[start] {
            return Fst::new();
        }

        let mut remap: Vec<Option<StateId>> = vec![None; n];
        let mut out = Fst::new();
        for s in self.states() {
            if access[s] && coaccess[s] {
                remap[s] = Some(out.add_state());
            }
        }
        for s in self.states() {
            let Some(ns) = remap[s] else { continue };
            if let Some(w) = self.final_weight(s) {
                out.set_final(ns, w);
            }
            for arc in self.arcs(s) {
                if let Some(t) = remap[arc.nextstate] {
                    out.add_arc(ns, Arc { nextstate: t, ..*arc });
                }
            }
        }
        if let Some(s) = remap[start] {
            out.set_start(s);
        }
        if self.is_input_sorted() {
            out.arc_sort_input();
        }
        out
    }
}
