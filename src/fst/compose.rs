//! Lazy composition with a three-state epsilon filter.
//!
//! ```text
//!   (qa, qb, f) --a:x / x:b-->  (qa', qb', 0)     real match
//!   (qa, qb, 0) --a:ε / ε:b-->  (qa', qb', 0)     both sides move on epsilon
//!   (qa, qb, f) --a:ε-------->  (qa', qb,  2)     A alone, f != 1
//!   (qa, qb, f) ---------ε:b->  (qa,  qb', 1)     B alone, f != 2
//! ```
//!
//! The filter admits exactly one interleaving of epsilon moves between two
//! real matches (paired moves first, then the leftover side), so composing
//! never duplicates paths. Only the pairs reachable from the start are built,
//! in breadth-first order.

use super::vector::{Arc, EPSILON, Fst, StateId};
use std::borrow::Cow;
use std::collections::{HashMap, VecDeque};

type Triple = (StateId, StateId, u8);

struct Product {
    out: Fst,
    index: HashMap<Triple, StateId>,
    queue: VecDeque<Triple>,
}

impl Product {
    fn intern(&mut self, triple: Triple) -> StateId {
        if let Some(&s) = self.index.get(&triple) {
            return s;
        }
        let s = self.out.add_state();
        self.index.insert(triple, s);
        self.queue.push_back(triple);
        s
    }
}

impl Fst {
    /// Relational composition: `self` feeds its output tape into `other`.
    pub fn compose(&self, other: &Fst) -> Fst {
        let (Some(a0), Some(b0)) = (self.start(), other.start()) else { return Fst::new() };
        let b: Cow<'_, Fst> = if other.is_input_sorted() {
            Cow::Borrowed(other)
        } else {
            let mut sorted = other.clone();
            sorted.arc_sort_input();
            Cow::Owned(sorted)
        };

        let mut p = Product { out: Fst::new(), index: HashMap::new(), queue: VecDeque::new() };
        let start = p.intern((a0, b0, 0));
        p.out.set_start(start);

        while let Some(triple) = p.queue.pop_front() {
            let (qa, qb, filter) = triple;
            let s = p.index[&triple];
            if let (Some(wa), Some(wb)) = (self.final_weight(qa), b.final_weight(qb)) {
                p.out.set_final(s, wa.times(wb));
            }

            for arc_a in self.arcs(qa) {
                if arc_a.olabel == EPSILON {
                    if filter != 1 {
                        let t = p.intern((arc_a.nextstate, qb, 2));
                        p.out.add_arc(s, Arc::new(arc_a.ilabel, EPSILON, arc_a.weight, t));
                    }
                    if filter == 0 {
                        for arc_b in b.arcs_with_input(qb, EPSILON) {
                            let t = p.intern((arc_a.nextstate, arc_b.nextstate, 0));
                            p.out.add_arc(s, Arc::new(arc_a.ilabel, arc_b.olabel, arc_a.weight.times(arc_b.weight), t));
                        }
                    }
                } else {
                    for arc_b in b.arcs_with_input(qb, arc_a.olabel) {
                        let t = p.intern((arc_a.nextstate, arc_b.nextstate, 0));
                        p.out.add_arc(s, Arc::new(arc_a.ilabel, arc_b.olabel, arc_a.weight.times(arc_b.weight), t));
                    }
                }
            }

            if filter != 2 {
                for arc_b in b.arcs_with_input(qb, EPSILON) {
                    let t = p.intern((qa, arc_b.nextstate, 1));
                    p.out.add_arc(s, Arc::new(EPSILON, arc_b.olabel, arc_b.weight, t));
                }
            }
        }

        p.out.connect()
    }
}
