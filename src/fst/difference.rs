//! Language difference.

use super::dfa::Dfa;
use super::vector::{Arc, EPSILON, Fst, StateId};
use std::collections::{HashMap, VecDeque};

impl Fst {
    /// Removes every path of `self` whose input string `other` accepts.
    ///
    /// `other` is read as an unweighted acceptor over its input tape. For an
    /// acceptor `self` this is plain language difference; for a transducer it
    /// restricts the domain and keeps outputs and weights untouched.
    pub fn difference(&self, other: &Fst) -> Fst {
        let Some(a0) = self.start() else { return Fst::new() };
        let mut alphabet = self.input_labels();
        alphabet.extend(other.input_labels());
        let dfa = Dfa::from_input(other, &alphabet);

        let mut out = Fst::new();
        let mut index: HashMap<(StateId, usize), StateId> = HashMap::new();
        let mut queue: VecDeque<(StateId, usize)> = VecDeque::new();
        let start = out.add_state();
        out.set_start(start);
        index.insert((a0, dfa.start()), start);
        queue.push_back((a0, dfa.start()));

        while let Some((qa, qd)) = queue.pop_front() {
            let s = index[&(qa, qd)];
            match self.final_weight(qa) {
                Some(w) if !dfa.is_final(qd) => out.set_final(s, w),
                _ => {}
            }
            for arc in self.arcs(qa) {
                let nd = if arc.ilabel == EPSILON { qd } else { dfa.step(qd, arc.ilabel) };
                let key = (arc.nextstate, nd);
                let t = match index.get(&key) {
                    Some(&t) => t,
                    None => {
                        let t = out.add_state();
                        index.insert(key, t);
                        queue.push_back(key);
                        t
                    }
                };
                out.add_arc(s, Arc { nextstate: t, ..*arc });
            }
        }
        out.connect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_listed_strings() {
        let digits = Fst::any_of('0'..='9').repeat(1, Some(3));
        let rest = digits.difference(&(Fst::accept("000") | Fst::accept("12")));
        let cases = vec![("000", false), ("12", false), ("120", true), ("7", true)];
        for (input, accepted) in cases {
            assert_eq!(rest.apply(input).is_some(), accepted, "difference on {input:?}");
        }
    }

    #[test]
    fn restricts_transducer_domain() {
        let map = Fst::string_map([("1", "one"), ("2", "two")]);
        let only_two = map.difference(&Fst::accept("1"));
        assert_eq!(only_two.apply("2").as_deref(), Some("two"));
        assert_eq!(only_two.apply("1"), None);
    }
}
