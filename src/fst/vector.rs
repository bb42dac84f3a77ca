//! Mutable, vector-backed weighted transducer.
//!
//! ```text
//!   states: Vec<State>
//!     State { arcs: Vec<Arc>, final_weight: Option<Weight> }
//!     Arc   { ilabel, olabel, weight, nextstate }
//! ```
//!
//! States are dense indices. Arcs live on their source state in insertion
//! order, which every algorithm in this crate preserves so that results are a
//! pure function of how a grammar was written.

use super::props::FstProperties;
use super::weight::Weight;
use serde::{Deserialize, Serialize};

pub type StateId = usize;
pub type Label = u32;

/// The empty label.
pub const EPSILON: Label = 0;

/// Label for a character.
pub fn label(c: char) -> Label {
    c as Label
}

/// Character for a non-epsilon label.
pub fn label_char(l: Label) -> Option<char> {
    if l == EPSILON { None } else { char::from_u32(l) }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    pub ilabel: Label,
    pub olabel: Label,
    pub weight: Weight,
    pub nextstate: StateId,
}

impl Arc {
    pub fn new(ilabel: Label, olabel: Label, weight: Weight, nextstate: StateId) -> Self {
        Arc { ilabel, olabel, weight, nextstate }
    }

    pub(crate) fn is_epsilon(&self) -> bool {
        self.ilabel == EPSILON && self.olabel == EPSILON
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct State {
    arcs: Vec<Arc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    final_weight: Option<Weight>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fst {
    states: Vec<State>,
    start: Option<StateId>,
    #[serde(default)]
    input_sorted: bool,
}

impl Fst {
    /// An automaton with no states; it accepts nothing.
    pub fn new() -> Self {
        Fst::default()
    }

    pub fn add_state(&mut self) -> StateId {
        self.states.push(State::default());
        self.states.len() - 1
    }

    pub fn add_arc(&mut self, from: StateId, arc: Arc) {
        debug_assert!(arc.nextstate < self.states.len(), "arc target out of range");
        debug_assert!(!arc.weight.is_zero(), "arcs never carry ZERO");
        self.input_sorted = false;
        self.states[from].arcs.push(arc);
    }

    pub fn set_start(&mut self, state: StateId) {
        self.start = Some(state);
    }

    /// Marks `state` final with `weight`; `Weight::ZERO` makes it non-final.
    pub fn set_final(&mut self, state: StateId, weight: Weight) {
        self.states[state].final_weight = if weight.is_zero() { None } else { Some(weight) };
    }

    pub fn start(&self) -> Option<StateId> {
        self.start
    }

    pub fn final_weight(&self, state: StateId) -> Option<Weight> {
        self.states[state].final_weight
    }

    pub fn is_final(&self, state: StateId) -> bool {
        self.states[state].final_weight.is_some()
    }

    pub fn arcs(&self, state: StateId) -> &[Arc] {
        &self.states[state].arcs
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    pub fn num_arcs(&self) -> usize {
        self.states.iter().map(|s| s.arcs.len()).sum()
    }

    pub fn states(&self) -> std::ops::Range<StateId> {
        0..self.states.len()
    }

    pub fn is_input_sorted(&self) -> bool {
        self.input_sorted
    }

    pub fn properties(&self) -> FstProperties {
        FstProperties::compute(self)
    }

    /// Stable sort of every state's arcs by input label.
    pub fn arc_sort_input(&mut self) {
        for state in &mut self.states {
            state.arcs.sort_by_key(|a| a.ilabel);
        }
        self.input_sorted = true;
    }

    /// Arcs of `state` whose input label is `ilabel`.
    ///
    /// Uses binary search when the arcs are input-sorted, a scan otherwise.
    pub fn arcs_with_input(&self, state: StateId, ilabel: Label) -> ArcsWithInput<'_> {
        let arcs = self.arcs(state);
        if self.input_sorted {
            let lo = arcs.partition_point(|a| a.ilabel < ilabel);
            let hi = lo + arcs[lo..].partition_point(|a| a.ilabel == ilabel);
            ArcsWithInput { arcs: &arcs[lo..hi], ilabel, filter: false }
        } else {
            ArcsWithInput { arcs, ilabel, filter: true }
        }
    }

    /// Copies every state of `other` into `self` and returns the index offset
    /// of the copied states.
    pub(crate) fn append(&mut self, other: &Fst) -> StateId {
        let offset = self.states.len();
        self.input_sorted = false;
        for state in &other.states {
            let arcs = state
                .arcs
                .iter()
                .map(|a| Arc { nextstate: a.nextstate + offset, ..*a })
                .collect();
            self.states.push(State { arcs, final_weight: state.final_weight });
        }
        offset
    }

    pub(crate) fn arcs_mut(&mut self, state: StateId) -> &mut Vec<Arc> {
        self.input_sorted = false;
        &mut self.states[state].arcs
    }

    /// Final states in index order.
    pub(crate) fn finals(&self) -> impl Iterator<Item = (StateId, Weight)> + '_ {
        self.states.iter().enumerate().filter_map(|(i, s)| s.final_weight.map(|w| (i, w)))
    }

    /// True when the automaton accepts no string at all.
    pub fn is_empty(&self) -> bool {
        let Some(start) = self.start else { return true };
        let mut seen = vec![false; self.states.len()];
        let mut stack = vec![start];
        seen[start] = true;
        while let Some(s) = stack.pop() {
            if self.is_final(s) {
                return false;
            }
            for arc in self.arcs(s) {
                if !seen[arc.nextstate] {
                    seen[arc.nextstate] = true;
                    stack.push(arc.nextstate);
                }
            }
        }
        true
    }
}

/// Iterator returned by [`Fst::arcs_with_input`].
pub struct ArcsWithInput<'a> {
    arcs: &'a [Arc],
    ilabel: Label,
    filter: bool,
}

impl<'a> Iterator for ArcsWithInput<'a> {
    type Item = &'a Arc;

    fn next(&mut self) -> Option<&'a Arc> {
        while let Some((first, rest)) = self.arcs.split_first() {
            self.arcs = rest;
            if !self.filter || first.ilabel == self.ilabel {
                return Some(first);
            }
        }
        None
    }
}
