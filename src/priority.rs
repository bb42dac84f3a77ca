//! Named priority levels.
//!
//! Grammars never write raw float biases. Each category gets a [`Priority`],
//! which fixes the bias added to every path through that category, and each
//! competing branch inside a grammar gets one too, which fixes a smaller
//! adjustment. Lower cost wins, so the total order is
//!
//! ```text
//!   Exact  <  SpecialIdiom  <  Generic  <  Fallback
//! ```
//!
//! | level        | category bias | branch bias |
//! |--------------|---------------|-------------|
//! | Exact        | 1.01          | -0.3        |
//! | SpecialIdiom | 1.08          | -0.2        |
//! | Generic      | 1.1           |  0.0        |
//! | Fallback     | 100.0         |  1.0        |
//!
//! Categories that share a level are further ordered by declaration: the
//! n-th category registered at a level pays `n * DECLARATION_STEP` on top of
//! the level bias, so two readings of equal weight always resolve to the
//! category declared first. The step never lifts a category to the cost of
//! the next level.
//!
//! Punctuation sits outside the category scheme at [`PUNCTUATION_BIAS`].

use crate::fst::Fst;

/// Bias of a punctuation token: dearer than any real category, far cheaper
/// than the word fallback.
pub const PUNCTUATION_BIAS: f32 = 2.1;

/// Extra cost per earlier category declared at the same level.
pub const DECLARATION_STEP: f32 = 0.005;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    /// Literal whole-token matches (abbreviation lists).
    Exact,
    /// Fixed idioms that must beat the generic reading of the same text.
    SpecialIdiom,
    /// Ordinary structured categories.
    Generic,
    /// Catch-all readings.
    Fallback,
}

impl Priority {
    pub const ALL: [Priority; 4] = [Priority::Exact, Priority::SpecialIdiom, Priority::Generic, Priority::Fallback];

    /// Cost added to every path of a category at this level.
    pub fn category_bias(self) -> f32 {
        match self {
            Priority::Exact => 1.01,
            Priority::SpecialIdiom => 1.08,
            Priority::Generic => 1.1,
            Priority::Fallback => 100.0,
        }
    }

    /// Category bias of the `rank`-th category declared at this level.
    pub fn declared_bias(self, rank: usize) -> f32 {
        self.category_bias() + rank as f32 * DECLARATION_STEP
    }

    /// Lowest cost of the next dearer level; a category bias must stay
    /// below it.
    pub fn ceiling(self) -> f32 {
        match self {
            Priority::Exact => Priority::SpecialIdiom.category_bias(),
            Priority::SpecialIdiom => Priority::Generic.category_bias(),
            Priority::Generic => PUNCTUATION_BIAS,
            Priority::Fallback => f32::INFINITY,
        }
    }

    /// Cost added to one branch of a prioritized choice inside a grammar.
    pub fn branch_bias(self) -> f32 {
        match self {
            Priority::Exact => -0.3,
            Priority::SpecialIdiom => -0.2,
            Priority::Generic => 0.0,
            Priority::Fallback => 1.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Priority::Exact => "exact",
            Priority::SpecialIdiom => "special_idiom",
            Priority::Generic => "generic",
            Priority::Fallback => "fallback",
        }
    }
}

/// Union of branches, each biased by its level. Branches at the same level
/// keep their listed order for exact ties.
pub fn prioritized(branches: &[(Priority, Fst)]) -> Fst {
    let biased: Vec<Fst> = branches
        .iter()
        .map(|(p, fst)| if p.branch_bias() == 0.0 { fst.clone() } else { fst.add_weight(p.branch_bias()) })
        .collect();
    Fst::union_all(biased.iter()).optimize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_totally_ordered_by_cost() {
        for pair in Priority::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].category_bias() < pair[1].category_bias(), "{:?} vs {:?}", pair[0], pair[1]);
            assert!(pair[0].branch_bias() < pair[1].branch_bias(), "{:?} vs {:?}", pair[0], pair[1]);
        }
        assert!(Priority::Generic.category_bias() < PUNCTUATION_BIAS);
        assert!(PUNCTUATION_BIAS < Priority::Fallback.category_bias());
    }

    #[test]
    fn declaration_rank_orders_within_a_level() {
        assert_eq!(Priority::Generic.declared_bias(0), Priority::Generic.category_bias());
        assert!(Priority::Generic.declared_bias(0) < Priority::Generic.declared_bias(1));
        assert!(Priority::SpecialIdiom.declared_bias(3) < Priority::SpecialIdiom.ceiling());
        assert!(Priority::Generic.declared_bias(12) < Priority::Generic.ceiling());
        assert!(Priority::SpecialIdiom.declared_bias(5) >= Priority::SpecialIdiom.ceiling());
    }

    #[test]
    fn better_level_wins_regardless_of_order() {
        let graph = prioritized(&[
            (Priority::Generic, Fst::cross("-", "minus")),
            (Priority::SpecialIdiom, Fst::cross("-", "from")),
        ]);
        assert_eq!(graph.apply("-").as_deref(), Some("from"));
    }
}
