//! The standard clean-up pass applied after every non-trivial construction.

use super::props::FstProperties;
use super::vector::Fst;

/// Floor for the determinization budget; larger inputs get four times their
/// own size.
const DETERMINIZE_MIN_BUDGET: usize = 20_000;

impl Fst {
    /// Epsilon removal, encoded determinization when it stays within budget,
    /// trimming, and input arc sorting.
    ///
    /// The weighted language is unchanged.
    pub fn optimize(&self) -> Fst {
        let mut fst = if self.properties().contains(FstProperties::EPSILONS) {
            self.rm_epsilon()
        } else {
            self.connect()
        };
        let budget = DETERMINIZE_MIN_BUDGET.max(fst.num_states() * 4);
        if let Some(det) = fst.determinize_encoded(budget) {
            fst = det.connect();
        } else {
            tracing::debug!(states = fst.num_states(), budget, "determinization skipped: over budget");
        }
        fst.arc_sort_input();
        fst
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optimize_preserves_outputs_and_shrinks() {
        let map = Fst::string_map([("1", "one"), ("2", "two"), ("3", "three")]);
        let graph = (map.clone() + Fst::accept(" ")).closure() + map;
        let opt = graph.optimize();
        assert!(opt.num_states() <= graph.num_states());
        assert!(opt.is_input_sorted());
        assert_eq!(opt.apply("1 2 3").as_deref(), Some("one two three"));
    }
}
