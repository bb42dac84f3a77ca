//! The weighted union of every category grammar.
//!
//! Each category's body is wrapped in its markers (`cardinal { ... }`) and
//! biased by its priority level plus its declaration rank within the level.
//! The fallback category takes the configured
//! fallback weight instead, which must strictly exceed the combined worst-case
//! weight of all other categories.

use super::metrics::GrammarMetrics;
use crate::error::{Error, Result};
use crate::fst::{Fst, check_negative_cycles, worst_case_weight};
use crate::priority::Priority;
use crate::rules::Grammars;
use std::collections::HashMap;
use std::time::Duration;

/// Classification union plus the statistics gathered while checking it.
pub(crate) struct ClassifyUnion {
    pub fst: Fst,
    pub grammars: Vec<GrammarMetrics>,
    pub worst_case_total: f32,
}

pub(crate) fn classify_union(grammars: &Grammars, fallback_weight: f32) -> Result<ClassifyUnion> {
    let mut branches = Vec::with_capacity(grammars.classifiers.len());
    let mut metrics = Vec::with_capacity(grammars.classifiers.len());
    let mut worst_case_total = 0.0f32;
    let mut has_fallback = false;
    let mut ranks: HashMap<Priority, usize> = HashMap::new();

    for classifier in &grammars.classifiers {
        let category = classifier.category();
        let fst = classifier.classify();
        check_negative_cycles(fst, category)?;

        let Some(worst) = worst_case_weight(fst) else {
            tracing::warn!(category, "category grammar accepts nothing; skipped");
            continue;
        };
        let priority = classifier.priority();
        let bias = if priority == Priority::Fallback {
            has_fallback = true;
            fallback_weight
        } else {
            let rank = ranks.entry(priority).or_default();
            let bias = priority.declared_bias(*rank);
            *rank += 1;
            if bias >= priority.ceiling() {
                return Err(Error::Config(format!(
                    "too many {} categories: `{category}` would cost as much as the next level",
                    priority.name()
                )));
            }
            worst_case_total += bias + worst;
            bias
        };

        let duration = grammars
            .timings
            .iter()
            .find(|(name, _)| *name == category)
            .map_or(Duration::ZERO, |(_, d)| *d);
        metrics.push(GrammarMetrics {
            category,
            priority,
            states: fst.num_states(),
            arcs: fst.num_arcs(),
            worst_case: worst,
            duration,
        });

        let wrapped = Fst::insert(&format!("{category} {{ ")) + fst + Fst::insert(" }");
        branches.push(wrapped.add_weight(bias));
    }

    if !has_fallback {
        return Err(Error::Config("no fallback category registered".to_string()));
    }
    if fallback_weight <= worst_case_total {
        return Err(Error::FallbackNotDominant { fallback: fallback_weight, worst: worst_case_total });
    }
    tracing::debug!(categories = branches.len(), worst_case_total, fallback_weight, "classification union checked");

    Ok(ClassifyUnion { fst: Fst::union_all(branches.iter()).connect(), grammars: metrics, worst_case_total })
}
