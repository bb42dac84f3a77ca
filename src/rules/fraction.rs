//! Simple fractions: `3/4` -> `numerator: "three" denominator: "four"`.
//!
//! Sits one level above arithmetic so `1/2` is not read as a division.

use super::cardinal::NumberNames;
use crate::error::Result;
use crate::fst::Fst;
use crate::grammar::{Classifier, GrammarContext, Verbalizer};
use crate::priority::Priority;

#[derive(Debug, Clone)]
pub struct Fraction {
    classify: Fst,
    verbalize: Fst,
}

impl Fraction {
    pub(crate) fn new(ctx: &GrammarContext, numbers: &NumberNames) -> Result<Self> {
        let classify = (ctx.field("numerator", &numbers.names)
            + Fst::cross("/", " ")
            + ctx.field("denominator", &numbers.names))
        .optimize();

        let over = ctx.word("over")?;
        let verbalize =
            (ctx.read_field("numerator") + Fst::cross(" ", &format!(" {over} ")) + ctx.read_field("denominator"))
                .optimize();

        Ok(Fraction { classify, verbalize })
    }
}

impl Classifier for Fraction {
    fn category(&self) -> &'static str {
        "fraction"
    }

    fn priority(&self) -> Priority {
        Priority::SpecialIdiom
    }

    fn classify(&self) -> &Fst {
        &self.classify
    }
}

impl Verbalizer for Fraction {
    fn category(&self) -> &'static str {
        "fraction"
    }

    fn verbalize(&self) -> &Fst {
        &self.verbalize
    }
}
