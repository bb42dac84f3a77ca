//! Decimal numbers: `3.14` -> `integer_part: "three" fractional_part: "one four"`.

use super::cardinal::NumberNames;
use crate::error::Result;
use crate::fst::Fst;
use crate::grammar::{Classifier, GrammarContext, Verbalizer};
use crate::priority::Priority;

#[derive(Debug, Clone)]
pub struct Decimal {
    classify: Fst,
    verbalize: Fst,
}

impl Decimal {
    pub(crate) fn new(ctx: &GrammarContext, numbers: &NumberNames) -> Result<Self> {
        let fractional = ctx.digit().plus().compose(&numbers.spelled);
        let integer = ctx.field("integer_part", &numbers.names) + Fst::insert(" ");
        let negative = Fst::cross("-", "negative: \"true\" ").optional();
        let classify =
            (negative + integer.optional() + Fst::delete(".") + ctx.field("fractional_part", &fractional)).optimize();

        let minus = ctx.word("negative")?;
        let point = ctx.word("point")?;
        let integer = (ctx.read_field("integer_part") + Fst::cross(" ", &format!(" {point} "))) | Fst::insert(&format!("{point} "));
        let verbalize = ((ctx.read_flag("negative", "true", &format!("{minus} ")) + Fst::delete(" ")).optional()
            + integer
            + ctx.read_field("fractional_part"))
        .optimize();

        Ok(Decimal { classify, verbalize })
    }
}

impl Classifier for Decimal {
    fn category(&self) -> &'static str {
        "decimal"
    }

    fn priority(&self) -> Priority {
        Priority::Generic
    }

    fn classify(&self) -> &Fst {
        &self.classify
    }
}

impl Verbalizer for Decimal {
    fn category(&self) -> &'static str {
        "decimal"
    }

    fn verbalize(&self) -> &Fst {
        &self.verbalize
    }
}
