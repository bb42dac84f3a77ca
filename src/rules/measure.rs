//! Quantities with a unit: `5 km` -> `integer: "five" units: "kilometers"`,
//! `2.5 kg` -> `integer_part: "two" fractional_part: "five" units: "kilograms"`.
//!
//! The space before the unit is optional. Exactly one takes the singular
//! unit name.

use super::cardinal::NumberNames;
use crate::error::Result;
use crate::fst::Fst;
use crate::grammar::{Classifier, GrammarContext, Verbalizer};
use crate::priority::{Priority, prioritized};

#[derive(Debug, Clone)]
pub struct Measure {
    classify: Fst,
    verbalize: Fst,
}

impl Measure {
    pub(crate) fn new(ctx: &GrammarContext, numbers: &NumberNames) -> Result<Self> {
        let plural = ctx.table("measure_units")?;
        let singular = ctx.table("measure_units_singular")?;
        let gap = ctx.delete_space() + Fst::insert(" ");

        let fractional = ctx.digit().plus().compose(&numbers.spelled);
        let decimal =
            ctx.field("integer_part", &numbers.names) + Fst::cross(".", " ") + ctx.field("fractional_part", &fractional);
        let one = ctx.field("integer", &Fst::accept("1").compose(&numbers.names));

        let amount = prioritized(&[
            (Priority::Generic, ctx.field("integer", &numbers.names) + &gap + ctx.field("units", &plural)),
            (Priority::Generic, decimal + &gap + ctx.field("units", &plural)),
            (Priority::SpecialIdiom, one + &gap + ctx.field("units", &singular)),
        ]);
        let negative = Fst::cross("-", "negative: \"true\" ").optional();
        let classify = (negative + amount).optimize();

        let minus = ctx.word("negative")?;
        let point = ctx.word("point")?;
        let space = Fst::accept(" ");
        let number = ctx.read_field("integer")
            | (ctx.read_field("integer_part") + Fst::cross(" ", &format!(" {point} ")) + ctx.read_field("fractional_part"));
        let verbalize = ((ctx.read_flag("negative", "true", &format!("{minus} ")) + Fst::delete(" ")).optional()
            + number
            + &space
            + ctx.read_field("units"))
        .optimize();

        Ok(Measure { classify, verbalize })
    }
}

impl Classifier for Measure {
    fn category(&self) -> &'static str {
        "measure"
    }

    fn priority(&self) -> Priority {
        Priority::Generic
    }

    fn classify(&self) -> &Fst {
        &self.classify
    }
}

impl Verbalizer for Measure {
    fn category(&self) -> &'static str {
        "measure"
    }

    fn verbalize(&self) -> &Fst {
        &self.verbalize
    }

    fn field_order(&self) -> &[&'static str] {
        &["negative", "integer", "integer_part", "fractional_part", "units"]
    }
}
