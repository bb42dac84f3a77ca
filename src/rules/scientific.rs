//! Scientific notation: `1.5e-3` -> `mantissa: "one point five" sign: "minus"
//! exponent: "three"`. The exponent marker is `e` or `E`.

use super::cardinal::NumberNames;
use crate::error::Result;
use crate::fst::Fst;
use crate::grammar::{Classifier, GrammarContext, Verbalizer};
use crate::priority::Priority;

#[derive(Debug, Clone)]
pub struct Scientific {
    classify: Fst,
    verbalize: Fst,
}

impl Scientific {
    pub(crate) fn new(ctx: &GrammarContext, numbers: &NumberNames) -> Result<Self> {
        let minus = ctx.word("negative")?;
        let plus = ctx.word("plus")?;
        let point = ctx.word("point")?;

        let fractional = ctx.digit().plus().compose(&numbers.spelled);
        let mantissa = Fst::cross("-", &format!("{minus} ")).optional()
            + &numbers.names
            + (Fst::cross(".", &format!(" {point} ")) + fractional).optional();
        let marker = Fst::delete("e") | Fst::delete("E");
        let sign = Fst::cross("-", &minus) | Fst::cross("+", &plus);

        let classify = (ctx.field("mantissa", &mantissa)
            + marker
            + (Fst::insert(" ") + ctx.field("sign", &sign)).optional()
            + Fst::insert(" ")
            + ctx.field("exponent", &numbers.names))
        .optimize();

        let times = ctx.word("scientific_exponent")?;
        let space = Fst::accept(" ");
        let verbalize = (ctx.read_field("mantissa")
            + Fst::insert(&format!(" {times}"))
            + (&space + ctx.read_field("sign")).optional()
            + &space
            + ctx.read_field("exponent"))
        .optimize();

        Ok(Scientific { classify, verbalize })
    }
}

impl Classifier for Scientific {
    fn category(&self) -> &'static str {
        "scientific"
    }

    fn priority(&self) -> Priority {
        Priority::SpecialIdiom
    }

    fn classify(&self) -> &Fst {
        &self.classify
    }
}

impl Verbalizer for Scientific {
    fn category(&self) -> &'static str {
        "scientific"
    }

    fn verbalize(&self) -> &Fst {
        &self.verbalize
    }

    fn field_order(&self) -> &[&'static str] {
        &["mantissa", "sign", "exponent"]
    }
}
