//! Superscript exponents: `10⁻⁷` -> `base: "ten" sign: "minus" exponent: "seven"`,
//! `x²` -> `base: "x" exponent: "two"`.

use super::cardinal::NumberNames;
use crate::error::Result;
use crate::fst::Fst;
use crate::grammar::{Classifier, GrammarContext, Verbalizer};
use crate::priority::Priority;

#[derive(Debug, Clone)]
pub struct Power {
    classify: Fst,
    verbalize: Fst,
}

impl Power {
    pub(crate) fn new(ctx: &GrammarContext, numbers: &NumberNames) -> Result<Self> {
        let minus = ctx.word("negative")?;
        let plus = ctx.word("plus")?;

        let letter = ctx.alphabet().class(|c| c.is_ascii_alphabetic());
        let base = (&numbers.names | letter | ctx.table("greek")?).optimize();
        let superscript = ctx.table("superscript")?;
        let exponent = superscript.plus().compose(&numbers.names);
        let sign = Fst::cross("⁻", &minus) | Fst::cross("⁺", &plus);

        let classify = (ctx.field("base", &base)
            + (Fst::insert(" ") + ctx.field("sign", &sign)).optional()
            + Fst::insert(" ")
            + ctx.field("exponent", &exponent))
        .optimize();

        let power = ctx.word("power")?;
        let space = Fst::accept(" ");
        let verbalize = (ctx.read_field("base")
            + Fst::insert(&format!(" {power}"))
            + (&space + ctx.read_field("sign")).optional()
            + &space
            + ctx.read_field("exponent"))
        .optimize();

        Ok(Power { classify, verbalize })
    }
}

impl Classifier for Power {
    fn category(&self) -> &'static str {
        "power"
    }

    fn priority(&self) -> Priority {
        Priority::SpecialIdiom
    }

    fn classify(&self) -> &Fst {
        &self.classify
    }
}

impl Verbalizer for Power {
    fn category(&self) -> &'static str {
        "power"
    }

    fn verbalize(&self) -> &Fst {
        &self.verbalize
    }

    fn field_order(&self) -> &[&'static str] {
        &["base", "sign", "exponent"]
    }
}
