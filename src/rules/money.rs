//! Money: `$5.50` -> `integer_part: "five" currency_maj: "dollars"
//! fractional_part: "fifty" currency_min: "cents"`.
//!
//! One branch per symbol in the `currency` table; symbols listed in
//! `currency_minor` also take a two-digit fractional amount.

use super::cardinal::NumberNames;
use crate::error::Result;
use crate::fst::Fst;
use crate::grammar::{Classifier, GrammarContext, Verbalizer};
use crate::priority::Priority;

#[derive(Debug, Clone)]
pub struct Money {
    classify: Fst,
    verbalize: Fst,
}

impl Money {
    pub(crate) fn new(ctx: &GrammarContext, numbers: &NumberNames) -> Result<Self> {
        let major = ctx.lexicon().table("currency")?;
        let minor = ctx.lexicon().table("currency_minor")?;

        let mut branches = Vec::with_capacity(major.len());
        for entry in major.entries() {
            let Some(name) = entry.forms.first() else { continue };
            let mut branch = Fst::delete(&entry.key)
                + ctx.field("integer_part", &numbers.names)
                + Fst::insert(" ")
                + ctx.field("currency_maj", &ctx.escape_output(&Fst::insert(name)));
            if let Some(min) = minor.get(&entry.key) {
                let cents = Fst::delete(".")
                    + Fst::insert(" ")
                    + ctx.field("fractional_part", &numbers.padded_two)
                    + Fst::insert(" ")
                    + ctx.field("currency_min", &ctx.escape_output(&Fst::insert(min)));
                branch = branch + (Fst::delete(".00") | cents).optional();
            }
            branches.push(branch.optimize());
        }
        let classify = Fst::union_all(branches.iter()).optimize();

        let and = ctx.word("and")?;
        let space = Fst::accept(" ");
        let cents = Fst::cross(" ", &format!(" {and} "))
            + ctx.read_field("fractional_part")
            + &space
            + ctx.read_field("currency_min");
        let verbalize =
            (ctx.read_field("integer_part") + &space + ctx.read_field("currency_maj") + cents.optional()).optimize();

        Ok(Money { classify, verbalize })
    }
}

impl Classifier for Money {
    fn category(&self) -> &'static str {
        "money"
    }

    fn priority(&self) -> Priority {
        Priority::Generic
    }

    fn classify(&self) -> &Fst {
        &self.classify
    }
}

impl Verbalizer for Money {
    fn category(&self) -> &'static str {
        "money"
    }

    fn verbalize(&self) -> &Fst {
        &self.verbalize
    }

    fn field_order(&self) -> &[&'static str] {
        &["integer_part", "currency_maj", "fractional_part", "currency_min"]
    }
}
