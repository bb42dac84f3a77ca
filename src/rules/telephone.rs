//! Telephone numbers, card numbers and postal codes, read digit by digit.
//!
//! Bare phone-shaped digit strings compete with cardinals only on paper: the
//! cardinal grammar removes them from its domain. Separated forms (`555-1234`,
//! `555.123.4567`, `1234 5678 9012 3456`) take the idiom branch so they beat
//! the arithmetic reading. A postal code needs a context word in front of it
//! (`PIN 560001`, `zip code 90210`); the word is kept in a `context` field.

use super::cardinal::NumberNames;
use crate::error::Result;
use crate::fst::Fst;
use crate::grammar::{Classifier, GrammarContext, Verbalizer};
use crate::priority::{Priority, prioritized};

#[derive(Debug, Clone)]
pub struct Telephone {
    classify: Fst,
    verbalize: Fst,
}

impl Telephone {
    pub(crate) fn new(ctx: &GrammarContext, numbers: &NumberNames) -> Result<Self> {
        let d = ctx.digit();
        let block = |n: usize| d.repeat(n, Some(n)).compose(&numbers.spelled);
        let comma = |sep: &str| Fst::cross(sep, ", ");

        let plain = numbers.phone_shaped.compose(&numbers.spelled);
        let mut separated = vec![block(3) + comma("-") + block(4)];
        for sep in ["-", "."] {
            separated.push(block(3) + comma(sep) + block(3) + comma(sep) + block(4));
        }
        let card_gap = || comma(" ") | comma("-");
        separated.push(block(4) + card_gap() + block(4) + card_gap() + block(4) + card_gap() + block(4));
        let separated = Fst::union_all(separated.iter());

        let national = prioritized(&[(Priority::Generic, plain), (Priority::SpecialIdiom, separated)]);
        let number_part = ctx.field("number_part", &national);

        let country_code = Fst::delete("+") + d.repeat(1, Some(3)).compose(&numbers.spelled);
        let international =
            ctx.field("country_code", &country_code) + ctx.whitespace().deleted().plus() + Fst::insert(" ") + &number_part;

        let postal_code = ctx.field("context", &ctx.table("pincode_context")?)
            + ctx.whitespace().deleted().plus()
            + Fst::insert(" ")
            + ctx.field("number_part", &d.repeat(5, Some(6)).compose(&numbers.spelled));

        let classify = (&number_part | international | postal_code).optimize();

        let verbalize = ((ctx.read_field("context") + Fst::accept(" ")).optional()
            + (ctx.read_field("country_code") + Fst::cross(" ", ", ")).optional()
            + ctx.read_field("number_part"))
        .optimize();

        Ok(Telephone { classify, verbalize })
    }
}

impl Classifier for Telephone {
    fn category(&self) -> &'static str {
        "telephone"
    }

    fn priority(&self) -> Priority {
        Priority::Generic
    }

    fn classify(&self) -> &Fst {
        &self.classify
    }
}

impl Verbalizer for Telephone {
    fn category(&self) -> &'static str {
        "telephone"
    }

    fn verbalize(&self) -> &Fst {
        &self.verbalize
    }

    fn field_order(&self) -> &[&'static str] {
        &["context", "country_code", "number_part"]
    }
}
