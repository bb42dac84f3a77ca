//! Numeric dates: `2024-01-15`, `15/01/2024`, `15-01-2024`, `15.01.2024`.
//!
//! Fields come out in input order and the verbalizer reads them as
//! `month day year`, so the day-first formats rely on field reordering.
//! Years split in two halves (`nineteen eighty four`, `nineteen oh five`,
//! `nineteen hundred`) except 2000-2009, which read `two thousand [n]`.

use super::cardinal::NumberNames;
use super::ordinal::ordinal_suffix;
use crate::error::Result;
use crate::fst::Fst;
use crate::grammar::{Classifier, GrammarContext, Verbalizer};
use crate::priority::{Priority, prioritized};

#[derive(Debug, Clone)]
pub struct Date {
    classify: Fst,
    verbalize: Fst,
}

impl Date {
    pub(crate) fn new(ctx: &GrammarContext, numbers: &NumberNames) -> Result<Self> {
        let alphabet = ctx.alphabet();
        let d = ctx.digit();
        let nonzero = alphabet.class(|c| matches!(c, '1'..='9'));
        let magnitude = ctx.lexicon().table("magnitude")?;
        let hundred = magnitude.require("100")?;
        let thousand = magnitude.require("1000")?;
        let two = ctx.lexicon().table("digit")?.require("2")?;
        let oh = ctx.word("oh")?;

        let day_digits = (Fst::accept("0").optional() + &nonzero)
            | (alphabet.class(|c| matches!(c, '1' | '2')) + d)
            | (Fst::accept("3") + alphabet.class(|c| matches!(c, '0' | '1')));
        let day = day_digits.compose(&(Fst::delete("0").optional() + (&numbers.units | &numbers.two_digit)));
        let month = ctx.table("month")?;

        let second_half = Fst::cross("00", hundred)
            | (Fst::cross("0", &format!("{oh} ")) + &numbers.units)
            | &numbers.two_digit;
        let split = (&nonzero + d).compose(&numbers.two_digit) + Fst::insert(" ") + second_half;
        let two_thousands = Fst::cross("200", &format!("{two} {thousand}"))
            + (Fst::delete("0") | (Fst::insert(" ") + &numbers.units));
        let year = prioritized(&[(Priority::Generic, split), (Priority::SpecialIdiom, two_thousands)]);

        let year = ctx.field("year", &year);
        let month = ctx.field("month", &month);
        let day = ctx.field("day", &day);

        let iso = &year + Fst::cross("-", " ") + &month + Fst::cross("-", " ") + &day;
        let mut formats = vec![iso];
        for sep in ["/", "-", "."] {
            formats.push(&day + Fst::cross(sep, " ") + &month + Fst::cross(sep, " ") + &year);
        }
        let classify = Fst::union_all(formats.iter()).optimize();

        let day_ordinal = ctx.read_field("day").compose(&ordinal_suffix(ctx)?);
        let verbalize = (ctx.read_field("month")
            + Fst::accept(" ")
            + day_ordinal
            + Fst::accept(" ")
            + ctx.read_field("year"))
        .optimize();

        Ok(Date { classify, verbalize })
    }
}

impl Classifier for Date {
    fn category(&self) -> &'static str {
        "date"
    }

    fn priority(&self) -> Priority {
        Priority::SpecialIdiom
    }

    fn classify(&self) -> &Fst {
        &self.classify
    }
}

impl Verbalizer for Date {
    fn category(&self) -> &'static str {
        "date"
    }

    fn verbalize(&self) -> &Fst {
        &self.verbalize
    }

    fn field_order(&self) -> &[&'static str] {
        &["month", "day", "year"]
    }
}
