//! Clock times: `7:05 pm` -> `hours: "seven" minutes: "oh five" suffix: "p m"`.
//!
//! Hours run 0-23 and minutes 00-59. Whole hours carry no minutes field and
//! are spoken with "o'clock" unless a day-half suffix follows.

use super::cardinal::NumberNames;
use crate::error::Result;
use crate::fst::Fst;
use crate::grammar::{Classifier, GrammarContext, Verbalizer};
use crate::priority::Priority;

#[derive(Debug, Clone)]
pub struct Time {
    classify: Fst,
    verbalize: Fst,
}

impl Time {
    pub(crate) fn new(ctx: &GrammarContext, numbers: &NumberNames) -> Result<Self> {
        let alphabet = ctx.alphabet();
        let d = ctx.digit();
        let zero = ctx.table("zero")?;
        let oh = ctx.word("oh")?;

        let low_hours = Fst::delete("0").optional() + &numbers.units;
        let high_hours = (Fst::accept("1") + d) | (Fst::accept("2") + alphabet.class(|c| matches!(c, '0'..='3')));
        let midnight = (Fst::accept("0") | Fst::cross("00", "0")).compose(&zero);
        let hours = (low_hours | high_hours.compose(&numbers.two_digit) | midnight).optimize();

        let tens = alphabet.class(|c| matches!(c, '1'..='5'));
        let minutes = (Fst::cross("0", &format!("{oh} ")) + &numbers.units) | (tens + d).compose(&numbers.two_digit);

        let am = ctx.word("am")?;
        let pm = ctx.word("pm")?;
        let suffix = Fst::string_map([
            ("am", am.as_str()),
            ("a.m.", am.as_str()),
            ("AM", am.as_str()),
            ("A.M.", am.as_str()),
            ("pm", pm.as_str()),
            ("p.m.", pm.as_str()),
            ("PM", pm.as_str()),
            ("P.M.", pm.as_str()),
        ]);

        let clock = ctx.field("hours", &hours)
            + Fst::delete(":")
            + (Fst::delete("00") | (Fst::insert(" ") + ctx.field("minutes", &minutes)));
        let classify = (clock + (ctx.delete_space() + Fst::insert(" ") + ctx.field("suffix", &suffix)).optional())
            .optimize();

        let oclock = ctx.word("oclock")?;
        let space = Fst::accept(" ");
        let with_minutes =
            &space + ctx.read_field("minutes") + (&space + ctx.read_field("suffix")).optional();
        let whole_hour = (&space + ctx.read_field("suffix")) | Fst::insert(&format!(" {oclock}"));
        let verbalize = (ctx.read_field("hours") + (with_minutes | whole_hour)).optimize();

        Ok(Time { classify, verbalize })
    }
}

impl Classifier for Time {
    fn category(&self) -> &'static str {
        "time"
    }

    fn priority(&self) -> Priority {
        Priority::Generic
    }

    fn classify(&self) -> &Fst {
        &self.classify
    }
}

impl Verbalizer for Time {
    fn category(&self) -> &'static str {
        "time"
    }

    fn verbalize(&self) -> &Fst {
        &self.verbalize
    }

    fn field_order(&self) -> &[&'static str] {
        &["hours", "minutes", "suffix"]
    }
}
