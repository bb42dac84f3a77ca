//! Codes that mix letters and digits: `B2B` -> `value: "B two B"`,
//! `MP3` -> `value: "MP three"`.
//!
//! Letter runs are copied, digit runs are read as numbers. Declared last
//! among the generic categories, so ordinals and measures keep `21st` and
//! `5km`.

use super::cardinal::NumberNames;
use crate::fst::Fst;
use crate::grammar::{Classifier, GrammarContext, Verbalizer};
use crate::priority::Priority;

#[derive(Debug, Clone)]
pub struct Serial {
    classify: Fst,
    verbalize: Fst,
}

impl Serial {
    pub(crate) fn new(ctx: &GrammarContext, numbers: &NumberNames) -> Self {
        let letters = ctx.alphabet().class(|c| c.is_ascii_alphabetic()).plus();
        let digits = ctx.digit().plus().compose(&numbers.names);
        let space = Fst::insert(" ");

        let letter_digit = &letters + &space + &digits;
        let digit_letter = &digits + &space + &letters;
        let starts_with_letter =
            &letter_digit + (&space + &letter_digit).closure() + (&space + &letters).optional();
        let starts_with_digit = &digit_letter + (&space + &digit_letter).closure() + (&space + &digits).optional();

        let classify = ctx.field("value", &(starts_with_letter | starts_with_digit)).optimize();
        let verbalize = ctx.read_field("value");
        Serial { classify, verbalize }
    }
}

impl Classifier for Serial {
    fn category(&self) -> &'static str {
        "serial"
    }

    fn priority(&self) -> Priority {
        Priority::Generic
    }

    fn classify(&self) -> &Fst {
        &self.classify
    }
}

impl Verbalizer for Serial {
    fn category(&self) -> &'static str {
        "serial"
    }

    fn verbalize(&self) -> &Fst {
        &self.verbalize
    }
}
