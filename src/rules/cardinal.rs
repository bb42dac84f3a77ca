//! Cardinal numbers, plus the number-name graphs the other numeric categories
//! are written with.
//!
//! ```text
//!   12 digits max:  lead (1-999) + scale + { "000" | group + smaller scale }*
//!   "0"          -> zero
//!   0ddd, 13+ d  -> spelled digit by digit (fallback branch), separators dropped
//!   phone-shaped -> removed, telephone owns them
//! ```

use crate::error::Result;
use crate::fst::Fst;
use crate::grammar::{Classifier, GrammarContext, Verbalizer};
use crate::priority::{Priority, prioritized};

/// Magnitude keys of the scale words, smallest first.
const SCALES: [&str; 3] = ["1000", "1000000", "1000000000"];

/// Number-name building blocks shared by the numeric categories.
#[derive(Debug, Clone)]
pub(crate) struct NumberNames {
    /// `1`-`9`.
    pub units: Fst,
    /// `10`-`99`.
    pub two_digit: Fst,
    /// `01`-`99`, always two characters.
    pub padded_two: Fst,
    /// Any digit string without a leading zero up to twelve digits, with or
    /// without thousands separators, and `0`.
    pub names: Fst,
    /// A digit string read digit by digit.
    pub spelled: Fst,
    /// Digit strings read as telephone numbers: 7 to 9 digits, or 10 digits
    /// that do not end in six zeros.
    pub phone_shaped: Fst,
}

impl NumberNames {
    pub(crate) fn new(ctx: &GrammarContext) -> Result<Self> {
        let units = ctx.table("digit")?;
        let zero = ctx.table("zero")?;
        let teen = ctx.table("teen")?;
        let ties = ctx.table("ties")?;
        let magnitude = ctx.lexicon().table("magnitude")?;
        let hundred = magnitude.require("100")?;
        let scales = SCALES.iter().map(|key| magnitude.require(key)).collect::<Result<Vec<_>>>()?;

        let two_digit = (&teen | (&ties + Fst::delete("0")) | (&ties + Fst::insert(" ") + &units)).optimize();
        let padded_two = ((Fst::delete("0") + &units) | &two_digit).optimize();
        let three = (&units
            + Fst::insert(&format!(" {hundred}"))
            + (Fst::delete("00") | (Fst::insert(" ") + &padded_two)))
            .optimize();
        let group = (&three | (Fst::delete("0") + &padded_two)).optimize();
        let lead = (&units | &two_digit | &three).optimize();

        let mut branches = vec![zero.clone(), lead.clone()];
        for separator in [Fst::epsilon(), Fst::delete(",")] {
            for k in 1..=scales.len() {
                let mut number = &lead + Fst::insert(&format!(" {}", scales[k - 1]));
                for j in (0..k).rev() {
                    let suffix = if j == 0 { String::new() } else { format!(" {}", scales[j - 1]) };
                    let block = Fst::delete("000") | (Fst::insert(" ") + &group + Fst::insert(&suffix));
                    number = number + &separator + block;
                }
                branches.push(number.optimize());
            }
        }
        let names = Fst::union_all(branches.iter()).optimize();

        let digit = (&units | &zero).optimize();
        let spelled = (&digit + (Fst::insert(" ") + &digit).closure()).optimize();

        let d = ctx.digit();
        let phone_shaped =
            (d.repeat(7, Some(9)) | (d.repeat(4, Some(4)) + d.repeat(6, Some(6)).difference(&Fst::accept("000000"))))
                .optimize();

        Ok(NumberNames { units, two_digit, padded_two, names, spelled, phone_shaped })
    }
}

/// `-23` -> `negative: "true" integer: "twenty three"`.
#[derive(Debug, Clone)]
pub struct Cardinal {
    classify: Fst,
    verbalize: Fst,
}

impl Cardinal {
    pub(crate) fn new(ctx: &GrammarContext, numbers: &NumberNames) -> Result<Self> {
        let d = ctx.digit();
        let named = numbers.names.difference(&numbers.phone_shaped);
        let grouped = d.repeat(1, Some(3)) + (Fst::delete(",") + d.repeat(3, Some(3))).repeat(4, None);
        let by_digit = ((Fst::accept("0") + d.plus()) | d.repeat(13, None) | grouped).compose(&numbers.spelled);
        let integer = prioritized(&[(Priority::Generic, named), (Priority::Fallback, by_digit)]);

        let negative = Fst::cross("-", "negative: \"true\" ").optional();
        let classify = (negative + ctx.field("integer", &integer)).optimize();

        let minus = ctx.word("negative")?;
        let verbalize = ((ctx.read_flag("negative", "true", &format!("{minus} ")) + Fst::delete(" ")).optional()
            + ctx.read_field("integer"))
        .optimize();

        Ok(Cardinal { classify, verbalize })
    }
}

impl Classifier for Cardinal {
    fn category(&self) -> &'static str {
        "cardinal"
    }

    fn priority(&self) -> Priority {
        Priority::Generic
    }

    fn classify(&self) -> &Fst {
        &self.classify
    }
}

impl Verbalizer for Cardinal {
    fn category(&self) -> &'static str {
        "cardinal"
    }

    fn verbalize(&self) -> &Fst {
        &self.verbalize
    }
}
