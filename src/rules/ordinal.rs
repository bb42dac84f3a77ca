//! Ordinals: `21st` -> `integer: "twenty one"`, spoken "twenty first".
//!
//! Classification keeps the cardinal words; the verbalizer rewrites the last
//! word. Only the suffix that matches the number is accepted (`21st`, `12th`,
//! never `21th` or `11st`).

use super::cardinal::NumberNames;
use crate::error::Result;
use crate::fst::Fst;
use crate::grammar::{Classifier, GrammarContext, Verbalizer};
use crate::priority::Priority;

#[derive(Debug, Clone)]
pub struct Ordinal {
    classify: Fst,
    verbalize: Fst,
}

impl Ordinal {
    pub(crate) fn new(ctx: &GrammarContext, numbers: &NumberNames) -> Result<Self> {
        let d = ctx.digit();
        let alphabet = ctx.alphabet();
        let not_one = alphabet.class(|c| c.is_ascii_digit() && c != '1');
        let takes_th = alphabet.class(|c| matches!(c, '0' | '4'..='9'));

        let teen_th = d.closure() + Fst::accept("1") + d + Fst::accept("th");
        let last_digit =
            Fst::accept("1st") | Fst::accept("2nd") | Fst::accept("3rd") | (takes_th + Fst::accept("th"));
        let well_formed = (teen_th | ((d.closure() + not_one).optional() + last_digit)).optimize();

        let suffix = Fst::delete("st") | Fst::delete("nd") | Fst::delete("rd") | Fst::delete("th");
        let integer = well_formed.compose(&(&numbers.names + suffix));
        let classify = ctx.field("integer", &integer).optimize();

        let verbalize = ctx.read_field("integer").compose(&ordinal_suffix(ctx)?).optimize();

        Ok(Ordinal { classify, verbalize })
    }
}

/// Rewrites the last word of a cardinal reading into its ordinal form.
pub(crate) fn ordinal_suffix(ctx: &GrammarContext) -> Result<Fst> {
    let alphabet = ctx.alphabet();
    let exceptions = ctx.table("ordinal_exceptions")?;
    let exception_keys = ctx.lexicon().table("ordinal_exceptions")?.keys_fst();

    let last_word = alphabet.class(|c| c != ' ').plus();
    let regular = last_word.difference(&exception_keys) + Fst::insert("th");
    let leading_words = (alphabet.sigma_star() + Fst::accept(" ")).optional();
    Ok((leading_words + (exceptions | regular)).optimize())
}

impl Classifier for Ordinal {
    fn category(&self) -> &'static str {
        "ordinal"
    }

    fn priority(&self) -> Priority {
        Priority::Generic
    }

    fn classify(&self) -> &Fst {
        &self.classify
    }
}

impl Verbalizer for Ordinal {
    fn category(&self) -> &'static str {
        "ordinal"
    }

    fn verbalize(&self) -> &Fst {
        &self.verbalize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InputCase;
    use crate::fst::Alphabet;
    use crate::lexicon::Lexicon;
    use std::sync::Arc;

    #[test]
    fn last_word_takes_the_ordinal_form() {
        let ctx = GrammarContext::new(
            Arc::new(Lexicon::builtin("en").expect("builtin")),
            Arc::new(Alphabet::standard()),
            true,
            InputCase::Cased,
        );
        let suffix = ordinal_suffix(&ctx).expect("compiles");
        for (words, expected) in [
            ("one", "first"),
            ("twenty one", "twenty first"),
            ("twelve", "twelfth"),
            ("four", "fourth"),
            ("one hundred", "one hundredth"),
            ("thirty", "thirtieth"),
        ] {
            assert_eq!(suffix.apply(words).as_deref(), Some(expected), "{words}");
        }
    }
}
