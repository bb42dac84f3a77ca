//! The catch-all category: any run of non-space characters that is not
//! punctuation, copied through unchanged. Apostrophes and hyphens may sit
//! inside a word.

use crate::fst::Fst;
use crate::grammar::{Classifier, GrammarContext, Verbalizer, is_punctuation, is_word_joiner};
use crate::priority::Priority;

#[derive(Debug, Clone)]
pub struct Word {
    classify: Fst,
    verbalize: Fst,
}

impl Word {
    pub(crate) fn new(ctx: &GrammarContext) -> Self {
        // `"` and `\` are punctuation, so names never need escaping.
        let chars = ctx.alphabet().class(|c| !c.is_whitespace() && (!is_punctuation(c) || is_word_joiner(c)));
        let classify = ctx.field("name", &chars.plus()).optimize();
        let verbalize = ctx.read_field("name");
        Word { classify, verbalize }
    }
}

impl Classifier for Word {
    fn category(&self) -> &'static str {
        "word"
    }

    fn priority(&self) -> Priority {
        Priority::Fallback
    }

    fn classify(&self) -> &Fst {
        &self.classify
    }
}

impl Verbalizer for Word {
    fn category(&self) -> &'static str {
        "word"
    }

    fn verbalize(&self) -> &Fst {
        &self.verbalize
    }
}
