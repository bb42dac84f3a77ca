//! Whole-token replacements from the `whitelist` table (`Dr.` -> doctor).

use crate::config::InputCase;
use crate::error::Result;
use crate::fst::Fst;
use crate::grammar::{Classifier, GrammarContext, Verbalizer};
use crate::priority::Priority;

#[derive(Debug, Clone)]
pub struct Whitelist {
    classify: Fst,
    verbalize: Fst,
}

impl Whitelist {
    pub(crate) fn new(ctx: &GrammarContext) -> Result<Self> {
        let table = ctx.lexicon().table("whitelist")?;
        let entries = match ctx.input_case() {
            InputCase::LowerCased => table.lower_cased().to_fst(ctx.deterministic()),
            InputCase::Cased => table.to_fst(ctx.deterministic()),
        };
        let classify = ctx.field("name", &ctx.escape_output(&entries)).optimize();
        let verbalize = ctx.read_field("name");
        Ok(Whitelist { classify, verbalize })
    }
}

impl Classifier for Whitelist {
    fn category(&self) -> &'static str {
        "whitelist"
    }

    fn priority(&self) -> Priority {
        Priority::Exact
    }

    fn classify(&self) -> &Fst {
        &self.classify
    }
}

impl Verbalizer for Whitelist {
    fn category(&self) -> &'static str {
        "whitelist"
    }

    fn verbalize(&self) -> &Fst {
        &self.verbalize
    }
}
