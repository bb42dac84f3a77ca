//! Punctuation marks, one token per character.
//!
//! Punctuation is not a ranked category: the tokenizer places it between
//! tokens at [`PUNCTUATION_BIAS`](crate::priority::PUNCTUATION_BIAS). A mark
//! also records the whitespace written around it, so the spoken text keeps
//! `yes/no` and `yes / no` apart.

use crate::fst::Fst;
use crate::grammar::{GrammarContext, Verbalizer, is_punctuation};
use crate::token::Token;

/// Flag field: whitespace preceded the mark and no mark to its left owns it.
pub const SPACE_BEFORE: &str = "space_before";
/// Flag field: whitespace followed the mark.
pub const SPACE_AFTER: &str = "space_after";

#[derive(Debug, Clone)]
pub struct Punctuation {
    classify: Fst,
    verbalize: Fst,
}

impl Punctuation {
    pub(crate) fn new(ctx: &GrammarContext) -> Self {
        let mark = ctx.alphabet().class(is_punctuation);
        let classify = ctx.field("name", &ctx.escape_output(&mark)).optimize();
        let flag = |name: &str| Fst::delete(&format!(" {name}: \"true\"")).optional();
        let verbalize = (ctx.read_field("name") + flag(SPACE_BEFORE) + flag(SPACE_AFTER)).optimize();
        Punctuation { classify, verbalize }
    }

    /// One mark to its token body.
    pub fn classify(&self) -> &Fst {
        &self.classify
    }
}

impl Verbalizer for Punctuation {
    fn category(&self) -> &'static str {
        "punctuation"
    }

    fn verbalize(&self) -> &Fst {
        &self.verbalize
    }

    fn field_order(&self) -> &[&'static str] {
        &["name", SPACE_BEFORE, SPACE_AFTER]
    }
}

/// Whether the written text had whitespace between two neighbouring tokens.
/// Two ranked tokens are always apart; around a mark, its flags decide.
pub fn spaced_between(left: &Token, right: &Token) -> bool {
    let is_mark = |token: &Token| token.category == "punctuation";
    let flag = |token: &Token, name: &str| token.field(name) == Some("true");
    if is_mark(left) {
        flag(left, SPACE_AFTER)
    } else if is_mark(right) {
        flag(right, SPACE_BEFORE)
    } else {
        true
    }
}
