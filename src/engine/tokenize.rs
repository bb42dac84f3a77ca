//! The whole-sentence graph.
//!
//! ```text
//!   sb, sa   = WS+ -> `space_before: "true"` / `space_after: "true"`
//!   mark     = "tokens { punctuation { " + sb? + name + sa? + " } }"   @ 2.1
//!   token    = "tokens { " + classify_union + " }"
//!   between  = WS+ -> " "  |  " " + marks + " "
//!   sentence = delete(WS*) + (mark + " ")* + token + (between + token)*
//!                + (" " + marks)? + delete(WS*)
//!            | delete(WS*) + (mark + " ")* + mark + delete(WS*)
//! ```
//!
//! Tokens are separated by single spaces on the wire. Whitespace next to a
//! punctuation mark is recorded on the mark instead: as `space_after` on the
//! mark to its left when there is one, otherwise as `space_before` on the
//! mark to its right. Whitespace at either end of the input is dropped. Only
//! the first mark of a run can carry `space_before`, and the last mark of the
//! input never carries `space_after`, so each input has one segmentation per
//! token sequence.

use crate::error::Result;
use crate::fst::{Fst, check_negative_cycles};
use crate::grammar::GrammarContext;
use crate::priority::PUNCTUATION_BIAS;
use crate::rules::{SPACE_AFTER, SPACE_BEFORE};

pub(crate) fn build_sentence_graph(ctx: &GrammarContext, classify: &Fst, punctuation: &Fst) -> Result<Fst> {
    let space = ctx.whitespace().deleted().plus();
    let before = (&space + Fst::insert(&format!("{SPACE_BEFORE}: \"true\" "))).optional();
    let after = (&space + Fst::insert(&format!(" {SPACE_AFTER}: \"true\""))).optional();
    let mark = |leading: &Fst, trailing: &Fst| {
        (Fst::insert("tokens { punctuation { ") + leading + punctuation + trailing + Fst::insert(" } }"))
            .add_weight(PUNCTUATION_BIAS)
    };
    let none = Fst::epsilon();
    let inner = mark(&none, &after);
    let first = mark(&before, &after);
    let last = mark(&none, &none);
    let only = mark(&before, &none);

    let sep = Fst::insert(" ");
    let token = Fst::insert("tokens { ") + classify + Fst::insert(" }");
    let leading = (&inner + &sep).closure();
    let run = &first + (&sep + &inner).closure();
    let between = (&space + &sep) | (&sep + &run + &sep);
    let ending = &sep + (&only | (&first + (&sep + &inner).closure() + &sep + &last));

    let sentence =
        ctx.delete_space() + &leading + &token + (between + &token).closure() + ending.optional() + ctx.delete_space();
    let marks_only = ctx.delete_space() + &leading + &last + ctx.delete_space();
    let graph = (sentence | marks_only).connect();

    check_negative_cycles(&graph, "tokenize")?;
    tracing::debug!(states = graph.num_states(), arcs = graph.num_arcs(), "sentence graph built");
    Ok(graph)
}
