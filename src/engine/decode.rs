//! Decoding the sentence graph, verbalizing tokens and joining the result.

use crate::error::{Error, Result};
use crate::fst::Fst;
use crate::grammar::Verbalizer;
use crate::rules::spaced_between;
use crate::token::{Token, parse_tokens};
use serde::{Deserialize, Serialize};

/// Cheapest segmentation of `text` into tokens.
pub(crate) fn decode(graph: &Fst, text: &str) -> Result<Vec<Token>> {
    let best = Fst::accept(text)
        .compose(graph)
        .shortest_path()
        .ok_or_else(|| Error::NoPath { graph: "tokenize".to_string(), input: text.to_string() })?;
    tracing::trace!(weight = %best.weight, tokens = %best.output, "decoded");
    parse_tokens(&best.output)
}

/// A verbalizer reduced to what decoding needs, so it can be archived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledVerbalizer {
    pub fst: Fst,
    pub field_order: Vec<String>,
}

impl CompiledVerbalizer {
    pub(crate) fn from_grammar(verbalizer: &dyn Verbalizer) -> Self {
        CompiledVerbalizer {
            fst: verbalizer.verbalize().clone(),
            field_order: verbalizer.field_order().iter().map(|f| f.to_string()).collect(),
        }
    }

    /// Fields stably reordered to `field_order`; unlisted fields go last.
    pub(crate) fn reorder(&self, token: &Token) -> Token {
        let rank = |name: &str| self.field_order.iter().position(|f| f == name).unwrap_or(self.field_order.len());
        let mut fields = token.fields.clone();
        fields.sort_by_key(|(name, _)| rank(name));
        Token { category: token.category.clone(), fields }
    }

    pub(crate) fn verbalize(&self, token: &Token) -> Result<String> {
        let body = self.reorder(token).body();
        self.fst
            .apply(&body)
            .ok_or_else(|| Error::NoPath { graph: format!("verbalize/{}", token.category), input: body })
    }
}

/// Joins the spoken form of each token, with a single space exactly where
/// the written text had whitespace. A token that speaks as nothing is
/// skipped, and its left neighbour's spacing carries over.
pub(crate) fn join(tokens: &[Token], pieces: &[String]) -> String {
    let mut out = String::new();
    let mut previous: Option<&Token> = None;
    for (token, piece) in tokens.iter().zip(pieces) {
        let piece = piece.trim();
        if piece.is_empty() {
            continue;
        }
        if previous.is_some_and(|left| spaced_between(left, token)) {
            out.push(' ');
        }
        out.push_str(piece);
        previous = Some(token);
    }
    regex!(r"\s+").replace_all(&out, " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn mark(name: &str, before: bool, after: bool) -> Token {
        let mut token = Token::new("punctuation").with_field("name", name);
        if before {
            token = token.with_field("space_before", "true");
        }
        if after {
            token = token.with_field("space_after", "true");
        }
        token
    }

    fn word(name: &str) -> Token {
        Token::new("word").with_field("name", name)
    }

    fn spoken(tokens: &[Token]) -> Vec<String> {
        tokens.iter().map(|t| t.field("name").unwrap_or_default().to_string()).collect()
    }

    #[test]
    fn join_follows_the_written_spacing() {
        let tight = vec![word("yes"), mark("/", false, false), word("no")];
        assert_eq!(join(&tight, &spoken(&tight)), "yes/no");
        let loose = vec![word("yes"), mark("/", true, true), word("no")];
        assert_eq!(join(&loose, &spoken(&loose)), "yes / no");
        let sentence = vec![word("hello"), mark(",", false, true), word("world"), mark("!", false, false)];
        assert_eq!(join(&sentence, &spoken(&sentence)), "hello, world!");
        let run = vec![word("wait"), mark(".", false, false), mark(".", false, true), word("what")];
        assert_eq!(join(&run, &spoken(&run)), "wait.. what");
    }

    #[test]
    fn words_are_always_apart_and_empty_pieces_skipped() {
        let tokens = vec![word("a"), word("b"), word("c")];
        assert_eq!(join(&tokens, &pieces(&["  a  ", "", "b\tc"])), "a b c");
        assert_eq!(join(&[], &[]), "");
    }

    fn pieces(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn reorders_fields_stably() {
        let verbalizer = CompiledVerbalizer {
            fst: Fst::epsilon(),
            field_order: vec!["month".to_string(), "day".to_string(), "year".to_string()],
        };
        let token = Token::new("date")
            .with_field("extra", "x")
            .with_field("day", "one")
            .with_field("month", "may")
            .with_field("year", "two");
        let ordered = verbalizer.reorder(&token);
        let names: Vec<&str> = ordered.fields.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["month", "day", "year", "extra"]);
    }
}
