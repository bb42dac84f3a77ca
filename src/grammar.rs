//! The grammar plug-in contract and the helpers grammars are written with.
//!
//! A category is a value that implements [`Classifier`] (raw text to token
//! body), [`Verbalizer`] (token body to spoken words), or both. Every grammar is
//! built from one [`GrammarContext`], which carries the shared lexicon, the
//! alphabet and the build flags.
//!
//! ## Extension points
//!
//! - New category: add a module under `src/rules/`, implement the traits and
//!   register it in `rules::build` at the position its tie-break should take.
//! - New lexical data: add a TSV table and read it with
//!   [`GrammarContext::table`] or [`GrammarContext::word`].

use crate::config::InputCase;
use crate::error::Result;
use crate::fst::{Alphabet, Fst};
use crate::lexicon::Lexicon;
use crate::priority::Priority;
use std::sync::Arc;

/// Characters that end a word and form punctuation tokens.
pub fn is_punctuation(c: char) -> bool {
    matches!(
        c,
        '!' | '"' | '#' | '%' | '&' | '\'' | '(' | ')' | '*' | ',' | '-' | '.' | '/' | ':' | ';' | '?' | '@' | '['
            | '\\' | ']' | '_' | '{' | '}' | '¡' | '§' | '«' | '¶' | '·' | '»' | '¿' | '।' | '॥'
            | '\u{2010}'..='\u{2027}'
            | '\u{2030}'..='\u{2043}'
    )
}

/// Punctuation allowed inside a fallback word (`don't`, `well-known`).
pub fn is_word_joiner(c: char) -> bool {
    matches!(c, '\'' | '-')
}

/// Turns raw text into a token body (`field: "value" ...`).
pub trait Classifier: Send + Sync {
    fn category(&self) -> &'static str;
    fn priority(&self) -> Priority;
    fn classify(&self) -> &Fst;
}

/// Turns a token body back into spoken words.
pub trait Verbalizer: Send + Sync {
    fn category(&self) -> &'static str;
    fn verbalize(&self) -> &Fst;

    /// Field order the verbalizer reads. Token fields are stably reordered
    /// to it before verbalizing; unlisted fields keep their place at the end.
    fn field_order(&self) -> &[&'static str] {
        &[]
    }
}

/// Everything a grammar needs at build time.
#[derive(Debug, Clone)]
pub struct GrammarContext {
    lexicon: Arc<Lexicon>,
    alphabet: Arc<Alphabet>,
    deterministic: bool,
    input_case: InputCase,
    digit: Fst,
    whitespace: Fst,
    value_char: Fst,
    value_reader: Fst,
}

impl GrammarContext {
    pub fn new(lexicon: Arc<Lexicon>, alphabet: Arc<Alphabet>, deterministic: bool, input_case: InputCase) -> Self {
        let digit = alphabet.class(|c| c.is_ascii_digit());
        let whitespace = alphabet.class(char::is_whitespace);
        let plain = alphabet.class(|c| c != '"' && c != '\\');
        let value_char = (&plain | Fst::cross("\"", "\\\"") | Fst::cross("\\", "\\\\")).optimize();
        let value_reader =
            (&plain | Fst::cross("\\\"", "\"") | Fst::cross("\\\\", "\\")).closure().optimize();
        GrammarContext { lexicon, alphabet, deterministic, input_case, digit, whitespace, value_char, value_reader }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn deterministic(&self) -> bool {
        self.deterministic
    }

    pub fn input_case(&self) -> InputCase {
        self.input_case
    }

    /// Compiled lexicon table.
    pub fn table(&self, name: &str) -> Result<Fst> {
        Ok(self.lexicon.table(name)?.to_fst(self.deterministic))
    }

    /// Preferred form of `key` in the `words` table.
    pub fn word(&self, key: &str) -> Result<String> {
        Ok(self.lexicon.table("words")?.require(key)?.to_string())
    }

    pub fn digit(&self) -> &Fst {
        &self.digit
    }

    pub fn whitespace(&self) -> &Fst {
        &self.whitespace
    }

    /// One input character copied into a field value, escaped.
    pub fn value_char(&self) -> &Fst {
        &self.value_char
    }

    /// `fst` with `"` and `\` escaped on the output side.
    pub fn escape_output(&self, fst: &Fst) -> Fst {
        fst.compose(&self.value_char.closure()).optimize()
    }

    /// Zero or more whitespace characters, deleted.
    pub fn delete_space(&self) -> Fst {
        self.whitespace.deleted().closure()
    }

    /// One or more whitespace characters, written as a single space.
    pub fn collapse_space(&self) -> Fst {
        (self.whitespace.deleted().plus() + Fst::insert(" ")).optimize()
    }

    /// `name: "` + `value` + `"` on the output side.
    pub fn field(&self, name: &str, value: &Fst) -> Fst {
        Fst::insert(&format!("{name}: \"")) + value + Fst::insert("\"")
    }

    /// Reads `name: "..."` from a token body and writes the unescaped value.
    pub fn read_field(&self, name: &str) -> Fst {
        (Fst::delete(&format!("{name}: \"")) + &self.value_reader + Fst::delete("\"")).optimize()
    }

    /// Reads a field that must hold exactly `value`, writing `output`.
    pub fn read_flag(&self, name: &str, value: &str, output: &str) -> Fst {
        Fst::cross(&format!("{name}: \"{value}\""), output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> GrammarContext {
        GrammarContext::new(
            Arc::new(Lexicon::builtin("en").expect("builtin")),
            Arc::new(Alphabet::standard()),
            true,
            InputCase::Cased,
        )
    }

    #[test]
    fn field_round_trip_unescapes() {
        let ctx = context();
        let write = ctx.field("name", &ctx.value_char().plus());
        let read = ctx.read_field("name");
        let body = write.apply("say \"hi\"").expect("classifies");
        assert_eq!(body, r#"name: "say \"hi\"""#);
        assert_eq!(read.apply(&body).as_deref(), Some("say \"hi\""));
    }

    #[test]
    fn whitespace_helpers() {
        let ctx = context();
        assert_eq!(ctx.collapse_space().apply(" \t ").as_deref(), Some(" "));
        assert_eq!(ctx.delete_space().apply("  ").as_deref(), Some(""));
        assert_eq!(ctx.delete_space().apply("").as_deref(), Some(""));
    }

    #[test]
    fn punctuation_classes() {
        for c in [',', '.', '!', '?', '(', '—', '…', '«', '।', '॥'] {
            assert!(is_punctuation(c), "{c:?} should be punctuation");
        }
        for c in ['+', '=', '$', 'a', '7', 'क', '\u{094D}'] {
            assert!(!is_punctuation(c), "{c:?} should not be punctuation");
        }
    }
}
