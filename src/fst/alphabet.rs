//! The universal alphabet Σ that grammars and rewrite rules range over.

use super::vector::{Fst, Label, label};
use crate::error::{Error, Result};
use std::collections::BTreeSet;

/// Mathematical symbols outside Latin-1 that the grammars read.
const MATH_SYMBOLS: [char; 12] = ['√', '∑', '∏', '∫', '∂', '∇', '≈', '≠', '≤', '≥', '∞', '−'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    chars: BTreeSet<char>,
}

impl Alphabet {
    pub fn new(chars: impl IntoIterator<Item = char>) -> Self {
        Alphabet { chars: chars.into_iter().filter(|&c| c != '\0').collect() }
    }

    /// Printable ASCII, common whitespace, Latin-1, Greek, the Indic blocks
    /// (Devanagari through Sinhala), general punctuation, super- and
    /// subscripts, currency signs and a handful of math symbols.
    pub fn standard() -> Self {
        let mut chars: BTreeSet<char> = (' '..='~').collect();
        chars.extend(['\t', '\n', '\r']);
        chars.extend('\u{00A0}'..='\u{00FF}');
        chars.extend('\u{0391}'..='\u{03C9}');
        chars.extend('\u{0900}'..='\u{0DFF}');
        chars.extend('\u{2010}'..='\u{2027}');
        chars.extend('\u{2030}'..='\u{203A}');
        chars.extend('\u{2070}'..='\u{209F}');
        chars.extend('\u{20A0}'..='\u{20BF}');
        chars.extend(MATH_SYMBOLS);
        Alphabet { chars }
    }

    pub fn extend(&mut self, chars: impl IntoIterator<Item = char>) {
        self.chars.extend(chars.into_iter().filter(|&c| c != '\0'));
    }

    pub fn contains(&self, c: char) -> bool {
        self.chars.contains(&c)
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.chars.iter().copied()
    }

    pub fn labels(&self) -> Vec<Label> {
        self.chars.iter().map(|&c| label(c)).collect()
    }

    /// Any single symbol.
    pub fn sigma(&self) -> Fst {
        Fst::any_of(self.chars())
    }

    /// Σ*.
    pub fn sigma_star(&self) -> Fst {
        self.sigma().closure().optimize()
    }

    /// Any single symbol satisfying `pred`.
    pub fn class(&self, pred: impl Fn(char) -> bool) -> Fst {
        Fst::any_of(self.chars().filter(|&c| pred(c)))
    }

    /// Fails on the first character the grammars cannot read.
    pub fn check(&self, text: &str) -> Result<()> {
        match text.char_indices().find(|(_, c)| !self.contains(*c)) {
            Some((offset, ch)) => Err(Error::OutOfAlphabet { ch, offset }),
            None => Ok(()),
        }
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Alphabet::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_covers_common_text() {
        let sigma = Alphabet::standard();
        for c in ['a', 'Z', '7', ' ', '—', '₹', '€', 'π', 'é', '√'] {
            assert!(sigma.contains(c), "missing {c:?}");
        }
        assert!(sigma.check("Dr. Smith paid $5.50 — π ≈ 3.14").is_ok());
    }

    #[test]
    fn standard_covers_indic_scripts_and_superscripts() {
        let sigma = Alphabet::standard();
        for text in ["नमस्ते १२३।", "বাংলা ৪৫", "తెలుగు ౯౧", "தமிழ்", "ಕನ್ನಡ", "മലയാളം", "සිංහල", "x²", "10⁻⁷"] {
            assert!(sigma.check(text).is_ok(), "rejected {text:?}");
        }
    }

    #[test]
    fn check_reports_offset() {
        let err = Alphabet::standard().check("ab😀").unwrap_err();
        assert!(matches!(err, Error::OutOfAlphabet { ch: '😀', offset: 2 }), "got {err:?}");
    }
}
