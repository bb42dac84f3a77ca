//! The fixed preprocessing cascade run over raw input before classification.
//!
//! Rules run in declaration order, one pass each. The order matters: native
//! digits become ASCII first so every numeric rule sees them, and the
//! symbol-spacing insertions run before the hyphen joiner is turned into a
//! space, so later rules see the spaces earlier ones created.

use super::cdrewrite::{Context, Rewrite, RewriteRule};
use crate::error::Result;
use crate::fst::{Alphabet, Fst};
use serde::{Deserialize, Serialize};

/// Prefix operators that are read as separate words.
const MATH_PREFIX_SYMBOLS: [char; 6] = ['√', '∑', '∏', '∫', '∂', '∇'];

/// Zero digit of each Indic script; the other nine follow it in order.
const NATIVE_ZEROS: [char; 10] =
    ['\u{0966}', '\u{09E6}', '\u{0A66}', '\u{0AE6}', '\u{0B66}', '\u{0BE6}', '\u{0C66}', '\u{0CE6}', '\u{0D66}', '\u{0DE6}'];

/// Native digit to ASCII digit, one entry per script and value.
fn native_digits() -> Vec<(String, String)> {
    NATIVE_ZEROS
        .iter()
        .flat_map(|&zero| {
            (0..10u32).filter_map(move |value| {
                let native = char::from_u32(zero as u32 + value)?;
                let ascii = char::from_digit(value, 10)?;
                Some((native.to_string(), ascii.to_string()))
            })
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewriteCascade {
    rules: Vec<Rewrite>,
}

impl RewriteCascade {
    pub fn new(rules: Vec<Rewrite>) -> Self {
        RewriteCascade { rules }
    }

    /// The standard text preprocessing cascade.
    pub fn preprocessing(sigma: &Alphabet) -> Result<Self> {
        let digit = sigma.class(|c| c.is_ascii_digit());
        let letter = sigma.class(|c| c.is_alphabetic());
        let non_digit = sigma.class(|c| !c.is_ascii_digit() && !c.is_whitespace() && c != '=');
        let native = native_digits();

        let rules = [
            RewriteRule::new(
                "native_digit_to_ascii",
                Fst::string_map(native.iter().map(|(from, to)| (from.as_str(), to.as_str()))),
                Context::any(),
                Context::any(),
            ),
            RewriteRule::new(
                "math_symbol_to_spaced",
                Fst::insert(" "),
                Context::new(Fst::any_of(MATH_PREFIX_SYMBOLS)),
                Context::new(&digit | &letter),
            ),
            RewriteRule::new(
                "underscore_to_space",
                Fst::cross("_", " "),
                Context::new(digit.clone()),
                Context::new(letter.clone()),
            ),
            RewriteRule::new(
                "emdash_joiner_to_space",
                Fst::cross("—", " "),
                Context::new(digit.clone()),
                Context::new(letter.clone()),
            ),
            RewriteRule::new("emdash_to_spaced", Fst::cross("—", "— "), Context::any(), Context::new(digit.clone())),
            RewriteRule::new(
                "equals_to_spaced",
                Fst::cross("=", " = "),
                Context::new(non_digit),
                Context::new(digit.clone()),
            ),
            RewriteRule::new("joiner_hyphen_to_space", Fst::cross("-", " "), Context::new(digit), Context::new(letter)),
        ];

        let compiled = rules.iter().map(|rule| rule.compile(sigma)).collect::<Result<Vec<_>>>()?;
        Ok(RewriteCascade { rules: compiled })
    }

    pub fn rules(&self) -> &[Rewrite] {
        &self.rules
    }

    /// Runs every rule once, in order.
    pub fn apply(&self, text: &str) -> Result<String> {
        let mut current = text.to_string();
        for rule in &self.rules {
            let next = rule.apply(&current)?;
            if next != current {
                tracing::trace!(rule = rule.name(), before = %current, after = %next, "rewrite applied");
            }
            current = next;
        }
        Ok(current)
    }

    /// The whole cascade as one transducer.
    pub fn to_fst(&self) -> Fst {
        self.rules.iter().fold(None::<Fst>, |acc, rule| match acc {
            None => Some(rule.fst().clone()),
            Some(fst) => Some(fst.compose(rule.fst()).optimize()),
        })
        .unwrap_or_else(Fst::epsilon)
    }
}
