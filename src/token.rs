//! Tokens and their wire format.
//!
//! Classification emits a flat string of tokens separated by single spaces:
//!
//! ```text
//! tokens { math { left: "one" operator: "plus" right: "two" } } tokens { punctuation { name: "!" } }
//! ```
//!
//! Inside a value, `"` and `\` are escaped with a backslash. Everything
//! downstream of classification works on parsed [`Token`]s, never on the raw
//! automaton output.

use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub category: String,
    pub fields: Vec<(String, String)>,
}

impl Token {
    pub fn new(category: impl Into<String>) -> Self {
        Token { category: category.into(), fields: Vec::new() }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// First value of field `name`.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
    }

    /// The field list as the verbalizers read it: `a: "x" b: "y"`.
    pub fn body(&self) -> String {
        self.fields.iter().map(|(n, v)| format!("{n}: \"{}\"", escape(v))).collect::<Vec<_>>().join(" ")
    }

    pub fn to_wire(&self) -> String {
        if self.fields.is_empty() {
            format!("tokens {{ {} {{ }} }}", self.category)
        } else {
            format!("tokens {{ {} {{ {} }} }}", self.category, self.body())
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire())
    }
}

/// Serializes a token sequence.
pub fn to_wire(tokens: &[Token]) -> String {
    tokens.iter().map(Token::to_wire).collect::<Vec<_>>().join(" ")
}

/// Parses a token sequence produced by classification.
pub fn parse_tokens(wire: &str) -> Result<Vec<Token>> {
    let open = regex!(r#"^\s*tokens \{ ([a-z_]+) \{"#);
    let field = regex!(r#"^ ([a-z_]+): "((?:[^"\\]|\\.)*)""#);
    let close = regex!(r#"^ \} \}"#);

    let mut rest = wire;
    let mut tokens = Vec::new();
    while !rest.trim().is_empty() {
        let caps = open.captures(rest).ok_or_else(|| malformed(rest))?;
        let mut token = Token::new(&caps[1]);
        rest = &rest[caps[0].len()..];
        while let Some(caps) = field.captures(rest) {
            token.fields.push((caps[1].to_string(), unescape(&caps[2])));
            rest = &rest[caps[0].len()..];
        }
        let end = close.find(rest).ok_or_else(|| malformed(rest))?;
        rest = &rest[end.end()..];
        tokens.push(token);
    }
    Ok(tokens)
}

pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

pub fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.extend(chars.next()),
            c => out.push(c),
        }
    }
    out
}

fn malformed(rest: &str) -> Error {
    Error::MalformedTokens(rest.chars().take(40).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_a_token_stream() {
        let wire = r#"tokens { math { left: "one" operator: "plus" right: "two" } } tokens { punctuation { name: "!" } }"#;
        let tokens = parse_tokens(wire).expect("well formed");
        assert_eq!(
            tokens,
            vec![
                Token::new("math").with_field("left", "one").with_field("operator", "plus").with_field("right", "two"),
                Token::new("punctuation").with_field("name", "!"),
            ]
        );
        assert_eq!(to_wire(&tokens), wire);
    }

    #[test]
    fn escaped_quotes_survive() {
        let token = Token::new("punctuation").with_field("name", "\"");
        assert_eq!(token.to_wire(), r#"tokens { punctuation { name: "\"" } }"#);
        assert_eq!(parse_tokens(&token.to_wire()).expect("well formed"), vec![token]);
    }

    #[test]
    fn punctuation_flags_are_ordinary_fields() {
        let wire = r#"tokens { word { name: "yes" } } tokens { punctuation { space_before: "true" name: "/" space_after: "true" } }"#;
        let tokens = parse_tokens(wire).expect("well formed");
        assert_eq!(tokens[1].field("space_before"), Some("true"));
        assert_eq!(tokens[1].field("name"), Some("/"));
        assert_eq!(tokens[1].field("space_after"), Some("true"));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(parse_tokens("tokens { word name"), Err(Error::MalformedTokens(_))));
        assert!(matches!(parse_tokens(r#"tokens { word { name: "x" }"#), Err(Error::MalformedTokens(_))));
        assert_eq!(parse_tokens("  ").expect("empty"), vec![]);
    }
}
