//! Token types shared by every language tokenizer

use serde::{Deserialize, Serialize};
use std::fmt;

/// Token kinds produced by a tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Identifier,
    Keyword,
    Selector,
    String,
    Number,
    Symbol,
    Eof,
}

/// A token with its raw text and byte offset in the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Raw source text (quotes included for strings).
    pub value: String,
    /// Canonical form when the token was recognized as a keyword.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalized: Option<String>,
    /// Byte offset of the first character. Diagnostics only.
    pub position: usize,
    /// Morphological certainty of the keyword recognition.
    #[serde(default = "full_confidence")]
    pub confidence: f32,
}

fn full_confidence() -> f32 {
    1.0
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, position: usize) -> Self {
        Self {
            kind,
            value: value.into(),
            normalized: None,
            position,
            confidence: 1.0,
        }
    }

    /// Keyword token carrying its canonical form.
    pub fn keyword(
        value: impl Into<String>,
        canonical: impl Into<String>,
        position: usize,
        confidence: f32,
    ) -> Self {
        Self {
            kind: TokenKind::Keyword,
            value: value.into(),
            normalized: Some(canonical.into()),
            position,
            confidence,
        }
    }

    pub fn eof(position: usize) -> Self {
        Self::new(TokenKind::Eof, "", position)
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    /// True when this is a keyword whose canonical form is `canonical`.
    pub fn is_keyword(&self, canonical: &str) -> bool {
        self.kind == TokenKind::Keyword && self.normalized.as_deref() == Some(canonical)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.normalized {
            Some(n) => write!(f, "{:?}({} => {})@{}", self.kind, self.value, n, self.position),
            None => write!(f, "{:?}({})@{}", self.kind, self.value, self.position),
        }
    }
}

/// Ordered token sequence ending in exactly one `Eof` token.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Build a stream, appending `Eof` at `end` if the tokens lack one.
    pub fn new(mut tokens: Vec<Token>, end: usize) -> Self {
        if !tokens.last().map(Token::is_eof).unwrap_or(false) {
            tokens.push(Token::eof(end));
        }
        Self { tokens }
    }

    /// All tokens including the trailing `Eof`.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Tokens without the trailing `Eof`.
    pub fn significant(&self) -> &[Token] {
        match self.tokens.split_last() {
            Some((last, rest)) if last.is_eof() => rest,
            _ => &self.tokens,
        }
    }

    pub fn len(&self) -> usize {
        self.significant().len()
    }

    pub fn is_empty(&self) -> bool {
        self.significant().is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// Split into sub-slices at every token accepted by `is_separator`.
    /// Empty segments are dropped.
    pub fn split<'a>(&'a self, is_separator: impl Fn(&Token) -> bool) -> Vec<&'a [Token]> {
        self.significant()
            .split(|t| is_separator(t))
            .filter(|segment| !segment.is_empty())
            .collect()
    }

    pub fn into_vec(self) -> Vec<Token> {
        self.tokens
    }
}

impl<'a> IntoIterator for &'a TokenStream {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_appends_eof() {
        let stream = TokenStream::new(vec![Token::new(TokenKind::Identifier, "x", 0)], 1);
        assert_eq!(stream.tokens().len(), 2);
        assert!(stream.tokens()[1].is_eof());
        assert_eq!(stream.len(), 1);
    }

    #[test]
    fn test_stream_keeps_single_eof() {
        let stream = TokenStream::new(vec![Token::eof(0)], 0);
        assert_eq!(stream.tokens().len(), 1);
        assert!(stream.is_empty());
    }

    #[test]
    fn test_split_drops_empty_segments() {
        let tokens = vec![
            Token::keyword("then", "then", 0, 1.0),
            Token::new(TokenKind::Identifier, "a", 5),
            Token::keyword("then", "then", 7, 1.0),
            Token::keyword("then", "then", 12, 1.0),
            Token::new(TokenKind::Identifier, "b", 17),
        ];
        let stream = TokenStream::new(tokens, 18);
        let parts = stream.split(|t| t.is_keyword("then"));
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0][0].value, "a");
        assert_eq!(parts[1][0].value, "b");
    }
}
