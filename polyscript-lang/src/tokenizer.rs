//! Tokenizer
//!
//! Splits natural-language command text into tokens. Selectors, strings,
//! numbers and variables are recognized structurally; words are looked up
//! in the profile's keyword tables (exact, then by normalized stem) and
//! otherwise become identifiers. Tokenizing never fails.

use crate::morphology::{fold, is_combining_mark, Normalizer};
use crate::profile::{Attachment, LanguageProfile, Segmentation, CANONICAL_THEN};
use once_cell::sync::Lazy;
use polyscript_core::{Action, Token, TokenKind, TokenStream};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

static NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?\d+(?:\.\d+)?(ms|s|px|%|em|rem|vh|vw|deg)?").expect("number pattern is valid")
});

/// Turns text in one language into a token stream.
pub trait Tokenizer: Send + Sync {
    fn language(&self) -> &str;
    fn tokenize(&self, text: &str) -> TokenStream;
}

pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || is_combining_mark(c)
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '-'
}

fn is_selector_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '#' | ':')
}

/// Profile-driven tokenizer.
pub struct LanguageTokenizer {
    profile: Arc<LanguageProfile>,
    normalizer: Option<Arc<dyn Normalizer>>,
    /// Prepared keyword form → action.
    keywords: HashMap<String, Action>,
    /// Normalized stem of each keyword form → action.
    stems: HashMap<String, Action>,
    connectives: HashSet<String>,
    /// Raw keyword spellings, for suffix absorption during segmentation.
    keyword_forms: HashSet<String>,
    /// Segmentation vocabulary, longest first. Empty for whitespace languages.
    dictionary: Vec<String>,
    /// Attached particles, longest first.
    particles: Vec<String>,
    apostrophe_suffixes: bool,
}

impl LanguageTokenizer {
    pub fn new(profile: Arc<LanguageProfile>, normalizer: Option<Arc<dyn Normalizer>>) -> Self {
        let mut tokenizer = Self {
            profile,
            normalizer,
            keywords: HashMap::new(),
            stems: HashMap::new(),
            connectives: HashSet::new(),
            keyword_forms: HashSet::new(),
            dictionary: Vec::new(),
            particles: Vec::new(),
            apostrophe_suffixes: false,
        };
        tokenizer.build_tables();
        tokenizer
    }

    /// Extend the segmentation vocabulary (schema markers, template literals).
    pub fn with_vocabulary<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.profile.segmentation == Segmentation::Dictionary {
            self.dictionary
                .extend(words.into_iter().map(Into::into).filter(|w| !w.is_empty()));
            sort_longest_first(&mut self.dictionary);
        }
        self
    }

    pub fn profile(&self) -> &LanguageProfile {
        &self.profile
    }

    fn build_tables(&mut self) {
        let profile = Arc::clone(&self.profile);

        for action in Action::keyworded() {
            let Some(entry) = profile.keyword(action) else {
                continue;
            };
            for form in entry.forms() {
                let prepared = self.prepare(form);
                self.keywords.entry(prepared).or_insert(action);
                self.keyword_forms.insert(form.to_string());
                if let Some(normalizer) = &self.normalizer {
                    let result = normalizer.normalize(form);
                    if result.is_changed() {
                        self.stems.entry(result.stem().to_string()).or_insert(action);
                    }
                }
            }
        }

        for form in profile.connective_forms() {
            let prepared = self.prepare(form);
            self.connectives.insert(prepared);
        }

        let possessive = profile.possessive.iter();
        for marker in profile.role_markers.values().chain(possessive) {
            match marker.attachment {
                Attachment::Attached => self
                    .particles
                    .extend(marker.forms().filter(|f| !f.is_empty()).map(str::to_string)),
                Attachment::Apostrophe => self.apostrophe_suffixes = true,
                Attachment::Separate => {}
            }
        }
        sort_longest_first(&mut self.particles);

        if profile.segmentation == Segmentation::Dictionary {
            let mut words: Vec<String> = self.keyword_forms.iter().cloned().collect();
            for marker in profile.role_markers.values().chain(profile.possessive.iter()) {
                words.extend(marker.forms().map(str::to_string));
            }
            words.extend(profile.connective_forms().into_iter().map(str::to_string));
            words.extend(profile.references.values().cloned());
            words.retain(|w| !w.is_empty());
            self.dictionary = words;
            sort_longest_first(&mut self.dictionary);
        }
    }

    fn prepare(&self, word: &str) -> String {
        match &self.normalizer {
            Some(normalizer) => normalizer.prepare(word),
            None => fold(word),
        }
    }

    /// Keyword lookup for one word: exact prepared form, then the
    /// normalized stem against keyword forms and keyword stems.
    pub fn classify(&self, word: &str, position: usize) -> Token {
        let prepared = self.prepare(word);
        if self.connectives.contains(&prepared) {
            return Token::keyword(word, CANONICAL_THEN, position, 1.0);
        }
        if let Some(action) = self.keywords.get(&prepared) {
            return Token::keyword(word, action.as_str(), position, 1.0);
        }
        if let Some(normalizer) = &self.normalizer {
            if normalizer.is_normalizable(word) {
                let result = normalizer.normalize(word);
                if result.is_changed() {
                    let stem = result.stem();
                    if let Some(action) = self.keywords.get(stem).or_else(|| self.stems.get(stem)) {
                        return Token::keyword(word, action.as_str(), position, result.confidence());
                    }
                }
            }
        }
        Token::new(TokenKind::Identifier, word, position)
    }

    fn emit_word(&self, word: &str, position: usize, tokens: &mut Vec<Token>) {
        if !self.dictionary.is_empty() && !word.is_ascii() {
            self.segment(word, position, tokens);
        } else if !self.particles.is_empty() {
            self.split_particle(word, position, tokens);
        } else {
            tokens.push(self.classify(word, position));
        }
    }

    /// Split a trailing attached particle off a word, unless the whole word
    /// is a keyword.
    fn split_particle(&self, word: &str, position: usize, tokens: &mut Vec<Token>) {
        let whole = self.classify(word, position);
        if whole.kind == TokenKind::Keyword {
            tokens.push(whole);
            return;
        }
        for particle in &self.particles {
            if word.len() > particle.len() {
                if let Some(stem) = word.strip_suffix(particle.as_str()) {
                    tokens.push(self.classify(stem, position));
                    tokens.push(Token::new(
                        TokenKind::Identifier,
                        particle.as_str(),
                        position + stem.len(),
                    ));
                    return;
                }
            }
        }
        tokens.push(whole);
    }

    /// Longest-match segmentation of a run without spaces.
    fn segment(&self, run: &str, position: usize, tokens: &mut Vec<Token>) {
        let mut i = 0;
        let mut pending: Option<usize> = None;
        while i < run.len() {
            match self.dictionary_match(&run[i..]) {
                Some(len) => {
                    if let Some(start) = pending.take() {
                        tokens.push(self.classify(&run[start..i], position + start));
                    }
                    tokens.push(self.classify(&run[i..i + len], position + i));
                    i += len;
                }
                None => {
                    pending.get_or_insert(i);
                    i += run[i..].chars().next().map(char::len_utf8).unwrap_or(1);
                }
            }
        }
        if let Some(start) = pending {
            tokens.push(self.classify(&run[start..], position + start));
        }
    }

    /// Byte length of the dictionary word at the start of `s`. Keywords
    /// absorb normalizer prefixes before and suffixes after them.
    fn dictionary_match(&self, s: &str) -> Option<usize> {
        let prefixes = self
            .normalizer
            .as_ref()
            .map(|n| n.prefixes())
            .unwrap_or_default();

        let mut best: Option<usize> = None;
        for prefix in std::iter::once("").chain(prefixes) {
            let Some(rest) = s.strip_prefix(prefix) else {
                continue;
            };
            let hit = self.dictionary.iter().find(|entry| {
                rest.starts_with(entry.as_str())
                    && (prefix.is_empty() || self.keyword_forms.contains(entry.as_str()))
            });
            if let Some(entry) = hit {
                let mut len = prefix.len() + entry.len();
                if self.keyword_forms.contains(entry.as_str()) {
                    len += self.absorb_suffixes(&s[len..]);
                }
                if best.map(|b| len > b).unwrap_or(true) {
                    best = Some(len);
                }
            }
        }
        best
    }

    fn absorb_suffixes(&self, rest: &str) -> usize {
        let Some(normalizer) = &self.normalizer else {
            return 0;
        };
        let suffixes = normalizer.suffixes();
        let mut absorbed = 0;
        for _ in 0..2 {
            let tail = &rest[absorbed..];
            let longest = suffixes
                .iter()
                .filter(|suffix| !suffix.is_empty() && tail.starts_with(**suffix))
                .max_by_key(|suffix| suffix.len());
            let Some(suffix) = longest else {
                break;
            };
            // A longer vocabulary word starting here wins over the suffix.
            if self
                .dictionary
                .iter()
                .any(|entry| entry.len() > suffix.len() && tail.starts_with(entry.as_str()))
            {
                break;
            }
            absorbed += suffix.len();
        }
        absorbed
    }
}

impl Tokenizer for LanguageTokenizer {
    fn language(&self) -> &str {
        &self.profile.code
    }

    fn tokenize(&self, text: &str) -> TokenStream {
        let mut scanner = Scanner {
            src: text,
            pos: 0,
        };
        let mut tokens = Vec::new();

        while let Some(c) = scanner.peek() {
            if c.is_whitespace() {
                scanner.bump();
                continue;
            }
            let start = scanner.pos;
            let next = scanner.peek_nth(1);

            match c {
                '#' | '.' if next.map(is_ident_start).unwrap_or(false) => {
                    let value = scanner.selector();
                    tokens.push(Token::new(TokenKind::Selector, value, start));
                }
                '<' if next.map(|n| n.is_ascii_alphabetic()).unwrap_or(false) => {
                    match scanner.until_inclusive('>') {
                        Some(value) => tokens.push(Token::new(TokenKind::Selector, value, start)),
                        None => tokens.push(scanner.symbol()),
                    }
                }
                '[' => match scanner.balanced('[', ']') {
                    Some(value) => tokens.push(Token::new(TokenKind::Selector, value, start)),
                    None => tokens.push(scanner.symbol()),
                },
                '@' if next.map(|n| n.is_ascii_alphabetic()).unwrap_or(false) => {
                    scanner.bump();
                    scanner.take_while(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
                    tokens.push(Token::new(TokenKind::Selector, scanner.since(start), start));
                }
                '"' => {
                    let value = scanner.quoted('"');
                    tokens.push(Token::new(TokenKind::String, value, start));
                }
                '「' => {
                    let value = scanner.quoted('」');
                    tokens.push(Token::new(TokenKind::String, value, start));
                }
                '\'' if scanner.after_space() => {
                    if scanner.rest()[1..].contains('\'') {
                        let value = scanner.quoted('\'');
                        tokens.push(Token::new(TokenKind::String, value, start));
                    } else {
                        tokens.push(scanner.symbol());
                    }
                }
                '\'' => {
                    if self.apostrophe_suffixes {
                        // `#btn'e`: the suffix becomes its own word.
                        scanner.bump();
                    } else if scanner.rest().starts_with("'s")
                        && !scanner.peek_nth(2).map(is_word_char).unwrap_or(false)
                    {
                        scanner.bump();
                        scanner.bump();
                        tokens.push(Token::new(TokenKind::Symbol, "'s", start));
                    } else {
                        tokens.push(scanner.symbol());
                    }
                }
                ':' | '$' if next.map(is_ident_start).unwrap_or(false) => {
                    scanner.bump();
                    scanner.take_while(|c| is_word_char(c) || c == '-');
                    tokens.push(Token::new(TokenKind::Identifier, scanner.since(start), start));
                }
                '/' if next.map(|n| is_word_char(n) || n == '/').unwrap_or(false) => {
                    scanner.path();
                    tokens.push(Token::new(TokenKind::Identifier, scanner.since(start), start));
                }
                c if c.is_ascii_digit()
                    || (c == '-'
                        && scanner.after_space()
                        && next.map(|n| n.is_ascii_digit()).unwrap_or(false)) =>
                {
                    match scanner.number() {
                        Some(value) => tokens.push(Token::new(TokenKind::Number, value, start)),
                        None => {
                            let word = scanner.word();
                            self.emit_word(word, start, &mut tokens);
                        }
                    }
                }
                c if is_word_char(c) => {
                    let word = scanner.word();
                    if scanner.rest().starts_with("://") {
                        scanner.path();
                        tokens.push(Token::new(TokenKind::Identifier, scanner.since(start), start));
                    } else if scanner.peek() == Some('(') {
                        scanner.balanced('(', ')');
                        tokens.push(Token::new(TokenKind::Identifier, scanner.since(start), start));
                    } else {
                        self.emit_word(word, start, &mut tokens);
                    }
                }
                _ => tokens.push(scanner.symbol()),
            }
        }

        TokenStream::new(tokens, text.len())
    }
}

impl std::fmt::Debug for LanguageTokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageTokenizer")
            .field("language", &self.profile.code)
            .field("normalizer", &self.normalizer.is_some())
            .field("keywords", &self.keywords.len())
            .field("dictionary", &self.dictionary.len())
            .finish()
    }
}

fn sort_longest_first(words: &mut Vec<String>) {
    words.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    words.dedup();
}

/// Character cursor over the source with byte positions.
struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn rest(&self) -> &'a str {
        let src = self.src;
        &src[self.pos..]
    }

    fn since(&self, start: usize) -> &'a str {
        let src = self.src;
        &src[start..self.pos]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// True at the start of input or right after whitespace.
    fn after_space(&self) -> bool {
        self.src[..self.pos]
            .chars()
            .next_back()
            .map(char::is_whitespace)
            .unwrap_or(true)
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().map(&pred).unwrap_or(false) {
            self.bump();
        }
        self.since(start)
    }

    fn symbol(&mut self) -> Token {
        let start = self.pos;
        self.bump();
        Token::new(TokenKind::Symbol, self.since(start), start)
    }

    /// `#id`, `.class`, chained and with `:pseudo` or `[attr]` parts.
    /// Trailing sentence punctuation is left alone.
    fn selector(&mut self) -> &'a str {
        let start = self.pos;
        self.bump();
        loop {
            match self.peek() {
                Some('[') => {
                    if self.balanced('[', ']').is_none() {
                        break;
                    }
                }
                Some('(') if self.since(start).ends_with(|c: char| c.is_ascii_alphanumeric()) => {
                    if self.balanced('(', ')').is_none() {
                        break;
                    }
                }
                Some(c) if is_selector_char(c) => {
                    self.bump();
                }
                _ => break,
            }
        }
        while self.pos > start + 1 && self.since(start).ends_with(|c| c == '.' || c == ':') {
            self.pos -= 1;
        }
        self.since(start)
    }

    /// Consume from an opening delimiter through its matching close. Leaves
    /// the cursor untouched when unbalanced.
    fn balanced(&mut self, open: char, close: char) -> Option<&'a str> {
        let start = self.pos;
        let mut depth = 0usize;
        for (offset, c) in self.rest().char_indices() {
            if c == open {
                depth += 1;
            } else if c == close {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    self.pos = start + offset + c.len_utf8();
                    return Some(self.since(start));
                }
            }
        }
        None
    }

    fn until_inclusive(&mut self, close: char) -> Option<&'a str> {
        let start = self.pos;
        let rest = self.rest();
        let end = rest.find(|c: char| c == close || c.is_whitespace())?;
        if !rest[end..].starts_with(close) {
            return None;
        }
        self.pos = start + end + close.len_utf8();
        Some(self.since(start))
    }

    /// Quoted string through the closing quote; unterminated strings run to
    /// end of input. The raw text, quotes included, is returned.
    fn quoted(&mut self, close: char) -> &'a str {
        let start = self.pos;
        self.bump();
        while let Some(c) = self.bump() {
            if c == '\\' {
                self.bump();
            } else if c == close {
                break;
            }
        }
        self.since(start)
    }

    fn path(&mut self) {
        self.take_while(|c| !c.is_whitespace() && !matches!(c, '\'' | '"' | '」' | '「'));
    }

    fn word(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if is_word_char(c) {
                self.bump();
            } else if c == '-' && self.peek_nth(1).map(is_word_char).unwrap_or(false) && self.pos > start {
                self.bump();
            } else {
                break;
            }
        }
        if self.pos == start {
            self.bump();
        }
        self.since(start)
    }

    /// Number with optional unit; the next character must not continue a
    /// word.
    fn number(&mut self) -> Option<&'a str> {
        let rest = self.rest();
        let captures = NUMBER.captures(rest)?;
        let full = captures.get(0)?.end();
        let bare = captures.get(1).map(|unit| unit.start()).unwrap_or(full);
        let boundary = |end: usize| {
            !rest[end..]
                .chars()
                .next()
                .map(|c| c.is_ascii_alphanumeric() || c == '_')
                .unwrap_or(false)
        };
        let end = [full, bare].into_iter().find(|end| boundary(*end))?;
        let start = self.pos;
        self.pos += end;
        Some(self.since(start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::languages;

    fn english() -> LanguageTokenizer {
        LanguageTokenizer::new(Arc::new(languages::english()), None)
    }

    fn kinds(stream: &TokenStream) -> Vec<(TokenKind, String)> {
        stream
            .significant()
            .iter()
            .map(|t| (t.kind, t.value.clone()))
            .collect()
    }

    #[test]
    fn test_structural_tokens() {
        let stream = english().tokenize(r#"put "hi" into #out.box then wait 500ms"#);
        assert_eq!(
            kinds(&stream),
            vec![
                (TokenKind::Keyword, "put".to_string()),
                (TokenKind::String, "\"hi\"".to_string()),
                (TokenKind::Identifier, "into".to_string()),
                (TokenKind::Selector, "#out.box".to_string()),
                (TokenKind::Keyword, "then".to_string()),
                (TokenKind::Keyword, "wait".to_string()),
                (TokenKind::Number, "500ms".to_string()),
            ]
        );
        assert!(stream.tokens().last().map(Token::is_eof).unwrap_or(false));
    }

    #[test]
    fn test_keyword_tokens_carry_canonical_form() {
        let stream = english().tokenize("Toggle .active");
        let first = &stream.significant()[0];
        assert!(first.is_keyword("toggle"));
        assert_eq!(first.value, "Toggle");
        assert_eq!(first.confidence, 1.0);
    }

    #[test]
    fn test_selector_variants() {
        let stream = english().tokenize("<button/> [data-open=true] @disabled .item:hover.");
        let values: Vec<_> = stream.significant().iter().map(|t| (t.kind, t.value.as_str())).collect();
        assert_eq!(
            values,
            vec![
                (TokenKind::Selector, "<button/>"),
                (TokenKind::Selector, "[data-open=true]"),
                (TokenKind::Selector, "@disabled"),
                (TokenKind::Selector, ".item:hover"),
                (TokenKind::Symbol, "."),
            ]
        );
    }

    #[test]
    fn test_variables_paths_and_calls() {
        let stream = english().tokenize("fetch /api/users :count $total format(a, b)");
        let values: Vec<_> = stream.significant().iter().map(|t| t.value.as_str()).collect();
        assert_eq!(values, vec!["fetch", "/api/users", ":count", "$total", "format(a, b)"]);
        assert!(stream.significant()[1..]
            .iter()
            .all(|t| t.kind == TokenKind::Identifier));
    }

    #[test]
    fn test_number_boundaries() {
        let stream = english().tokenize("2 1.5s 3sec -4 10%");
        let values: Vec<_> = stream
            .significant()
            .iter()
            .map(|t| (t.kind, t.value.as_str()))
            .collect();
        assert_eq!(
            values,
            vec![
                (TokenKind::Number, "2"),
                (TokenKind::Number, "1.5s"),
                (TokenKind::Identifier, "3sec"),
                (TokenKind::Number, "-4"),
                (TokenKind::Number, "10%"),
            ]
        );
    }

    #[test]
    fn test_possessive_symbol() {
        let stream = english().tokenize("log #name's value");
        let values: Vec<_> = stream.significant().iter().map(|t| (t.kind, t.value.as_str())).collect();
        assert_eq!(
            values,
            vec![
                (TokenKind::Keyword, "log"),
                (TokenKind::Selector, "#name"),
                (TokenKind::Symbol, "'s"),
                (TokenKind::Identifier, "value"),
            ]
        );
    }

    #[test]
    fn test_single_quoted_string() {
        let stream = english().tokenize("log 'hello there'");
        assert_eq!(stream.significant()[1].kind, TokenKind::String);
        assert_eq!(stream.significant()[1].value, "'hello there'");
    }

    #[test]
    fn test_positions_are_byte_offsets() {
        let stream = english().tokenize("show  #a");
        assert_eq!(stream.significant()[1].position, 6);
        assert_eq!(stream.tokens().last().map(|t| t.position), Some(8));
    }

    #[test]
    fn test_empty_input_yields_eof_only() {
        let stream = english().tokenize("   ");
        assert!(stream.is_empty());
        assert_eq!(stream.tokens().len(), 1);
    }

    #[cfg(feature = "lang-es")]
    #[test]
    fn test_spanish_inflections_normalize() {
        let tokenizer = LanguageTokenizer::new(
            Arc::new(languages::spanish()),
            Some(Arc::new(languages::spanish_normalizer())),
        );
        let stream = tokenizer.tokenize("mostrarlo");
        let token = &stream.significant()[0];
        assert!(token.is_keyword("show"));
        assert!(token.confidence < 1.0 && token.confidence >= 0.5);

        let stream = tokenizer.tokenize("alternando .activo");
        assert!(stream.significant()[0].is_keyword("toggle"));
    }

    #[cfg(feature = "lang-ja")]
    #[test]
    fn test_japanese_dictionary_segmentation() {
        let tokenizer = LanguageTokenizer::new(
            Arc::new(languages::japanese()),
            Some(Arc::new(languages::japanese_normalizer())),
        );
        let stream = tokenizer.tokenize(".activeを切り替えてください");
        let values: Vec<_> = stream.significant().iter().map(|t| t.value.as_str()).collect();
        assert_eq!(values, vec![".active", "を", "切り替えてください"]);
        assert!(stream.significant()[2].is_keyword("toggle"));
    }

    #[cfg(feature = "lang-ko")]
    #[test]
    fn test_korean_particle_split() {
        let tokenizer = LanguageTokenizer::new(
            Arc::new(languages::korean()),
            Some(Arc::new(languages::korean_normalizer())),
        );
        let stream = tokenizer.tokenize("count를 증가");
        let values: Vec<_> = stream.significant().iter().map(|t| t.value.as_str()).collect();
        assert_eq!(values, vec!["count", "를", "증가"]);
        assert!(stream.significant()[2].is_keyword("increment"));
    }

    #[cfg(feature = "lang-tr")]
    #[test]
    fn test_turkish_apostrophe_suffix() {
        let tokenizer = LanguageTokenizer::new(
            Arc::new(languages::turkish()),
            Some(Arc::new(languages::turkish_normalizer())),
        );
        let stream = tokenizer.tokenize(".active'i #btn'e ekle");
        let values: Vec<_> = stream.significant().iter().map(|t| t.value.as_str()).collect();
        assert_eq!(values, vec![".active", "i", "#btn", "e", "ekle"]);
    }
}
