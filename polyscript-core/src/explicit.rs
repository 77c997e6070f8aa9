//! Explicit notation: `[action role:value ... [step] ...]`
//!
//! The explicit form is the language-neutral text encoding of a
//! [`SemanticNode`]. It is lossless: `parse_explicit(&to_explicit(n)) == n`
//! for every node the matcher can produce.

use crate::action::{Action, Role};
use crate::error::{Diagnostic, ExplicitError};
use crate::node::SemanticNode;
use crate::value::{is_reference, SemanticValue};

/// Unit suffixes accepted after a number.
pub const NUMBER_UNITS: [&str; 9] = ["ms", "s", "px", "%", "em", "rem", "vh", "vw", "deg"];

/// True when `text` looks like explicit notation rather than natural language.
pub fn is_explicit(text: &str) -> bool {
    let Some(inner) = text.trim_start().strip_prefix('[') else {
        return false;
    };
    let head = inner
        .trim_start()
        .split(|c: char| c.is_whitespace() || c == ']' || c == '[')
        .next()
        .unwrap_or("");
    head.parse::<Action>().is_ok()
}

/// Parse explicit notation into a node.
///
/// Fails when any error-severity diagnostic is produced; warnings alone do
/// not prevent a result.
pub fn parse_explicit(text: &str) -> Result<SemanticNode, ExplicitError> {
    let (node, diagnostics) = run(text);
    match node {
        Some(node) if !diagnostics.iter().any(Diagnostic::is_error) => Ok(node),
        _ => Err(ExplicitError { diagnostics }),
    }
}

/// Collect every diagnostic for `text`. An empty list means the text is valid.
pub fn validate_explicit(text: &str) -> Vec<Diagnostic> {
    run(text).1
}

/// Serialise a node. Roles are emitted in insertion order, body steps last.
pub fn to_explicit(node: &SemanticNode) -> String {
    let mut out = String::new();
    write_node(node, &mut out);
    out
}

fn write_node(node: &SemanticNode, out: &mut String) {
    out.push('[');
    out.push_str(node.action.as_str());
    for (role, value) in &node.roles {
        out.push(' ');
        out.push_str(role.as_str());
        out.push(':');
        out.push_str(&value.to_string());
    }
    for step in &node.body {
        out.push(' ');
        write_node(step, out);
    }
    out.push(']');
}

fn run(text: &str) -> (Option<SemanticNode>, Vec<Diagnostic>) {
    let mut parser = Parser {
        src: text,
        pos: 0,
        diagnostics: Vec::new(),
    };
    let node = parser.document();
    (node, parser.diagnostics)
}

/// Classify a bare (unquoted) value.
pub fn classify_bare(word: &str) -> SemanticValue {
    match word {
        "true" => return SemanticValue::boolean(true),
        "false" => return SemanticValue::boolean(false),
        _ => {}
    }
    if looks_numeric(word) {
        return SemanticValue::number(word);
    }
    if is_reference(word) {
        return SemanticValue::reference(word);
    }
    match word.chars().next() {
        Some('.' | '#' | '<' | '[' | '@') => SemanticValue::selector(word),
        _ => SemanticValue::expression(word),
    }
}

/// Numbers: optional sign, digits, optional fraction, optional unit.
pub fn looks_numeric(word: &str) -> bool {
    let unsigned = word.strip_prefix('-').unwrap_or(word);
    let digits_end = unsigned
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(unsigned.len());
    let (number, unit) = unsigned.split_at(digits_end);
    if number.is_empty()
        || !number.starts_with(|c: char| c.is_ascii_digit())
        || number.ends_with('.')
        || number.matches('.').count() > 1
    {
        return false;
    }
    unit.is_empty() || NUMBER_UNITS.contains(&unit)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Parser<'a> {
    fn rest(&self) -> &'a str {
        let src = self.src;
        &src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while self.peek().map(char::is_whitespace).unwrap_or(false) {
            self.bump();
        }
    }

    fn error(&mut self, message: impl Into<String>, offset: usize) {
        self.diagnostics.push(Diagnostic::error(message, offset));
    }

    fn document(&mut self) -> Option<SemanticNode> {
        self.skip_ws();
        match self.peek() {
            None => {
                self.error("empty input", self.pos);
                return None;
            }
            Some('[') => {}
            Some(_) => {
                self.error("expected '[' to open a command", self.pos);
                return None;
            }
        }
        let node = self.group();
        self.skip_ws();
        if self.peek().is_some() {
            self.error("unexpected text after closing ']'", self.pos);
        }
        node
    }

    /// Parse one bracketed group; the cursor sits on `[`.
    fn group(&mut self) -> Option<SemanticNode> {
        let open = self.pos;
        self.bump();
        self.skip_ws();

        let action_start = self.pos;
        let name = self.take_while(|c| !c.is_whitespace() && c != ']' && c != '[');
        let action = if name.is_empty() {
            self.error("missing action name", action_start);
            None
        } else {
            match name.parse::<Action>() {
                Ok(action) => Some(action),
                Err(_) => {
                    self.error(format!("unknown action `{}`", name), action_start);
                    None
                }
            }
        };
        let mut node = action.map(SemanticNode::new);

        loop {
            self.skip_ws();
            match self.peek() {
                None => {
                    self.error("unclosed '['", open);
                    break;
                }
                Some(']') => {
                    self.bump();
                    break;
                }
                Some('[') => {
                    let step_start = self.pos;
                    if let Some(step) = self.group() {
                        if let Some(node) = node.as_mut() {
                            if !node.action.kind().has_body() {
                                self.diagnostics.push(Diagnostic::warning(
                                    format!("`{}` does not take body steps", node.action),
                                    step_start,
                                ));
                            }
                            node.body.push(step);
                        }
                    }
                }
                Some(_) => {
                    let pair_start = self.pos;
                    if let Some((role, value)) = self.role_value() {
                        if let Some(node) = node.as_mut() {
                            if node.roles.insert(role, value).is_some() {
                                self.diagnostics.push(Diagnostic::warning(
                                    format!("duplicate role `{}`, last value kept", role),
                                    pair_start,
                                ));
                            }
                        }
                    }
                }
            }
        }
        node
    }

    fn role_value(&mut self) -> Option<(Role, SemanticValue)> {
        let start = self.pos;
        let name = self.take_while(|c| !c.is_whitespace() && !matches!(c, ':' | ']' | '['));
        if self.peek() != Some(':') {
            if name.is_empty() {
                // Stray character; consume it so the loop advances.
                let c = self.bump();
                self.error(format!("unexpected character {:?}", c.unwrap_or(' ')), start);
            } else {
                self.error(format!("expected `role:value`, found `{}`", name), start);
            }
            return None;
        }
        self.bump();

        let role = match name.parse::<Role>() {
            Ok(role) => Some(role),
            Err(_) => {
                self.error(format!("unknown role `{}`", name), start);
                None
            }
        };

        let value_start = self.pos;
        let value = match self.value() {
            Some(value) => value,
            None => {
                if !self.diagnostics.iter().any(|d| d.offset == value_start) {
                    self.error(format!("missing value for `{}`", name), value_start);
                }
                return None;
            }
        };
        let role = role?;
        Some((role, value))
    }

    fn value(&mut self) -> Option<SemanticValue> {
        let mut value = match self.peek()? {
            '"' | '\'' => self.quoted()?,
            '[' => {
                let text = self.bracketed();
                SemanticValue::selector(text)
            }
            _ => {
                let word = self.bare();
                if word.is_empty() {
                    return None;
                }
                classify_bare(word)
            }
        };

        while self.at_possessive() {
            self.pos += 2;
            self.skip_ws();
            let prop_start = self.pos;
            let property = self.bare();
            if property.is_empty() {
                self.error("missing property after possessive", prop_start);
                return None;
            }
            value = SemanticValue::property_path(value, property);
        }
        Some(value)
    }

    /// `'s` followed by whitespace.
    fn at_possessive(&self) -> bool {
        let rest = self.rest();
        rest.starts_with("'s")
            && rest[2..]
                .chars()
                .next()
                .map(char::is_whitespace)
                .unwrap_or(false)
    }

    fn quoted(&mut self) -> Option<SemanticValue> {
        let start = self.pos;
        let quote = self.bump()?;
        let mut text = String::new();
        loop {
            match self.bump() {
                None => {
                    self.error("unterminated string", start);
                    return None;
                }
                Some(c) if c == quote => break,
                Some('\\') => match self.bump() {
                    Some('n') => text.push('\n'),
                    Some('t') => text.push('\t'),
                    Some(c) => text.push(c),
                    None => {
                        self.error("unterminated string", start);
                        return None;
                    }
                },
                Some(c) => text.push(c),
            }
        }
        Some(SemanticValue::string(text))
    }

    /// Attribute selector `[...]`, nesting-aware.
    fn bracketed(&mut self) -> &'a str {
        let start = self.pos;
        let mut depth = 0usize;
        while let Some(c) = self.peek() {
            self.bump();
            match c {
                '[' => depth += 1,
                ']' => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
        }
        let src = self.src;
        &src[start..self.pos]
    }

    /// Bare value: stops at top-level whitespace, at an unbalanced `]` and
    /// before a possessive. Whitespace inside `(...)` is kept.
    fn bare(&mut self) -> &'a str {
        let start = self.pos;
        let mut parens = 0usize;
        let mut brackets = 0usize;
        while let Some(c) = self.peek() {
            if parens == 0 && brackets == 0 {
                if c.is_whitespace() || c == ']' {
                    break;
                }
                if self.pos > start && self.at_possessive_or_end() {
                    break;
                }
            }
            match c {
                '(' => parens += 1,
                ')' => parens = parens.saturating_sub(1),
                '[' => brackets += 1,
                ']' => brackets = brackets.saturating_sub(1),
                _ => {}
            }
            self.bump();
        }
        let src = self.src;
        &src[start..self.pos]
    }

    /// `'s` followed by whitespace, `]` or end of input.
    fn at_possessive_or_end(&self) -> bool {
        let rest = self.rest();
        rest.starts_with("'s")
            && rest[2..]
                .chars()
                .next()
                .map(|c| c.is_whitespace() || c == ']')
                .unwrap_or(true)
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().map(&pred).unwrap_or(false) {
            self.bump();
        }
        let src = self.src;
        &src[start..self.pos]
    }
}

// =============================================================================
// TESTS
// =============================================================================
