use std::collections::HashMap;
use std::fmt;
use std::mem;
use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic, Label, Severity};
use serde::{Deserialize, Serialize};

/// A statement pattern with `{slot}` placeholders, e.g. `"if {condition}:"`.
/// Parsed once into literal/slot segments; instances copy the parsed form,
/// so editing a catalog never reaches blocks already on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Pattern {
    text: String,
    segments: Vec<Segment>,
    /// Distinct slot names, in first-appearance order.
    slot_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    /// Literal text emitted verbatim.
    Literal(String),
    /// A named placeholder filled from the instance's slot values.
    Slot(String),
}

/// A lint found by the checked parse. Parsing itself never fails; anything
/// that does not form `{identifier}` stays literal text.
#[derive(Debug, Clone)]
pub struct PatternIssue {
    pub message: String,
    /// Byte span into the pattern text.
    pub span: Range<usize>,
}

impl PatternIssue {
    /// Convert to a codespan Diagnostic for display.
    pub fn to_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        Diagnostic::new(Severity::Warning)
            .with_message(&self.message)
            .with_labels(vec![Label::primary(file_id, self.span.clone())])
    }
}

enum Scan {
    /// A well-formed `{name}` placeholder; `len` covers both braces.
    Slot { name: String, len: usize },
    /// Text kept literal, but worth a lint.
    Issue { message: String, len: usize },
    /// A lone `{` kept literal silently. Covers the `{{` escape used by
    /// f-string templates to emit a brace into the generated code.
    Literal,
}

impl Pattern {
    pub fn parse(text: impl Into<String>) -> Self {
        Self::parse_checked(text).0
    }

    /// Parse and report lints: unterminated placeholders and brace pairs
    /// whose content is not a valid slot name.
    pub fn parse_checked(text: impl Into<String>) -> (Self, Vec<PatternIssue>) {
        let text = text.into();
        let mut segments = Vec::new();
        let mut slot_names: Vec<String> = Vec::new();
        let mut issues = Vec::new();
        let mut literal = String::new();
        let mut i = 0;

        while i < text.len() {
            let rest = &text[i..];
            match rest.find('{') {
                Some(0) => match scan_placeholder(rest) {
                    Scan::Slot { name, len } => {
                        if !literal.is_empty() {
                            segments.push(Segment::Literal(mem::take(&mut literal)));
                        }
                        if !slot_names.contains(&name) {
                            slot_names.push(name.clone());
                        }
                        segments.push(Segment::Slot(name));
                        i += len;
                    }
                    Scan::Issue { message, len } => {
                        issues.push(PatternIssue {
                            message,
                            span: i..i + len,
                        });
                        literal.push_str(&rest[..len]);
                        i += len;
                    }
                    Scan::Literal => {
                        literal.push('{');
                        i += 1;
                    }
                },
                Some(pos) => {
                    literal.push_str(&rest[..pos]);
                    i += pos;
                }
                None => {
                    literal.push_str(rest);
                    i = text.len();
                }
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        (
            Pattern {
                text,
                segments,
                slot_names,
            },
            issues,
        )
    }

    /// The raw pattern text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Distinct slot names, in first-appearance order.
    pub fn slot_names(&self) -> &[String] {
        &self.slot_names
    }

    /// Substitute every slot occurrence from `values`. Slots with no value
    /// render as the empty string; values are opaque user text and are not
    /// escaped.
    pub fn render(&self, values: &HashMap<String, String>) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Slot(name) => {
                    if let Some(value) = values.get(name) {
                        out.push_str(value);
                    }
                }
            }
        }
        out
    }
}

/// Classify the text starting at a `{`.
fn scan_placeholder(rest: &str) -> Scan {
    let inner = &rest[1..];
    let ident_len = ident_prefix_len(inner);

    if ident_len > 0 && inner.as_bytes().get(ident_len) == Some(&b'}') {
        return Scan::Slot {
            name: inner[..ident_len].to_string(),
            len: ident_len + 2,
        };
    }

    if inner.starts_with('{') {
        return Scan::Literal;
    }

    match inner.find(['{', '}']) {
        // A pair that closes before any nested `{` but holds no slot name.
        Some(pos) if inner.as_bytes()[pos] == b'}' => Scan::Issue {
            message: format!("placeholder '{{{}}}' is not a valid slot name", &inner[..pos]),
            len: pos + 2,
        },
        _ if ident_len > 0 => Scan::Issue {
            message: format!("unterminated placeholder '{{{}'", &inner[..ident_len]),
            len: ident_len + 1,
        },
        // A bare `{` with no name after it is plain text.
        _ => Scan::Literal,
    }
}

/// Length of the leading `[A-Za-z_][A-Za-z0-9_]*` run, or 0.
fn ident_prefix_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    if bytes.is_empty() || !(bytes[0].is_ascii_alphabetic() || bytes[0] == b'_') {
        return 0;
    }
    let mut len = 1;
    while len < bytes.len() && (bytes[len].is_ascii_alphanumeric() || bytes[len] == b'_') {
        len += 1;
    }
    len
}

impl From<String> for Pattern {
    fn from(text: String) -> Self {
        Pattern::parse(text)
    }
}

impl From<Pattern> for String {
    fn from(pattern: Pattern) -> Self {
        pattern.text
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
