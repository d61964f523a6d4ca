//! Line-by-line directive recognition.
//!
//! The scanner never interprets the target language; it classifies each line
//! of the annotated source as plain text or as one of the fixed directive
//! forms, anchored at the start of the line after optional whitespace:
//!
//! - `/* template! <expr> */` — replaces the 1 following line.
//! - `/* template(<N>)! <expr> */` — replaces the N following lines. N may
//!   be 0, which makes the directive a pure insertion point.
//! - `/* template_all! <json-array> */` — registers canonical example
//!   literals for bulk substitution; replaces nothing.
//!
//! Expression payloads are opaque here; validating them is the evaluator's
//! job. A line that starts with the marker but matches no form is a fatal
//! syntax error — a half-recognized directive silently passed through would
//! corrupt every variant.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

static INLINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([ \t]*)/\* template(?:\((\d+)\))?! (.*) \*/\s*$").unwrap());

static LITERAL_MAP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*/\* template_all! (.*) \*/\s*$").unwrap());

/// Prefix shared by every directive form.
const MARKER: &str = "/* template";

/// One classified piece of the annotated source.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment<'a> {
    /// A non-directive line, passed through to every variant.
    Plain { line: usize, text: &'a str },
    /// A recognized directive. The replace window (for inline directives)
    /// has already been consumed; its content is opaque and never emitted.
    Directive {
        line: usize,
        /// The directive line verbatim, for variants that retain markers.
        raw: &'a str,
        /// Leading whitespace, reapplied to every rendered line.
        indent: &'a str,
        kind: DirectiveKind<'a>,
    },
}

/// The two directive forms.
#[derive(Debug, Clone, PartialEq)]
pub enum DirectiveKind<'a> {
    /// Replaces `replace_count` following lines with evaluator output.
    Inline { expr: &'a str, replace_count: usize },
    /// Registers canonical example literals; replaces nothing.
    LiteralMap { literals: Vec<String> },
}

/// Restartable scanner over an annotated source.
///
/// Yields one [`Segment`] per logical unit; inline replace windows are
/// consumed along with their directive line. Scanning the same input twice
/// is deterministic and side-effect free.
pub struct Scanner<'a> {
    lines: &'a [String],
    pos: usize,
    failed: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(lines: &'a [String]) -> Self {
        Self {
            lines,
            pos: 0,
            failed: false,
        }
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Segment<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.lines.len() {
            return None;
        }
        let line = self.pos + 1;
        let text = self.lines[self.pos].as_str();
        match classify(text, line) {
            Ok(None) => {
                self.pos += 1;
                Some(Ok(Segment::Plain { line, text }))
            }
            Ok(Some((indent, kind))) => {
                let window = match &kind {
                    DirectiveKind::Inline { replace_count, .. } => *replace_count,
                    DirectiveKind::LiteralMap { .. } => 0,
                };
                if self.pos + 1 + window > self.lines.len() {
                    self.failed = true;
                    return Some(Err(Error::DirectiveSyntax {
                        line,
                        message: format!(
                            "replace window of {} line(s) runs past the end of input",
                            window
                        ),
                    }));
                }
                self.pos += 1 + window;
                Some(Ok(Segment::Directive {
                    line,
                    raw: text,
                    indent,
                    kind,
                }))
            }
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

fn classify(text: &str, line: usize) -> Result<Option<(&str, DirectiveKind<'_>)>> {
    if let Some(caps) = LITERAL_MAP_RE.captures(text) {
        let payload = caps.get(1).unwrap().as_str();
        let values: Vec<serde_json::Value> =
            serde_json::from_str(payload).map_err(|err| Error::DirectiveSyntax {
                line,
                message: format!("template_all payload is not a JSON array: {}", err),
            })?;
        let literals = values
            .into_iter()
            .map(|value| match value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            })
            .collect();
        return Ok(Some(("", DirectiveKind::LiteralMap { literals })));
    }
    if let Some(caps) = INLINE_RE.captures(text) {
        let indent = caps.get(1).unwrap().as_str();
        let replace_count = match caps.get(2) {
            Some(m) => m.as_str().parse().map_err(|err| Error::DirectiveSyntax {
                line,
                message: format!("unparsable replace count {:?}: {}", m.as_str(), err),
            })?,
            None => 1,
        };
        let expr = caps.get(3).unwrap().as_str();
        return Ok(Some((indent, DirectiveKind::Inline { expr, replace_count })));
    }
    if text.trim_start().starts_with(MARKER) {
        return Err(Error::DirectiveSyntax {
            line,
            message: "line starts with the directive marker but matches no directive form".into(),
        });
    }
    Ok(None)
}
