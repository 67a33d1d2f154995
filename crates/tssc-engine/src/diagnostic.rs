//! Diagnostics produced by an engine

use std::fmt;

use crate::source::Span;

/// Diagnostic severity, ordered so that `>= Severity::Error` means failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Suggestion,
    Message,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Suggestion => "suggestion",
            Severity::Message => "message",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }

    pub fn is_error(&self) -> bool {
        *self >= Severity::Error
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message with optional nested detail messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageChain {
    pub text: String,
    pub next: Vec<MessageChain>,
}

impl MessageChain {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            next: Vec::new(),
        }
    }

    pub fn with_next(mut self, next: impl Into<MessageChain>) -> Self {
        self.next.push(next.into());
        self
    }

    /// Joins the whole tree with `newline`, indenting each nesting level by
    /// two spaces.
    pub fn flatten(&self, newline: &str) -> String {
        let mut out = String::new();
        self.flatten_into(&mut out, newline, 0);
        out
    }

    fn flatten_into(&self, out: &mut String, newline: &str, indent: usize) {
        if indent > 0 {
            out.push_str(newline);
            for _ in 0..indent {
                out.push_str("  ");
            }
        }
        out.push_str(&self.text);
        for child in &self.next {
            child.flatten_into(out, newline, indent + 1);
        }
    }
}

impl From<&str> for MessageChain {
    fn from(text: &str) -> Self {
        MessageChain::new(text)
    }
}

impl From<String> for MessageChain {
    fn from(text: String) -> Self {
        MessageChain::new(text)
    }
}

/// Where a diagnostic points. Line and column are 0-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub file_name: String,
    pub line: usize,
    pub column: usize,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: Option<u32>,
    pub message: MessageChain,
    pub location: Option<Location>,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<MessageChain>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            location: None,
        }
    }

    pub fn error(message: impl Into<MessageChain>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn warning(message: impl Into<MessageChain>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn with_code(mut self, code: u32) -> Self {
        self.code = Some(code);
        self
    }

    pub fn at(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_order() {
        assert!(Severity::Suggestion < Severity::Message);
        assert!(Severity::Message < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
        assert!(Severity::Error.is_error());
        assert!(!Severity::Warning.is_error());
    }

    #[test]
    fn test_flatten_nested_chain() {
        let chain = MessageChain::new("Type 'A' is not assignable to type 'B'.")
            .with_next(
                MessageChain::new("Property 'x' is missing.")
                    .with_next("Did you mean 'y'?"),
            )
            .with_next("See declaration.");

        assert_eq!(
            chain.flatten("\n"),
            "Type 'A' is not assignable to type 'B'.\n  Property 'x' is missing.\n    Did you mean 'y'?\n  See declaration."
        );
    }

    #[test]
    fn test_flatten_plain_text() {
        assert_eq!(MessageChain::from("plain").flatten("\n"), "plain");
    }
}
