use crate::source::Span;

/// Token classes the scanner distinguishes.
///
/// Keywords are plain identifiers here; consumers compare the token value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    NumberLiteral,
    StringLiteral,
    /// A template literal piece: head, middle or tail around `${ }`
    Template,
    RegexLiteral,
    /// Single punctuation character
    Punct,

    // Special
    Eof,
    Error,
}

/// A token with its kind, span, and raw source text.
///
/// For `Error` tokens `value` holds the diagnostic message instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub value: String,
    /// Diagnostic code for `Error` tokens
    pub code: Option<u32>,
}

impl Token {
    pub(crate) fn new(kind: TokenKind, span: Span, value: String) -> Self {
        Self {
            kind,
            span,
            value,
            code: None,
        }
    }

    pub(crate) fn error(span: Span, code: u32, message: &str) -> Self {
        Self {
            kind: TokenKind::Error,
            span,
            value: message.to_string(),
            code: Some(code),
        }
    }

    pub fn is_punct(&self, ch: char) -> bool {
        self.kind == TokenKind::Punct && self.value.starts_with(ch)
    }

    pub fn is_word(&self, word: &str) -> bool {
        self.kind == TokenKind::Identifier && self.value == word
    }
}
