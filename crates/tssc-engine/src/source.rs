//! Source files as seen by the driver: text, line table and top-level statements.

use std::path::Path;

use crate::diagnostic::Location;

/// Byte range in a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(&self, other: &Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// A string literal exactly as written, quotes included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringLiteral {
    pub raw: String,
    pub span: Span,
}

impl StringLiteral {
    pub fn new(raw: impl Into<String>, span: Span) -> Self {
        Self {
            raw: raw.into(),
            span,
        }
    }

    /// The literal text with the surrounding quote characters removed.
    pub fn unquoted(&self) -> &str {
        let end = self.raw.len().saturating_sub(1);
        self.raw.get(1..end).unwrap_or("")
    }
}

/// `import ... from "module"` or `import "module"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDeclaration {
    pub module_specifier: StringLiteral,
    pub type_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementKind {
    /// Top-level import declaration
    Import(ImportDeclaration),

    /// `export ... from "module"` re-export
    ExportFrom { module_specifier: StringLiteral },

    /// Any other run of top-level code
    Other,
}

/// A top-level statement of a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub kind: StatementKind,
    pub span: Span,
}

impl Statement {
    pub fn new(kind: StatementKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn as_import(&self) -> Option<&ImportDeclaration> {
        match &self.kind {
            StatementKind::Import(import) => Some(import),
            _ => None,
        }
    }
}

/// Maps byte offsets to 0-based line/column pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.char_indices()
                .filter(|&(_, ch)| ch == '\n')
                .map(|(pos, _)| pos + 1),
        );
        Self { line_starts }
    }

    /// Line and column (in characters) of `offset`, both 0-based.
    pub fn line_col(&self, text: &str, offset: usize) -> (usize, usize) {
        let offset = offset.min(text.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let line_start = self.line_starts[line];
        let column = text
            .get(line_start..offset)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(offset - line_start);
        (line, column)
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

/// One checked source file of a program.
#[derive(Debug, Clone)]
pub struct SourceFile {
    file_name: String,
    text: String,
    statements: Vec<Statement>,
    comments: Vec<Span>,
    line_index: LineIndex,
}

impl SourceFile {
    pub fn new(
        file_name: impl Into<String>,
        text: impl Into<String>,
        statements: Vec<Statement>,
        comments: Vec<Span>,
    ) -> Self {
        let text = text.into();
        let line_index = LineIndex::new(&text);
        Self {
            file_name: file_name.into(),
            text,
            statements,
            comments,
            line_index,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn path(&self) -> &Path {
        Path::new(&self.file_name)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn comments(&self) -> &[Span] {
        &self.comments
    }

    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        self.line_index.line_col(&self.text, offset)
    }

    /// Anchors `span` to this file.
    pub fn location(&self, span: Span) -> Location {
        let (line, column) = self.line_col(span.start);
        Location {
            file_name: self.file_name.clone(),
            line,
            column,
            span,
        }
    }
}
