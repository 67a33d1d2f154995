//! Diagnostic output.
//!
//! Every located diagnostic becomes one line `path:line:col: severity: message`
//! with 1-based positions. In pretty mode, diagnostics whose source text is
//! known are rendered as an annotated snippet instead.

use std::collections::HashMap;
use std::io::{self, Write};

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};
use tssc_engine::{Diagnostic, Location, Severity, SourceFile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportStyle {
    /// One line per diagnostic
    #[default]
    Plain,
    /// Source snippets where the file text is available
    Pretty { color: bool },
}

pub struct Reporter<W: Write> {
    out: W,
    style: ReportStyle,
    sources: HashMap<String, String>,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self::with_style(out, ReportStyle::Plain)
    }

    pub fn with_style(out: W, style: ReportStyle) -> Self {
        Self {
            out,
            style,
            sources: HashMap::new(),
        }
    }

    /// Makes the text of `file` available for snippet rendering.
    pub fn add_source(&mut self, file: &SourceFile) {
        if matches!(self.style, ReportStyle::Pretty { .. }) {
            self.sources
                .insert(file.file_name().to_string(), file.text().to_string());
        }
    }

    /// Reports `diagnostics` in order and returns whether any was an error.
    ///
    /// Diagnostics without a location are skipped entirely.
    pub fn report(&mut self, diagnostics: &[Diagnostic]) -> io::Result<bool> {
        let mut has_error = false;
        for diagnostic in diagnostics {
            let Some(location) = &diagnostic.location else {
                continue;
            };
            let message = diagnostic.message.flatten("\n");

            match (self.style, self.sources.get(&location.file_name)) {
                (ReportStyle::Pretty { color }, Some(text)) => {
                    write_snippet(&mut self.out, color, diagnostic, location, &message, text)?
                }
                _ => writeln!(
                    self.out,
                    "{}",
                    format_line(location, diagnostic.severity, &message)
                )?,
            }
            has_error = has_error || diagnostic.severity.is_error();
        }
        Ok(has_error)
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// `path:line:col: severity: message`, converting to 1-based positions.
pub fn format_line(location: &Location, severity: Severity, message: &str) -> String {
    format!(
        "{}:{}:{}: {}: {}",
        location.file_name,
        location.line + 1,
        location.column + 1,
        severity,
        message
    )
}

fn write_snippet<W: Write>(
    out: &mut W,
    color: bool,
    diagnostic: &Diagnostic,
    location: &Location,
    message: &str,
    text: &str,
) -> io::Result<()> {
    let (kind, label_color) = match diagnostic.severity {
        Severity::Error => (ReportKind::Error, Color::Red),
        Severity::Warning => (ReportKind::Warning, Color::Yellow),
        Severity::Message => (ReportKind::Custom("Message", Color::Cyan), Color::Cyan),
        Severity::Suggestion => (ReportKind::Advice, Color::Green),
    };

    let start = location.span.start.min(text.len());
    let end = location.span.end.clamp(start, text.len());
    let file_name = location.file_name.as_str();
    let span = (file_name, start..end);

    // spans are byte offsets
    let config = Config::default()
        .with_color(color)
        .with_index_type(IndexType::Byte);
    let mut builder = Report::build(kind, span.clone())
        .with_config(config)
        .with_message(message)
        .with_label(Label::new(span).with_color(label_color));
    if let Some(code) = diagnostic.code {
        builder = builder.with_code(format!("TS{}", code));
    }
    builder
        .finish()
        .write((file_name, Source::from(text.to_string())), out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tssc_engine::{MessageChain, Span};

    fn located(severity: Severity, line: usize, column: usize, message: &str) -> Diagnostic {
        Diagnostic::new(severity, message).at(Location {
            file_name: "src/main.ts".to_string(),
            line,
            column,
            span: Span::new(0, 1),
        })
    }

    fn run(diagnostics: &[Diagnostic]) -> (bool, String) {
        let mut reporter = Reporter::new(Vec::new());
        let has_error = reporter.report(diagnostics).unwrap();
        (has_error, String::from_utf8(reporter.into_inner()).unwrap())
    }

    #[test]
    fn test_warning_then_error() {
        let (has_error, output) = run(&[
            located(Severity::Warning, 0, 4, "Unused variable."),
            located(Severity::Error, 2, 0, "Cannot find name 'x'."),
        ]);
        assert!(has_error);
        assert_eq!(
            output,
            "src/main.ts:1:5: warning: Unused variable.\nsrc/main.ts:3:1: error: Cannot find name 'x'.\n"
        );
    }

    #[test]
    fn test_below_error_does_not_fail() {
        let (has_error, output) = run(&[
            located(Severity::Suggestion, 0, 0, "Could be const."),
            located(Severity::Message, 1, 1, "Note."),
            located(Severity::Warning, 2, 2, "Careful."),
        ]);
        assert!(!has_error);
        assert_eq!(output.lines().count(), 3);
        assert!(output.starts_with("src/main.ts:1:1: suggestion: Could be const.\n"));
    }

    #[test]
    fn test_unlocated_diagnostics_are_skipped() {
        let (has_error, output) = run(&[Diagnostic::error("Global failure.")]);
        assert!(!has_error);
        assert!(output.is_empty());
    }

    #[test]
    fn test_all_diagnostics_reported_after_error() {
        let (has_error, output) = run(&[
            located(Severity::Error, 0, 0, "first"),
            located(Severity::Error, 1, 0, "second"),
            located(Severity::Warning, 2, 0, "third"),
        ]);
        assert!(has_error);
        assert_eq!(output.lines().count(), 3);
    }

    #[test]
    fn test_nested_message_is_flattened() {
        let mut diagnostic = located(Severity::Error, 0, 0, "");
        diagnostic.message = MessageChain::new("Outer.").with_next("Inner.");
        let (_, output) = run(&[diagnostic]);
        assert_eq!(output, "src/main.ts:1:1: error: Outer.\n  Inner.\n");
    }

    #[test]
    fn test_pretty_renders_snippet_for_known_source() {
        let file = SourceFile::new("src/main.ts", "let s = 'open\n", vec![], vec![]);
        let diagnostic = Diagnostic::error("Unterminated string literal.")
            .with_code(1002)
            .at(file.location(Span::new(8, 13)));

        let mut reporter = Reporter::with_style(Vec::new(), ReportStyle::Pretty { color: false });
        reporter.add_source(&file);
        let has_error = reporter.report(&[diagnostic]).unwrap();
        let output = String::from_utf8(reporter.into_inner()).unwrap();

        assert!(has_error);
        assert!(output.contains("Unterminated string literal."));
        assert!(output.contains("TS1002"));
        assert!(output.contains("let s = 'open"));
    }

    #[test]
    fn test_pretty_snippet_after_non_ascii_text() {
        let text = "const é = 'ü'; const ü = 'ö'; let s = 'open\n";
        let start = text.find("'open").unwrap();
        let file = SourceFile::new("src/main.ts", text, vec![], vec![]);
        let diagnostic = Diagnostic::error("Unterminated string literal.")
            .at(file.location(Span::new(start, start + "'open".len())));

        let mut reporter = Reporter::with_style(Vec::new(), ReportStyle::Pretty { color: false });
        reporter.add_source(&file);
        reporter.report(&[diagnostic]).unwrap();
        let output = String::from_utf8(reporter.into_inner()).unwrap();

        assert!(output.contains("let s = 'open"), "snippet missing:\n{}", output);
    }

    #[test]
    fn test_pretty_falls_back_without_source() {
        let mut reporter = Reporter::with_style(Vec::new(), ReportStyle::Pretty { color: false });
        reporter.report(&[located(Severity::Warning, 0, 0, "w")]).unwrap();
        let output = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(output, "src/main.ts:1:1: warning: w\n");
    }
}
