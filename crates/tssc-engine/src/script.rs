//! Lexical engine: structural checks and pass-through emission.
//!
//! `ScriptEngine` does not type-check. It reports what the lexer and the
//! delimiter scanner can prove wrong and emits the source with type-only
//! imports erased, which makes it usable for plain JavaScript and for
//! exercising the driver end to end.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use tssc_util::Maybe;

use crate::diagnostic::Diagnostic;
use crate::error::EngineError;
use crate::lexer::Lexer;
use crate::options::CompilerOptions;
use crate::scanner;
use crate::source::{SourceFile, Span};
use crate::{EmitResult, EmittedFile, Engine, Program};

/// Engine reading its root file relative to a base directory.
#[derive(Debug, Clone)]
pub struct ScriptEngine {
    base_dir: PathBuf,
}

impl ScriptEngine {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }
}

impl Engine for ScriptEngine {
    type Program = ScriptProgram;

    fn version(&self) -> String {
        format!("tssc-engine {}", env!("CARGO_PKG_VERSION"))
    }

    fn create_program(
        &self,
        root: &Path,
        options: &CompilerOptions,
    ) -> Result<ScriptProgram, EngineError> {
        let path = self.base_dir.join(root);
        let text = fs::read_to_string(&path).map_err(|source| EngineError::ReadSource {
            path: path.clone(),
            source,
        })?;

        let mut lexer = Lexer::new(&text);
        let tokens = lexer.tokenize();
        let comments = lexer.into_comments();
        let scanned = scanner::scan(&tokens);
        debug!(
            file = %root.display(),
            tokens = tokens.len(),
            statements = scanned.statements.len(),
            problems = scanned.problems.len(),
            "scanned source file"
        );

        let file = SourceFile::new(root.to_string_lossy(), text, scanned.statements, comments);
        let diagnostics = scanned
            .problems
            .into_iter()
            .map(|problem| {
                Diagnostic::error(problem.message)
                    .with_code(problem.code)
                    .at(file.location(problem.span))
            })
            .collect();

        Ok(ScriptProgram {
            file,
            options: options.clone(),
            diagnostics,
        })
    }
}

/// The single-file program built by [`ScriptEngine`].
#[derive(Debug, Clone)]
pub struct ScriptProgram {
    file: SourceFile,
    options: CompilerOptions,
    diagnostics: Vec<Diagnostic>,
}

impl ScriptProgram {
    fn owns(&self, file: &SourceFile) -> bool {
        file.file_name() == self.file.file_name()
    }

    /// `<outDir>/<stem>.js`, falling back to the input's own directory.
    fn output_name(&self) -> PathBuf {
        let input = self.file.path();
        let dir = self
            .options
            .out_dir()
            .get_or_insert_with(|| input.parent().map(Path::to_path_buf).unwrap_or_default());
        let stem = input.file_stem().unwrap_or_default().to_string_lossy();
        dir.join(format!("{}.js", stem))
    }
}

impl Program for ScriptProgram {
    fn source_file(&self, name: &Path) -> Maybe<&SourceFile> {
        Maybe::Some(&self.file).filter(|file| file.path() == name)
    }

    fn pre_emit_diagnostics(&self, file: &SourceFile) -> Vec<Diagnostic> {
        if self.owns(file) {
            self.diagnostics.clone()
        } else {
            Vec::new()
        }
    }

    fn emit(&self, file: &SourceFile, writer: &mut dyn FnMut(EmittedFile)) -> EmitResult {
        if !self.owns(file) || self.options.flag("noEmit").get_or_insert(false) {
            return EmitResult {
                emit_skipped: true,
                diagnostics: Vec::new(),
            };
        }

        let remove_comments = self.options.flag("removeComments").get_or_insert(false);
        writer(EmittedFile {
            name: self.output_name(),
            text: erase(file, remove_comments),
        });
        EmitResult::default()
    }
}

/// Source text minus type-only imports and, optionally, comments.
fn erase(file: &SourceFile, remove_comments: bool) -> String {
    let text = file.text();
    let mut removed: Vec<Span> = file
        .statements()
        .iter()
        .filter(|statement| statement.as_import().is_some_and(|import| import.type_only))
        .map(|statement| with_rest_of_line(text, statement.span))
        .collect();
    if remove_comments {
        removed.extend(file.comments().iter().copied());
    }
    removed.sort_by_key(|span| span.start);

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for span in removed {
        if span.start < cursor {
            cursor = cursor.max(span.end);
            continue;
        }
        out.push_str(&text[cursor..span.start]);
        cursor = span.end;
    }
    out.push_str(&text[cursor..]);
    out
}

/// Extends `span` over its line break when nothing else follows on the line.
fn with_rest_of_line(text: &str, span: Span) -> Span {
    let rest = &text[span.end..];
    match rest.find('\n') {
        Some(newline) if rest[..newline].trim().is_empty() => Span::new(span.start, span.end + newline + 1),
        _ => span,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Severity;
    use serde_json::json;
    use tempfile::tempdir;

    fn program(source: &str, options: serde_json::Value) -> (tempfile::TempDir, ScriptProgram) {
        let dir = tempdir().expect("tempdir");
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/main.ts"), source).unwrap();
        let options: CompilerOptions = serde_json::from_value(options).unwrap();
        let program = ScriptEngine::new(dir.path())
            .create_program(Path::new("src/main.ts"), &options)
            .expect("program");
        (dir, program)
    }

    fn emit(program: &ScriptProgram) -> (EmitResult, Vec<EmittedFile>) {
        let file = program.source_file(Path::new("src/main.ts")).into_nullable().unwrap();
        let mut emitted = Vec::new();
        let result = program.emit(file, &mut |out| emitted.push(out));
        (result, emitted)
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = tempdir().unwrap();
        let err = ScriptEngine::new(dir.path())
            .create_program(Path::new("nope.ts"), &CompilerOptions::new())
            .unwrap_err();
        assert!(matches!(err, EngineError::ReadSource { .. }));
    }

    #[test]
    fn test_source_file_lookup_by_given_name() {
        let (_dir, program) = program("let x = 1;", json!({}));
        assert!(program.source_file(Path::new("src/main.ts")).is_some());
        assert!(program.source_file(Path::new("other.ts")).is_none());
    }

    #[test]
    fn test_diagnostics_are_located() {
        let (_dir, program) = program("let a = 1;\nlet s = 'open\n", json!({}));
        let file = program.source_file(Path::new("src/main.ts")).into_nullable().unwrap();
        let diagnostics = program.pre_emit_diagnostics(file);
        assert_eq!(diagnostics.len(), 1);
        let diagnostic = &diagnostics[0];
        assert_eq!(diagnostic.severity, Severity::Error);
        assert_eq!(diagnostic.code, Some(1002));
        let location = diagnostic.location.as_ref().unwrap();
        assert_eq!(location.file_name, "src/main.ts");
        assert_eq!((location.line, location.column), (1, 8));
    }

    #[test]
    fn test_regex_after_condition_is_clean() {
        let (_dir, program) = program("if (x) /'/.test(y);\n", json!({}));
        let file = program.source_file(Path::new("src/main.ts")).into_nullable().unwrap();
        assert!(program.pre_emit_diagnostics(file).is_empty());
    }

    #[test]
    fn test_emit_erases_type_only_imports() {
        let source = "import type { T } from './types';\nimport { a } from './a';\nexport const x: T = a;\n";
        let (_dir, program) = program(source, json!({ "outDir": "out" }));
        let (result, emitted) = emit(&program);
        assert!(!result.emit_skipped);
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].name, PathBuf::from("out/main.js"));
        assert_eq!(emitted[0].text, "import { a } from './a';\nexport const x: T = a;\n");
    }

    #[test]
    fn test_emit_remove_comments() {
        let source = "// header\nlet x = 1; /* inline */\n";
        let (_dir, program) = program(source, json!({ "removeComments": true }));
        let (_, emitted) = emit(&program);
        assert_eq!(emitted[0].text, "\nlet x = 1; \n");
        assert_eq!(emitted[0].name, PathBuf::from("src/main.js"));
    }

    #[test]
    fn test_no_emit_option_skips_writer() {
        let (_dir, program) = program("let x = 1;", json!({ "noEmit": true }));
        let (result, emitted) = emit(&program);
        assert!(result.emit_skipped);
        assert!(emitted.is_empty());
    }
}
