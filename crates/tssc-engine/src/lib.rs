//! # tssc engine
//!
//! The collaborator interface between the tssc driver and whatever performs
//! parsing, checking and emission, plus a bundled lexical engine.
//!
//! A driver only ever talks to an engine through [`Engine`] and [`Program`]:
//! build a program from one root file, ask for the diagnostics of a file, and
//! ask for that file to be emitted through a writer callback.

pub mod diagnostic;
pub mod error;
pub mod lexer;
pub mod options;
pub mod scanner;
pub mod script;
pub mod source;
pub mod token;

use std::path::{Path, PathBuf};

use tssc_util::Maybe;

pub use diagnostic::{Diagnostic, Location, MessageChain, Severity};
pub use error::EngineError;
pub use lexer::Lexer;
pub use options::CompilerOptions;
pub use script::{ScriptEngine, ScriptProgram};
pub use source::{ImportDeclaration, SourceFile, Span, Statement, StatementKind, StringLiteral};
pub use token::{Token, TokenKind};

/// One output file produced by [`Program::emit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedFile {
    pub name: PathBuf,
    pub text: String,
}

/// Outcome of an emission request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitResult {
    /// Set when the engine declined to produce any output.
    pub emit_skipped: bool,
    pub diagnostics: Vec<Diagnostic>,
}

/// Builds programs from a single root file.
pub trait Engine {
    type Program: Program;

    /// Engine name and version, shown by `--version`.
    fn version(&self) -> String;

    fn create_program(
        &self,
        root: &Path,
        options: &CompilerOptions,
    ) -> Result<Self::Program, EngineError>;
}

/// A checked set of source files.
pub trait Program {
    /// Looks a file up by the name it was given under.
    fn source_file(&self, name: &Path) -> Maybe<&SourceFile>;

    /// Syntactic and semantic diagnostics of `file`, before any emission.
    fn pre_emit_diagnostics(&self, file: &SourceFile) -> Vec<Diagnostic>;

    /// Emits `file`, handing every output to `writer`.
    fn emit(&self, file: &SourceFile, writer: &mut dyn FnMut(EmittedFile)) -> EmitResult;
}
