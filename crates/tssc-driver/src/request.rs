//! The immutable description of one compilation.

use std::path::{Path, PathBuf};

use tssc_engine::CompilerOptions;

/// Everything the driver needs to compile one file.
#[derive(Debug, Clone, PartialEq)]
pub struct CompilationRequest {
    pub input_file: PathBuf,
    pub output_file: PathBuf,
    /// Run pre-emit diagnostics before emitting
    pub check: bool,
    /// Produce the output file
    pub emit: bool,
    /// Write `<output_file>.d` listing the imported modules
    pub create_deps: bool,
    /// Engine options; empty means engine defaults
    pub configuration: CompilerOptions,
    /// Directory relative paths are resolved against
    pub base_path: PathBuf,
}

impl CompilationRequest {
    pub fn new(input_file: impl Into<PathBuf>, output_file: impl Into<PathBuf>) -> Self {
        Self {
            input_file: input_file.into(),
            output_file: output_file.into(),
            check: true,
            emit: true,
            create_deps: false,
            configuration: CompilerOptions::default(),
            base_path: PathBuf::from("."),
        }
    }

    pub fn with_check(mut self, check: bool) -> Self {
        self.check = check;
        self
    }

    pub fn with_emit(mut self, emit: bool) -> Self {
        self.emit = emit;
        self
    }

    pub fn with_create_deps(mut self, create_deps: bool) -> Self {
        self.create_deps = create_deps;
        self
    }

    pub fn with_configuration(mut self, configuration: CompilerOptions) -> Self {
        self.configuration = configuration;
        self
    }

    pub fn with_base_path(mut self, base_path: impl Into<PathBuf>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Directory of the output file, as written in the request.
    pub fn output_dir(&self) -> &Path {
        self.output_file.parent().unwrap_or_else(|| Path::new(""))
    }

    /// `path` resolved against the base path; absolute paths are kept.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.base_path.join(path)
    }
}

/// Output path used when none is given: the input with a `.js` extension.
pub fn default_output(input: &Path) -> PathBuf {
    input.with_extension("js")
}
