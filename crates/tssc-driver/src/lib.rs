//! tssc driver library
//!
//! Compiles one TypeScript file through an [`Engine`](tssc_engine::Engine):
//! loads optional engine options, checks, emits, and writes a Makefile-style
//! dependency file listing the file's direct imports.

pub mod config;
pub mod deps;
pub mod driver;
pub mod error;
pub mod reporter;
pub mod request;

pub use config::{load_configuration, ConfigError};
pub use driver::compile_file;
pub use error::DriverError;
pub use reporter::{ReportStyle, Reporter};
pub use request::{default_output, CompilationRequest};
