//! Engine errors

use std::path::PathBuf;

use thiserror::Error;

/// Failures that prevent an engine from building a program at all.
///
/// Problems inside the source text are diagnostics, not errors.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("cannot read source file {}", path.display())]
    ReadSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
