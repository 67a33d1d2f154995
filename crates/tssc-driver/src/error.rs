//! Fatal driver errors

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tssc_engine::EngineError;

/// Failures that end an invocation outright, as opposed to diagnostics.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("engine has no source file for {}", .0.display())]
    MissingSourceFile(PathBuf),

    #[error("cannot create output directory {}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write dependency file {}", path.display())]
    WriteManifest {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write output file {}", path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write diagnostics")]
    Report(#[source] io::Error),
}
