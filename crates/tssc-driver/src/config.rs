//! Loading engine options from an optional JSON file.
//!
//! A missing or broken configuration file is never fatal: the driver falls
//! back to empty options and the engine applies its own defaults.

use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};
use tssc_engine::CompilerOptions;
use tssc_util::{Absent, Either, Maybe};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no configuration file given")]
    NotGiven,

    #[error("cannot read configuration file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("configuration file {} is not valid JSON", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("configuration file {} does not contain a JSON object", path.display())]
    NotAnObject { path: PathBuf },
}

/// Loads the options at `path` (relative to `base_path`), or empty options.
pub async fn load_configuration(base_path: &Path, path: Option<&Path>) -> CompilerOptions {
    let loaded = match Maybe::new(path).await {
        Ok(path) => read_configuration(&base_path.join(path)).await,
        Err(Absent) => Either::Left(ConfigError::NotGiven),
    };

    loaded
        .map_left(|err| match err {
            ConfigError::NotGiven => debug!("no configuration file, using engine defaults"),
            err => warn!(error = %err, "ignoring configuration file"),
        })
        .right()
        .get_or_insert_with(CompilerOptions::default)
}

/// Reads and parses one configuration file.
pub async fn read_configuration(path: &Path) -> Either<ConfigError, CompilerOptions> {
    Either::from(tokio::fs::read(path).await)
        .map_left(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })
        .then(|bytes| parse_configuration(path, &bytes))
}

fn parse_configuration(path: &Path, bytes: &[u8]) -> Either<ConfigError, CompilerOptions> {
    Either::from(serde_json::from_slice::<Value>(bytes))
        .map_left(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
        .then(|value| match value {
            Value::Object(map) => Either::Right(CompilerOptions::from_map(map)),
            _ => Either::Left(ConfigError::NotAnObject {
                path: path.to_path_buf(),
            }),
        })
}
