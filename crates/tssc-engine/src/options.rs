//! Engine options as a JSON object.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tssc_util::Maybe;

/// Compiler options handed to the engine, keyed by option name (`outDir`,
/// `removeComments`, ...). Unknown keys are kept and passed through.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompilerOptions(Map<String, Value>);

impl CompilerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn get(&self, key: &str) -> Maybe<&Value> {
        Maybe::new(self.0.get(key))
    }

    /// A boolean option; absent when missing or not a boolean.
    pub fn flag(&self, key: &str) -> Maybe<bool> {
        self.get(key).then(|value| Maybe::new(value.as_bool()))
    }

    pub fn out_dir(&self) -> Maybe<PathBuf> {
        self.get("outDir")
            .then(|value| Maybe::new(value.as_str()))
            .map(PathBuf::from)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Copy of these options with `outDir` overridden.
    pub fn with_out_dir(&self, dir: &Path) -> Self {
        let mut merged = self.clone();
        merged.insert("outDir", dir.to_string_lossy().into_owned());
        merged
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
