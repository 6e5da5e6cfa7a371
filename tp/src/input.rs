//! Input Loader
//!
//! Reads YAML/JSON input files and merges their top-level mappings into one
//! variable namespace. Later files win on key collisions; nested mappings are
//! replaced, never deep-merged.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::TexplateError;
use crate::value::{self, kind_name};

/// Variables available to template expressions
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Namespace(Map<String, Value>);

impl Namespace {
    /// Create an empty namespace
    pub fn new() -> Self {
        Self::default()
    }

    /// Overlay `other` onto this namespace, replacing shared top-level keys
    pub fn merge(&mut self, other: Map<String, Value>) {
        debug!(incoming = other.len(), existing = self.0.len(), "Namespace::merge: called");
        for (key, value) in other {
            self.0.insert(key, value);
        }
    }

    /// Insert a single variable
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Namespace {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Load and merge input files, applying them left to right
pub fn load_namespace<P: AsRef<Path>>(paths: &[P]) -> Result<Namespace, TexplateError> {
    debug!(count = paths.len(), "load_namespace: called");
    let mut namespace = Namespace::new();
    for path in paths {
        let vars = load_input_file(path.as_ref())?;
        namespace.merge(vars);
    }
    info!("Loaded {} variables from {} input files", namespace.len(), paths.len());
    Ok(namespace)
}

/// Read one input file and parse its top-level mapping
pub fn load_input_file(path: &Path) -> Result<Map<String, Value>, TexplateError> {
    debug!(?path, "load_input_file: called");
    let contents = std::fs::read(path).map_err(|source| TexplateError::InputRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_input(path, &contents)
}

fn parse_input(path: &Path, contents: &[u8]) -> Result<Map<String, Value>, TexplateError> {
    if contents.iter().all(u8::is_ascii_whitespace) {
        debug!(?path, "parse_input: empty input file");
        return Ok(Map::new());
    }

    let parse_error = |reason: String| TexplateError::InputParse {
        path: PathBuf::from(path),
        reason,
    };

    match value::parse_document(contents).map_err(|e| parse_error(e.to_string()))? {
        Value::Object(map) => Ok(map),
        Value::Null => {
            debug!(?path, "parse_input: null document treated as empty mapping");
            Ok(Map::new())
        }
        other => Err(parse_error(format!("top-level value is {}, expected a mapping", kind_name(&other)))),
    }
}
