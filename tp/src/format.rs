//! Output Formatter
//!
//! Passes rendered text through untouched, or re-parses it as YAML/JSON and
//! serializes it canonically (sorted keys) in the requested format.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use crate::error::TexplateError;
use crate::value;

/// Serialization applied to rendered output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Emit the rendered bytes unchanged
    #[default]
    Preserve,
    /// Re-serialize as YAML
    Yaml,
    /// Re-serialize as compact JSON
    Json,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [Self::Preserve, Self::Yaml, Self::Json];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Preserve => "preserve",
            Self::Yaml => "yaml",
            Self::Json => "json",
        }
    }

    /// Apply this format to rendered output
    ///
    /// `template_path` only names the template in conversion errors.
    pub fn apply(&self, rendered: Vec<u8>, template_path: &Path) -> Result<Vec<u8>, TexplateError> {
        debug!(format = %self, len = rendered.len(), "OutputFormat::apply: called");
        let conversion_error = |reason: String| TexplateError::OutputConversion {
            path: template_path.to_path_buf(),
            reason,
        };

        match self {
            Self::Preserve => Ok(rendered),
            Self::Json => {
                let parsed = value::parse_document(&rendered).map_err(|e| conversion_error(e.to_string()))?;
                serde_json::to_vec(&parsed).map_err(|e| conversion_error(e.to_string()))
            }
            Self::Yaml => {
                let parsed = value::parse_document(&rendered).map_err(|e| conversion_error(e.to_string()))?;
                serde_yaml::to_string(&parsed)
                    .map(String::into_bytes)
                    .map_err(|e| conversion_error(e.to_string()))
            }
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = TexplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| TexplateError::UnsupportedFormat(s.to_string()))
    }
}
