//! Output destinations

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::TexplateError;

/// Sentinel output path meaning standard output
pub const STDOUT_SENTINEL: &str = "-";

/// Where the final bytes are written
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Sink {
    #[default]
    Stdout,
    File(PathBuf),
}

impl Sink {
    /// Interpret an `--output-file` argument
    pub fn from_arg(arg: &str) -> Self {
        if arg == STDOUT_SENTINEL {
            Self::Stdout
        } else {
            Self::File(PathBuf::from(arg))
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Stdout => None,
            Self::File(path) => Some(path),
        }
    }

    /// Write all bytes, creating or truncating the file first
    ///
    /// The file handle lives only for this call and is closed on every path.
    pub fn write_all(&self, bytes: &[u8]) -> Result<(), TexplateError> {
        debug!(sink = %self, len = bytes.len(), "Sink::write_all: called");
        let write_error = |source: io::Error| TexplateError::OutputWrite {
            target: self.to_string(),
            source,
        };

        match self {
            Self::Stdout => {
                let mut out = io::stdout().lock();
                out.write_all(bytes).map_err(write_error)?;
                out.flush().map_err(write_error)
            }
            Self::File(path) => {
                let file = File::create(path).map_err(write_error)?;
                let mut out = BufWriter::new(file);
                out.write_all(bytes).map_err(write_error)?;
                let file = out.into_inner().map_err(|e| write_error(e.into_error()))?;
                file.sync_all().map_err(write_error)
            }
        }
    }
}

impl fmt::Display for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => f.write_str("stdout"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}
