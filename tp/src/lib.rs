//! texplate - interpolate YAML/JSON variables into templates
//!
//! A template file is rendered against the merged mappings of one or more
//! input files, then optionally re-serialized as YAML or JSON.
//!
//! # Core Concepts
//!
//! - **Strict rendering**: referencing a key absent from the inputs is an error
//! - **Left-to-right merge**: later input files override earlier ones at the top level
//! - **Canonical output**: `yaml`/`json` modes parse the rendered text and emit sorted keys
//! - **Lazy sink**: the output file is only created once rendering succeeded
//!
//! # Modules
//!
//! - [`input`] - Input loading and namespace merge
//! - [`render`] - Handlebars renderer and helper library
//! - [`format`] - Output formats
//! - [`sink`] - Output destinations
//! - [`interpolate`] - The full pipeline
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod input;
pub mod interpolate;
pub mod render;
pub mod sink;
pub mod value;

pub use error::TexplateError;
pub use format::OutputFormat;
pub use input::{Namespace, load_namespace};
pub use interpolate::{ExecuteOptions, Interpolater, run};
pub use render::{HelperRegistry, MissingKeyPolicy, Renderer};
pub use sink::Sink;
