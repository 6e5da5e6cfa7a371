//! Error types for the interpolation pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, rendering, converting or writing
#[derive(Debug, Error)]
pub enum TexplateError {
    #[error("must specify template path as first positional arg")]
    MissingTemplatePath,

    #[error("unable to read template file at '{}'", path.display())]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to read input file at '{}'", path.display())]
    InputRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("expected '{}' to be a valid YAML/JSON mapping: {reason}", path.display())]
    InputParse { path: PathBuf, reason: String },

    #[error("template '{}' is not valid template syntax: {reason}", path.display())]
    TemplateSyntax { path: PathBuf, reason: String },

    #[error("template '{}' references {}", path.display(), undefined_target(variable.as_deref()))]
    UndefinedVariable { path: PathBuf, variable: Option<String> },

    #[error("failed to render template '{}': {reason}", path.display())]
    TemplateExecution { path: PathBuf, reason: String },

    #[error("template '{}' is not valid YAML/JSON: {reason}", path.display())]
    OutputConversion { path: PathBuf, reason: String },

    #[error("unsupported output format '{0}', expected one of 'preserve', 'yaml' or 'json'")]
    UnsupportedFormat(String),

    #[error("failed to write output to {target}")]
    OutputWrite {
        target: String,
        #[source]
        source: std::io::Error,
    },
}

fn undefined_target(variable: Option<&str>) -> String {
    match variable {
        Some(name) => format!("undefined variable '{name}'"),
        None => "an undefined variable".to_string(),
    }
}

/// Collapse a multi-line diagnostic (parser snippets, carets) onto one line
pub fn one_line(message: &str) -> String {
    message
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
