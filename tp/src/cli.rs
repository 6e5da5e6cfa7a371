//! CLI command definitions and subcommands

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::sink::STDOUT_SENTINEL;

/// texplate - interpolate YAML/JSON variables into a template
#[derive(Parser, Debug)]
#[command(
    name = "texplate",
    about = "Interpolate variables into a template using Handlebars syntax",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interpolate input files into the given template
    #[command(long_about = EXECUTE_ABOUT)]
    Execute(ExecuteArgs),
}

const EXECUTE_ABOUT: &str = "Interpolate input files into the given template

- Uses Handlebars template syntax, rendered strictly: missing keys are errors
- Includes string, collection, arithmetic and CIDR helpers
- The input files must contain a map in YAML/JSON format
- The template file format is flexible if '--output-format=preserve', otherwise the rendered template must be YAML/JSON";

/// Arguments for `execute`
///
/// The template path and output format stay unvalidated here so that their
/// errors are reported by the interpolation pipeline rather than as usage errors.
#[derive(Debug, Clone, Args)]
pub struct ExecuteArgs {
    /// Path to the template file
    #[arg(value_name = "TEMPLATE")]
    pub template: Option<PathBuf>,

    /// An input file containing key-value pairs to interpolate into the template (repeatable)
    #[arg(short = 'f', long = "input-file", value_name = "PATH", value_delimiter = ',')]
    pub input_files: Vec<PathBuf>,

    /// Renders the interpolated template in the given format: 'preserve', 'yaml' or 'json'
    #[arg(short = 'o', long = "output-format", value_name = "FORMAT")]
    pub output_format: Option<String>,

    /// Writes output to the given file path; '-' writes to stdout
    #[arg(long = "output-file", value_name = "PATH", default_value = STDOUT_SENTINEL)]
    pub output_file: String,
}
