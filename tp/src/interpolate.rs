//! Interpolation pipeline
//!
//! Loader → Renderer → Formatter. Every run is a pure function of the template
//! file, the input files, the helper set and the output format; writing the
//! result to a [`Sink`] is left to the caller.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::cli::ExecuteArgs;
use crate::config::Config;
use crate::error::TexplateError;
use crate::format::OutputFormat;
use crate::input;
use crate::render::Renderer;
use crate::sink::Sink;

/// Fully validated settings for one `execute` run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecuteOptions {
    pub template: PathBuf,
    pub inputs: Vec<PathBuf>,
    pub format: OutputFormat,
    pub sink: Sink,
}

impl ExecuteOptions {
    /// Combine command line arguments with config defaults and validate them
    ///
    /// Nothing is read from disk here, so a bad output format is reported
    /// before any rendering work starts.
    pub fn resolve(args: &ExecuteArgs, config: &Config) -> Result<Self, TexplateError> {
        debug!(?args, "ExecuteOptions::resolve: called");
        let template = args.template.clone().ok_or(TexplateError::MissingTemplatePath)?;
        let format = match args.output_format.as_deref().or(config.output_format.as_deref()) {
            Some(value) => value.parse()?,
            None => OutputFormat::default(),
        };

        Ok(Self {
            template,
            inputs: args.input_files.clone(),
            format,
            sink: Sink::from_arg(&args.output_file),
        })
    }
}

/// Runs the load, render and format stages
pub struct Interpolater {
    renderer: Renderer,
    format: OutputFormat,
}

impl Interpolater {
    /// Interpolater using the strict renderer and standard helpers
    pub fn new(format: OutputFormat) -> Self {
        Self::with_renderer(Renderer::strict(), format)
    }

    pub fn with_renderer(renderer: Renderer, format: OutputFormat) -> Self {
        Self { renderer, format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Render `template_path` against the merged `input_paths`
    pub fn execute<P: AsRef<Path>>(&self, template_path: &Path, input_paths: &[P]) -> Result<Vec<u8>, TexplateError> {
        debug!(?template_path, inputs = input_paths.len(), format = %self.format, "Interpolater::execute: called");
        let source = std::fs::read_to_string(template_path).map_err(|source| TexplateError::TemplateRead {
            path: template_path.to_path_buf(),
            source,
        })?;

        let namespace = input::load_namespace(input_paths)?;
        let program = self.renderer.parse(template_path, &source)?;
        let rendered = self.renderer.execute(&program, &namespace)?;
        let output = self.format.apply(rendered.into_bytes(), template_path)?;

        info!(
            "Interpolated {} as {} ({} bytes)",
            template_path.display(),
            self.format,
            output.len()
        );
        Ok(output)
    }
}

/// Render with validated options and write the result to their sink
pub fn run(options: &ExecuteOptions) -> Result<(), TexplateError> {
    debug!(?options, "run: called");
    let output = Interpolater::new(options.format).execute(&options.template, &options.inputs)?;
    options.sink.write_all(&output)
}
