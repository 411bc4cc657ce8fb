//! Output formatting for run summaries

mod json;
mod terminal;

use std::io::Write;

use anyhow::Result;

use crate::aggregate::Aggregate;
use crate::config::{Config, OutputFormat};

pub use json::JsonOutput;
pub use terminal::TerminalOutput;

/// Trait for output formatters
pub trait OutputFormatter {
    /// Render the aggregated run to a writer
    fn render(&self, run: &Aggregate, config: &Config, writer: &mut dyn Write) -> Result<()>;
}

/// Factory for creating output formatters
pub struct OutputFactory;

impl OutputFactory {
    /// Create an output formatter based on format type
    pub fn create(format: OutputFormat) -> Box<dyn OutputFormatter> {
        match format {
            OutputFormat::Terminal => Box::new(TerminalOutput::new()),
            OutputFormat::Json => Box::new(JsonOutput::new()),
        }
    }
}

/// Render the aggregated run to stdout
pub fn render_to_stdout(run: &Aggregate, config: &Config) -> Result<()> {
    let formatter = OutputFactory::create(config.output_format);
    let mut stdout = std::io::stdout();
    formatter.render(run, config, &mut stdout)
}
