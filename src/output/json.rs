//! JSON output format

use std::io::Write;

use anyhow::Result;
use chrono::Utc;
use indexmap::IndexMap;
use serde::Serialize;

use crate::aggregate::Aggregate;
use crate::config::Config;
use crate::model::{Report, SummaryTable};

use super::OutputFormatter;

/// JSON output formatter
pub struct JsonOutput {
    pretty: bool,
}

impl JsonOutput {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable run document
#[derive(Serialize)]
struct JsonRunOutput<'a> {
    tool: &'static str,
    version: &'static str,
    generated: String,
    sample_count: usize,
    #[serde(flatten)]
    summary: &'a SummaryTable,
    /// Full parsed tables per sample, present with `--full-tables`
    #[serde(skip_serializing_if = "Option::is_none")]
    tables: Option<IndexMap<&'a str, &'a Report>>,
}

impl OutputFormatter for JsonOutput {
    fn render(&self, run: &Aggregate, config: &Config, writer: &mut dyn Write) -> Result<()> {
        let tables = config.include_tables.then(|| {
            run.samples
                .iter()
                .map(|s| (s.sample.as_str(), &s.report))
                .collect()
        });

        let output = JsonRunOutput {
            tool: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            generated: Utc::now().to_rfc3339(),
            sample_count: run.samples.len(),
            summary: &run.summary,
            tables,
        };

        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, &output)?;
        } else {
            serde_json::to_writer(&mut *writer, &output)?;
        }
        writeln!(writer)?;

        Ok(())
    }
}
