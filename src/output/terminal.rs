//! Colored terminal output

use std::io::{IsTerminal, Write};

use anyhow::Result;
use termcolor::{Buffer, Color, ColorChoice, ColorSpec, WriteColor};

use crate::aggregate::Aggregate;
use crate::config::Config;
use crate::model::ColumnHeader;

use super::OutputFormatter;

/// Terminal output with colors
pub struct TerminalOutput {
    color_choice: ColorChoice,
}

impl TerminalOutput {
    pub fn new() -> Self {
        let color_choice = if std::io::stdout().is_terminal() {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        Self { color_choice }
    }

    pub fn with_color_choice(color_choice: ColorChoice) -> Self {
        Self { color_choice }
    }

    fn buffer(&self) -> Buffer {
        match self.color_choice {
            ColorChoice::Never => Buffer::no_color(),
            _ => Buffer::ansi(),
        }
    }

    fn write_header(&self, run: &Aggregate, writer: &mut dyn Write) -> Result<()> {
        writeln!(writer, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(
            writer,
            " recalqc: {} sample{} summarized",
            run.samples.len(),
            if run.samples.len() == 1 { "" } else { "s" }
        )?;
        writeln!(writer, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(writer)?;
        Ok(())
    }

    fn write_summary(&self, run: &Aggregate, config: &Config, writer: &mut dyn Write) -> Result<()> {
        let headers: Vec<&ColumnHeader> = if config.show_hidden {
            run.summary.headers().iter().collect()
        } else {
            run.summary.visible_headers().collect()
        };

        let mut table_data: Vec<Vec<String>> = Vec::new();
        let mut header_row = vec!["Sample".to_string()];
        header_row.extend(headers.iter().map(|h| h.title.clone()));
        table_data.push(header_row);

        for (name, row) in run.summary.samples() {
            let mut cells = vec![name.to_string()];
            for header in &headers {
                let cell = row
                    .get(&header.key)
                    .map(|value| header.format(value))
                    .unwrap_or_default();
                cells.push(cell);
            }
            table_data.push(cells);
        }

        writeln!(writer, "{}", build_table(&table_data))?;
        Ok(())
    }

    /// One line per sample comparing reported and empirical quality, with
    /// the drift colored by sign
    fn write_drift(&self, run: &Aggregate, writer: &mut dyn Write) -> Result<()> {
        let drifted: Vec<_> = run
            .samples
            .iter()
            .filter_map(|s| {
                match (
                    s.metrics.mean_reported_q,
                    s.metrics.mean_empirical_q,
                    s.metrics.delta_q,
                ) {
                    (Some(rep), Some(emp), Some(delta)) => Some((s.sample.as_str(), rep, emp, delta)),
                    _ => None,
                }
            })
            .collect();
        if drifted.is_empty() {
            return Ok(());
        }

        writeln!(writer, "Quality drift (reported → empirical):")?;
        let mut buffer = self.buffer();
        for (sample, rep, emp, delta) in drifted {
            write!(buffer, "  {}: {:.1} → {:.1} ", sample, rep, emp)?;
            let color = if delta < 0.0 { Color::Red } else { Color::Green };
            buffer.set_color(ColorSpec::new().set_fg(Some(color)))?;
            write!(buffer, "({:+.1})", delta)?;
            buffer.reset()?;
            writeln!(buffer)?;
        }
        writer.write_all(buffer.as_slice())?;
        writeln!(writer)?;
        Ok(())
    }

    /// Dump every parsed section of every sample as its own table
    fn write_sample_tables(&self, run: &Aggregate, writer: &mut dyn Write) -> Result<()> {
        for sample in &run.samples {
            for (id, table) in sample.report.iter() {
                writeln!(
                    writer,
                    "{} · {} ({} rows)",
                    sample.sample,
                    id,
                    table.row_count()
                )?;

                let mut table_data: Vec<Vec<String>> = Vec::new();
                table_data.push(table.column_names().map(String::from).collect());
                for i in 0..table.row_count() {
                    table_data.push(
                        table
                            .columns
                            .values()
                            .map(|col| col.get(i).cloned().unwrap_or_default())
                            .collect(),
                    );
                }
                writeln!(writer, "{}", build_table(&table_data))?;
            }
        }
        Ok(())
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for TerminalOutput {
    fn render(&self, run: &Aggregate, config: &Config, writer: &mut dyn Write) -> Result<()> {
        self.write_header(run, writer)?;
        self.write_summary(run, config, writer)?;
        self.write_drift(run, writer)?;
        if config.include_tables {
            self.write_sample_tables(run, writer)?;
        }
        Ok(())
    }
}

/// Build a formatted table from data
fn build_table(data: &[Vec<String>]) -> String {
    if data.is_empty() || data[0].is_empty() {
        return String::new();
    }

    let col_count = data[0].len();

    // Build column-aligned output manually
    let mut col_widths: Vec<usize> = vec![0; col_count];
    for row in data {
        for (i, cell) in row.iter().enumerate() {
            if i < col_widths.len() {
                col_widths[i] = col_widths[i].max(cell.chars().count());
            }
        }
    }

    let mut output = String::new();

    // Top border
    output.push('┌');
    for (i, width) in col_widths.iter().enumerate() {
        output.push_str(&"─".repeat(*width + 2));
        if i < col_widths.len() - 1 {
            output.push('┬');
        }
    }
    output.push_str("┐\n");

    // Header row
    if let Some(header) = data.first() {
        output.push('│');
        for (i, cell) in header.iter().enumerate() {
            let width = col_widths.get(i).copied().unwrap_or(0);
            output.push_str(&format!(" {:width$} │", cell, width = width));
        }
        output.push('\n');
    }

    // Header separator
    output.push('├');
    for (i, width) in col_widths.iter().enumerate() {
        output.push_str(&"─".repeat(*width + 2));
        if i < col_widths.len() - 1 {
            output.push('┼');
        }
    }
    output.push_str("┤\n");

    // Data rows
    for row in data.iter().skip(1) {
        output.push('│');
        for (i, cell) in row.iter().enumerate() {
            let width = col_widths.get(i).copied().unwrap_or(0);
            output.push_str(&format!(" {:width$} │", cell, width = width));
        }
        output.push('\n');
    }

    // Bottom border
    output.push('└');
    for (i, width) in col_widths.iter().enumerate() {
        output.push_str(&"─".repeat(*width + 2));
        if i < col_widths.len() - 1 {
            output.push('┴');
        }
    }
    output.push_str("┘\n");

    output
}
