//! recalqc - Summarize base-quality recalibration QC reports

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use recalqc::aggregate::aggregate;
use recalqc::config::{Config, OutputFormat};
use recalqc::error::NoSamplesFound;
use recalqc::output::render_to_stdout;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    Terminal,
    Json,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> Self {
        match f {
            CliOutputFormat::Terminal => OutputFormat::Terminal,
            CliOutputFormat::Json => OutputFormat::Json,
        }
    }
}

/// Summarize base-quality recalibration QC reports across samples
#[derive(Parser, Debug)]
#[command(name = "recalqc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Report files or directories to scan
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "terminal")]
    format: CliOutputFormat,

    /// Fail on the first unparsable report instead of skipping it
    #[arg(long)]
    strict: bool,

    /// Show summary columns that are hidden by default
    #[arg(long)]
    all_columns: bool,

    /// Include the full parsed tables in the output
    #[arg(long)]
    full_tables: bool,

    /// File extension(s) accepted when scanning directories (comma-separated)
    #[arg(long, value_delimiter = ',', default_values = ["table", "txt", "qcal"])]
    ext: Vec<String>,

    /// Log progress details to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.downcast_ref::<NoSamplesFound>().is_some() => {
            eprintln!("{}", e);
            ExitCode::from(1)
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config {
        inputs: cli.inputs,
        output_format: cli.format.into(),
        strict: cli.strict,
        show_hidden: cli.all_columns,
        include_tables: cli.full_tables,
        extensions: cli.ext,
    };

    let summary = aggregate(&config)?;
    render_to_stdout(&summary, &config)
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
