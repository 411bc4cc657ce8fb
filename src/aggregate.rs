//! Collect per-sample reports into one run summary

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::Config;
use crate::discover::{discover_reports, sample_name};
use crate::error::NoSamplesFound;
use crate::model::{Report, SummaryTable};
use crate::parser::{scan_sections, MarkerMap};
use crate::qualcal::{self, SampleMetrics};

/// One parsed report attributed to a sample
#[derive(Debug, Clone, Serialize)]
pub struct SampleReport {
    /// Sample name derived from the file name
    pub sample: String,
    /// Where the report came from
    pub path: PathBuf,
    /// The parsed tables
    pub report: Report,
    /// Summary metrics computed from the tables
    pub metrics: SampleMetrics,
}

/// Everything a run produced: per-sample reports plus the shared summary
#[derive(Debug)]
pub struct Aggregate {
    /// Parsed reports in discovery order, one per sample
    pub samples: Vec<SampleReport>,
    /// The cross-sample summary table
    pub summary: SummaryTable,
}

/// Discover, parse and summarize all reports named by the config.
///
/// Files parse in parallel; results keep discovery order. In strict mode the
/// first unparsable report aborts the run, otherwise it is skipped with a
/// warning. Returns [`NoSamplesFound`] when nothing usable was parsed.
pub fn aggregate(config: &Config) -> Result<Aggregate> {
    let files = discover_reports(&config.inputs, &config.extensions)?;
    let markers = qualcal::qualcal_markers();

    let parsed: Vec<Option<SampleReport>> = files
        .par_iter()
        .map(|path| match load_sample(path, &markers) {
            Ok(sample) => Ok(sample),
            Err(err) if config.strict => Err(err),
            Err(err) => {
                warn!("skipping {}: {err:#}", path.display());
                Ok(None)
            }
        })
        .collect::<Result<_>>()?;

    let mut samples: Vec<SampleReport> = Vec::new();
    for sample in parsed.into_iter().flatten() {
        if let Some(prev) = samples.iter_mut().find(|s| s.sample == sample.sample) {
            warn!(
                sample = %sample.sample,
                "duplicate sample name, keeping the later report"
            );
            *prev = sample;
        } else {
            samples.push(sample);
        }
    }

    if samples.is_empty() {
        return Err(NoSamplesFound.into());
    }

    let mut summary = SummaryTable::new(qualcal::summary_headers());
    for sample in &samples {
        summary.add_sample(&sample.sample, sample.metrics.to_row());
    }
    debug!(samples = samples.len(), "aggregated recalibration reports");

    Ok(Aggregate { samples, summary })
}

/// Parse one report file, or None when it holds no recognized sections
fn load_sample(path: &Path, markers: &MarkerMap) -> Result<Option<SampleReport>> {
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let report = scan_sections(BufReader::new(file), markers)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    if report.is_empty() {
        debug!(path = %path.display(), "no recognized sections, ignoring file");
        return Ok(None);
    }

    let metrics = SampleMetrics::from_report(&report)
        .with_context(|| format!("bad metric values in {}", path.display()))?;

    Ok(Some(SampleReport {
        sample: sample_name(path),
        path: path.to_path_buf(),
        report,
        metrics,
    }))
}
