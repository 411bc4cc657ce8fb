//! Sentieon QualCal report layout and per-sample summary metrics
//!
//! QualCal detects systematic errors in the base quality scores of aligned
//! reads; its recalibration table is a plain-text report with marker-line
//! delimited sections. Three sections are recognized here: the argument
//! collection, the quality quantization map, and the per-read-group
//! recalibration table.

use std::io::BufRead;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::error::ParseError;
use crate::model::{ColumnHeader, MetricValue, Report, SectionTable};
use crate::parser::{scan_sections, MarkerMap};

/// Marker lines of the recognized QualCal sections
pub const ARGUMENTS_MARKER: &str =
    "#:SENTIEON_QCAL_TABLE:Arguments:Recalibration argument collection values used in this run";
pub const QUANTIZED_MARKER: &str = "#:SENTIEON_QCAL_TABLE:Quantized:Quality quantization map";
pub const RECAL_TABLE_MARKER: &str = "#:SENTIEON_QCAL_TABLE:RecalTable0:";

/// Table identifiers the sections are stored under
pub const ARGUMENTS: &str = "arguments";
pub const QUANTIZED: &str = "quantized";
pub const RECAL_TABLE: &str = "recal_table";

/// EventType value marking base mismatches in the recalibration table
const MISMATCH_EVENT: &str = "M";

/// Build the marker map for a Sentieon QualCal recalibration table
pub fn qualcal_markers() -> MarkerMap {
    MarkerMap::new()
        .with(ARGUMENTS_MARKER, ARGUMENTS)
        .with(QUANTIZED_MARKER, QUANTIZED)
        .with(RECAL_TABLE_MARKER, RECAL_TABLE)
}

/// Parse a QualCal report stream into its recognized tables
pub fn parse_qualcal<R: BufRead>(reader: R) -> Result<Report, ParseError> {
    scan_sections(reader, &qualcal_markers())
}

/// Summary metrics computed from one sample's parsed report.
///
/// Every field is optional: a report missing the table a metric reads from
/// simply leaves that metric unset, and it renders blank in the summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SampleMetrics {
    /// Total bases counted in the quality quantization map
    pub total_bases: Option<u64>,
    /// Distinct quantized quality scores in use
    pub quantized_bins: Option<u64>,
    /// Observation-weighted mean reported base quality, mismatch events
    pub mean_reported_q: Option<f64>,
    /// Observation-weighted mean empirical base quality, mismatch events
    pub mean_empirical_q: Option<f64>,
    /// Empirical minus reported mean quality
    pub delta_q: Option<f64>,
    /// Mismatch observations in the recalibration table
    pub total_observations: Option<u64>,
    /// Mismatch errors per observation, as a percentage
    pub error_rate: Option<f64>,
}

impl SampleMetrics {
    /// Compute summary metrics from a parsed QualCal report
    pub fn from_report(report: &Report) -> Result<Self> {
        let mut metrics = Self::default();
        if let Some(table) = report.table(QUANTIZED) {
            metrics.fold_quantized(table)?;
        }
        if let Some(table) = report.table(RECAL_TABLE) {
            metrics.fold_recal_table(table)?;
        }
        Ok(metrics)
    }

    /// Fold the quality quantization map: total bases and bin count
    fn fold_quantized(&mut self, table: &SectionTable) -> Result<()> {
        let counts = column(table, QUANTIZED, "Count")?;
        let mut total = 0u64;
        for raw in counts {
            total += raw.parse::<u64>().with_context(|| {
                format!("section '{QUANTIZED}' column 'Count': invalid count '{raw}'")
            })?;
        }
        self.total_bases = Some(total);

        let bins = column(table, QUANTIZED, "QuantizedScore")?;
        let distinct: FxHashSet<&str> = bins.iter().map(String::as_str).collect();
        self.quantized_bins = Some(distinct.len() as u64);
        Ok(())
    }

    /// Fold the read-group recalibration table, mismatch events only
    fn fold_recal_table(&mut self, table: &SectionTable) -> Result<()> {
        let events = column(table, RECAL_TABLE, "EventType")?;
        let empirical = column(table, RECAL_TABLE, "EmpiricalQuality")?;
        let reported = column(table, RECAL_TABLE, "EstimatedQReported")?;
        let observations = column(table, RECAL_TABLE, "Observations")?;
        let errors = column(table, RECAL_TABLE, "Errors")?;

        let mut obs_total = 0.0;
        let mut err_total = 0.0;
        let mut empirical_sum = 0.0;
        let mut reported_sum = 0.0;

        let rows = events
            .iter()
            .zip(empirical)
            .zip(reported)
            .zip(observations)
            .zip(errors);
        for ((((event, emp), rep), obs), err) in rows {
            if event != MISMATCH_EVENT {
                continue;
            }
            let obs = parse_numeric(RECAL_TABLE, "Observations", obs)?;
            err_total += parse_numeric(RECAL_TABLE, "Errors", err)?;
            empirical_sum += parse_numeric(RECAL_TABLE, "EmpiricalQuality", emp)? * obs;
            reported_sum += parse_numeric(RECAL_TABLE, "EstimatedQReported", rep)? * obs;
            obs_total += obs;
        }

        if obs_total > 0.0 {
            let mean_empirical = empirical_sum / obs_total;
            let mean_reported = reported_sum / obs_total;
            self.mean_empirical_q = Some(mean_empirical);
            self.mean_reported_q = Some(mean_reported);
            self.delta_q = Some(mean_empirical - mean_reported);
            self.total_observations = Some(obs_total as u64);
            self.error_rate = Some(err_total / obs_total * 100.0);
        }
        Ok(())
    }

    /// Flatten into a summary row, keyed to match [`summary_headers`]
    pub fn to_row(&self) -> IndexMap<String, MetricValue> {
        let mut row = IndexMap::new();
        let mut put = |key: &str, value: Option<MetricValue>| {
            if let Some(value) = value {
                row.insert(key.to_string(), value);
            }
        };
        put("total_bases", self.total_bases.map(MetricValue::from));
        put("quantized_bins", self.quantized_bins.map(MetricValue::from));
        put("mean_reported_q", self.mean_reported_q.map(MetricValue::from));
        put("mean_empirical_q", self.mean_empirical_q.map(MetricValue::from));
        put("delta_q", self.delta_q.map(MetricValue::from));
        put(
            "total_observations",
            self.total_observations.map(MetricValue::from),
        );
        put("error_rate", self.error_rate.map(MetricValue::from));
        row
    }

    /// Check whether nothing at all was computed
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Header configuration for the shared summary table
pub fn summary_headers() -> Vec<ColumnHeader> {
    vec![
        ColumnHeader::new(
            "total_bases",
            "Bases",
            "Total bases counted in the quality quantization map",
        )
        .hidden(),
        ColumnHeader::new(
            "quantized_bins",
            "Q bins",
            "Distinct quantized quality scores in use",
        )
        .hidden(),
        ColumnHeader::new(
            "mean_reported_q",
            "Reported Q",
            "Observation-weighted mean reported base quality (mismatch events)",
        )
        .with_decimals(1),
        ColumnHeader::new(
            "mean_empirical_q",
            "Empirical Q",
            "Observation-weighted mean empirical base quality (mismatch events)",
        )
        .with_decimals(1),
        ColumnHeader::new("delta_q", "ΔQ", "Empirical minus reported mean quality")
            .with_decimals(1),
        ColumnHeader::new(
            "total_observations",
            "Observations",
            "Mismatch observations in the recalibration table",
        )
        .hidden(),
        ColumnHeader::new(
            "error_rate",
            "Error rate",
            "Mismatch errors per observation",
        )
        .with_suffix("%")
        .with_decimals(2),
    ]
}

fn column<'t>(table: &'t SectionTable, section: &str, name: &str) -> Result<&'t [String]> {
    table
        .column(name)
        .with_context(|| format!("section '{section}' is missing column '{name}'"))
}

fn parse_numeric(section: &str, column: &str, raw: &str) -> Result<f64> {
    raw.parse::<f64>()
        .with_context(|| format!("section '{section}' column '{column}': invalid number '{raw}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const REPORT: &str = "\
#:SENTIEON_QCAL_TABLE_SET:3
#:SENTIEON_QCAL_TABLE:Arguments:Recalibration argument collection values used in this run
Argument Value
covariate QualityScore
no_standard_covs false

#:SENTIEON_QCAL_TABLE:Quantized:Quality quantization map
QualityScore Count QuantizedScore
10 1000 10
20 3000 20
30 6000 30

#:SENTIEON_QCAL_TABLE:RecalTable0:
ReadGroup EventType EmpiricalQuality EstimatedQReported Observations Errors
rg1 M 30.0 28.0 8000 8.00
rg1 I 40.0 40.0 1000 1.00
rg1 D 40.0 40.0 1000 1.00
rg2 M 25.0 26.0 2000 10.00
";

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_parse_qualcal_finds_all_sections() {
        let report = parse_qualcal(Cursor::new(REPORT)).unwrap();
        assert_eq!(report.len(), 3);
        assert_eq!(report.table(ARGUMENTS).unwrap().row_count(), 2);
        assert_eq!(report.table(QUANTIZED).unwrap().row_count(), 3);
        assert_eq!(report.table(RECAL_TABLE).unwrap().row_count(), 4);
        assert_eq!(
            report.table(ARGUMENTS).unwrap().column("Argument").unwrap(),
            ["covariate", "no_standard_covs"]
        );
    }

    #[test]
    fn test_metrics_from_full_report() {
        let report = parse_qualcal(Cursor::new(REPORT)).unwrap();
        let metrics = SampleMetrics::from_report(&report).unwrap();

        assert_eq!(metrics.total_bases, Some(10_000));
        assert_eq!(metrics.quantized_bins, Some(3));
        assert_eq!(metrics.total_observations, Some(10_000));
        // Mismatch rows only: 8000 obs at E30/R28 and 2000 obs at E25/R26
        assert!(close(metrics.mean_empirical_q.unwrap(), 29.0));
        assert!(close(metrics.mean_reported_q.unwrap(), 27.6));
        assert!(close(metrics.delta_q.unwrap(), 1.4));
        assert!(close(metrics.error_rate.unwrap(), 0.18));
    }

    #[test]
    fn test_metrics_without_recal_table() {
        let input = "\
#:SENTIEON_QCAL_TABLE:Quantized:Quality quantization map
QualityScore Count QuantizedScore
10 500 10
20 500 10
";
        let report = parse_qualcal(Cursor::new(input)).unwrap();
        let metrics = SampleMetrics::from_report(&report).unwrap();
        assert_eq!(metrics.total_bases, Some(1000));
        assert_eq!(metrics.quantized_bins, Some(1));
        assert!(metrics.mean_empirical_q.is_none());
        assert!(metrics.delta_q.is_none());
    }

    #[test]
    fn test_metrics_empty_report() {
        let report = Report::new();
        let metrics = SampleMetrics::from_report(&report).unwrap();
        assert!(metrics.is_empty());
        assert!(metrics.to_row().is_empty());
    }

    #[test]
    fn test_no_mismatch_rows_leaves_quality_unset() {
        let input = "\
#:SENTIEON_QCAL_TABLE:RecalTable0:
ReadGroup EventType EmpiricalQuality EstimatedQReported Observations Errors
rg1 I 40.0 40.0 1000 1.00
";
        let report = parse_qualcal(Cursor::new(input)).unwrap();
        let metrics = SampleMetrics::from_report(&report).unwrap();
        assert!(metrics.mean_empirical_q.is_none());
        assert!(metrics.total_observations.is_none());
        assert!(metrics.error_rate.is_none());
    }

    #[test]
    fn test_malformed_number_is_an_error() {
        let input = "\
#:SENTIEON_QCAL_TABLE:Quantized:Quality quantization map
QualityScore Count QuantizedScore
10 many 10
";
        let report = parse_qualcal(Cursor::new(input)).unwrap();
        let err = SampleMetrics::from_report(&report).unwrap_err();
        assert!(err.to_string().contains("invalid count 'many'"));
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let input = "\
#:SENTIEON_QCAL_TABLE:Quantized:Quality quantization map
QualityScore Count
10 500
";
        let report = parse_qualcal(Cursor::new(input)).unwrap();
        let err = SampleMetrics::from_report(&report).unwrap_err();
        assert!(err.to_string().contains("missing column 'QuantizedScore'"));
    }

    #[test]
    fn test_row_keys_match_headers() {
        let report = parse_qualcal(Cursor::new(REPORT)).unwrap();
        let row = SampleMetrics::from_report(&report).unwrap().to_row();
        for header in summary_headers() {
            assert!(row.contains_key(&header.key), "no value for {}", header.key);
        }
    }
}
