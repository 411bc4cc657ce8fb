//! recalqc - Summarize base-quality recalibration QC reports
//!
//! Parses the marker-delimited section tables of Sentieon QualCal
//! recalibration reports, computes per-sample quality metrics and renders
//! a cross-sample summary.

pub mod aggregate;
pub mod config;
pub mod discover;
pub mod error;
pub mod model;
pub mod output;
pub mod parser;
pub mod qualcal;

pub use aggregate::{aggregate, Aggregate, SampleReport};
pub use config::Config;
pub use error::{NoSamplesFound, ParseError};
pub use model::{Report, SectionTable};
