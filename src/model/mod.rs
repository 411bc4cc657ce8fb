//! Data model for parsed reports and the shared summary

mod summary;
mod table;

pub use summary::{ColumnHeader, MetricValue, SummaryTable};
pub use table::{Report, SectionTable};
