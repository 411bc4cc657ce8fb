//! Shared summary table: per-sample metric rows plus display headers

use indexmap::IndexMap;
use serde::Serialize;

/// A single summary metric value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Int(u64),
    Float(f64),
    Text(String),
}

impl MetricValue {
    /// Format for display, honoring the column's decimal places
    pub fn format(&self, decimals: usize) -> String {
        match self {
            MetricValue::Int(i) => i.to_string(),
            MetricValue::Float(f) => format!("{:.*}", decimals, f),
            MetricValue::Text(s) => s.clone(),
        }
    }

    /// Numeric view, if the value is numeric
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Int(i) => Some(*i as f64),
            MetricValue::Float(f) => Some(*f),
            MetricValue::Text(_) => None,
        }
    }
}

impl std::fmt::Display for MetricValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricValue::Int(i) => write!(f, "{}", i),
            MetricValue::Float(v) => write!(f, "{}", v),
            MetricValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<u64> for MetricValue {
    fn from(i: u64) -> Self {
        MetricValue::Int(i)
    }
}

impl From<f64> for MetricValue {
    fn from(f: f64) -> Self {
        MetricValue::Float(f)
    }
}

impl From<&str> for MetricValue {
    fn from(s: &str) -> Self {
        MetricValue::Text(s.to_string())
    }
}

impl From<String> for MetricValue {
    fn from(s: String) -> Self {
        MetricValue::Text(s)
    }
}

/// Display options for one summary column
#[derive(Debug, Clone, Serialize)]
pub struct ColumnHeader {
    /// Metric key this column reads from each sample's row
    pub key: String,
    /// Short title shown in the rendered table
    pub title: String,
    /// Longer description for machine-readable output
    pub description: String,
    /// Unit suffix appended to formatted values (e.g. "%")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    /// Decimal places for float values
    pub decimals: usize,
    /// Hidden columns are left out of the terminal table by default
    pub hidden: bool,
}

impl ColumnHeader {
    /// Create a header with default display options
    pub fn new(
        key: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            description: description.into(),
            suffix: None,
            decimals: 0,
            hidden: false,
        }
    }

    /// Set a unit suffix
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    /// Set decimal places for float values
    pub fn with_decimals(mut self, decimals: usize) -> Self {
        self.decimals = decimals;
        self
    }

    /// Hide the column from the default terminal table
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Format a value under this header's display options
    pub fn format(&self, value: &MetricValue) -> String {
        let mut out = value.format(self.decimals);
        if let Some(ref suffix) = self.suffix {
            out.push_str(suffix);
        }
        out
    }
}

/// The shared per-sample summary table.
///
/// Headers are handed off once at construction; samples accumulate in
/// insertion order. A sample's row may omit any metric, which renders blank.
#[derive(Debug, Default, Serialize)]
pub struct SummaryTable {
    headers: Vec<ColumnHeader>,
    samples: IndexMap<String, IndexMap<String, MetricValue>>,
}

impl SummaryTable {
    /// Create a summary table with the given column configuration
    pub fn new(headers: Vec<ColumnHeader>) -> Self {
        Self {
            headers,
            samples: IndexMap::new(),
        }
    }

    /// Add one sample's metric row, returning the previous row if the
    /// sample name was already present
    pub fn add_sample(
        &mut self,
        sample: impl Into<String>,
        metrics: IndexMap<String, MetricValue>,
    ) -> Option<IndexMap<String, MetricValue>> {
        self.samples.insert(sample.into(), metrics)
    }

    /// All column headers, in display order
    pub fn headers(&self) -> &[ColumnHeader] {
        &self.headers
    }

    /// Headers not hidden by default
    pub fn visible_headers(&self) -> impl Iterator<Item = &ColumnHeader> {
        self.headers.iter().filter(|h| !h.hidden)
    }

    /// Iterate samples in insertion order
    pub fn samples(&self) -> impl Iterator<Item = (&str, &IndexMap<String, MetricValue>)> {
        self.samples
            .iter()
            .map(|(name, row)| (name.as_str(), row))
    }

    /// Look up one sample's value for a metric key
    pub fn value(&self, sample: &str, key: &str) -> Option<&MetricValue> {
        self.samples.get(sample).and_then(|row| row.get(key))
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check whether no samples were added
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
