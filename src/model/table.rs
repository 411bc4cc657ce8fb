//! Parsed report tables: ordered string columns keyed by header name

use indexmap::IndexMap;
use serde::Serialize;

/// A single parsed table section.
///
/// Columns appear in header order; every column holds one value per data
/// row, in encounter order. Values stay as the strings found in the report;
/// numeric interpretation is left to the metrics layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SectionTable {
    /// Column name → values, in header order
    pub columns: IndexMap<String, Vec<String>>,
}

impl SectionTable {
    /// Create an empty table with no columns
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a column's values by name
    pub fn column(&self, name: &str) -> Option<&[String]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Column names in header order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of data rows (columns are always equal length)
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |(_, values)| values.len())
    }

    /// Check whether the table has no columns at all
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// All tables parsed out of one report stream, keyed by the identifier the
/// caller assigned to each marker.
///
/// An identifier is present only if its marker line was found; entries
/// appear in stream encounter order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Report {
    tables: IndexMap<String, SectionTable>,
}

impl Report {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a parsed table, returning the previous one if the identifier
    /// was already present
    pub fn insert(&mut self, id: impl Into<String>, table: SectionTable) -> Option<SectionTable> {
        self.tables.insert(id.into(), table)
    }

    /// Get a table by identifier
    pub fn table(&self, id: &str) -> Option<&SectionTable> {
        self.tables.get(id)
    }

    /// Iterate tables in encounter order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SectionTable)> {
        self.tables.iter().map(|(id, table)| (id.as_str(), table))
    }

    /// Number of tables
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Check whether no marker matched at all
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
