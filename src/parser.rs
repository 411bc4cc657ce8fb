//! Section table parser for marker-delimited report streams
//!
//! Recalibration reports embed whitespace-delimited tables in plain text:
//! a marker line names the section, the next line is the header row, and
//! data rows follow until a blank line or the end of the stream. The scan
//! is a single forward pass; everything outside recognized sections is
//! discarded.

use std::io::{self, BufRead};

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use tracing::debug;

use crate::error::ParseError;
use crate::model::{Report, SectionTable};

/// Mapping from exact marker-line text to the identifier the parsed section
/// is stored under in the [`Report`].
#[derive(Debug, Clone, Default)]
pub struct MarkerMap {
    entries: IndexMap<String, String, FxBuildHasher>,
}

impl MarkerMap {
    /// Create an empty marker map
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a marker, consuming and returning the map for chaining.
    /// Marker text is compared exactly against each scanned line after
    /// trailing whitespace is trimmed.
    pub fn with(mut self, marker: impl Into<String>, table_id: impl Into<String>) -> Self {
        self.entries.insert(marker.into(), table_id.into());
        self
    }

    /// Look up the table identifier for a trimmed line
    pub fn table_id(&self, line: &str) -> Option<&str> {
        self.entries.get(line).map(String::as_str)
    }

    /// Iterate (marker, table identifier) pairs in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(m, id)| (m.as_str(), id.as_str()))
    }

    /// Number of registered markers
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether no markers are registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Scan a report stream for recognized section markers and parse each
/// marked table.
///
/// Lines are consumed exactly once: the inner table routine advances the
/// same cursor as the outer scan, so parsing resumes right after each
/// section's terminator. Markers that never appear simply produce no entry.
pub fn scan_sections<R: BufRead>(reader: R, markers: &MarkerMap) -> Result<Report, ParseError> {
    let mut report = Report::new();
    let mut lines = reader.lines();

    while let Some(line) = lines.next() {
        let line = line?;
        if let Some(id) = markers.table_id(line.trim_end()) {
            let table = parse_section_table(&mut lines, id)?;
            if report.insert(id, table).is_some() {
                debug!(section = id, "marker appeared again; keeping the later table");
            }
        }
    }

    Ok(report)
}

/// Parse one table section, with the cursor positioned just after its
/// marker line.
///
/// The header row is split on whitespace runs to name the columns; data
/// rows follow until a blank line or the end of the stream, and each must
/// carry exactly one value per column.
fn parse_section_table<I>(lines: &mut I, section: &str) -> Result<SectionTable, ParseError>
where
    I: Iterator<Item = io::Result<String>>,
{
    let header = lines.next().ok_or_else(|| ParseError::UnexpectedEndOfSection {
        section: section.to_string(),
    })??;

    let mut table = SectionTable::new();
    for name in header.split_whitespace() {
        if table.columns.insert(name.to_string(), Vec::new()).is_some() {
            return Err(ParseError::DuplicateColumn {
                section: section.to_string(),
                column: name.to_string(),
            });
        }
    }

    let mut row = 0;
    for line in lines {
        let line = line?;
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        row += 1;

        let values: Vec<&str> = line.split_whitespace().collect();
        if values.len() != table.column_count() {
            return Err(ParseError::RowWidthMismatch {
                section: section.to_string(),
                row,
                expected: table.column_count(),
                found: values.len(),
            });
        }
        for (column, value) in table.columns.values_mut().zip(values) {
            column.push(value.to_string());
        }
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn counts_marker() -> MarkerMap {
        MarkerMap::new().with("#:REPORT:Counts", "counts")
    }

    #[test]
    fn test_parses_single_section() {
        let input = "\
tool version 1.2.3
#:REPORT:Counts
name reads errors
a 100 2
b 250 5

trailing noise
";
        let report = scan_sections(Cursor::new(input), &counts_marker()).unwrap();
        assert_eq!(report.len(), 1);

        let table = report.table("counts").unwrap();
        let names: Vec<_> = table.column_names().collect();
        assert_eq!(names, vec!["name", "reads", "errors"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column("reads").unwrap(), ["100", "250"]);
        assert_eq!(table.column("errors").unwrap(), ["2", "5"]);
    }

    #[test]
    fn test_multiple_sections_stay_isolated() {
        let markers = MarkerMap::new()
            .with("#:REPORT:Counts", "counts")
            .with("#:REPORT:Rates", "rates");
        let input = "\
#:REPORT:Counts
name reads
a 100

#:REPORT:Rates
name rate pct
a 0.02 2.0
b 0.05 5.0
";
        let report = scan_sections(Cursor::new(input), &markers).unwrap();
        assert_eq!(report.len(), 2);
        assert_eq!(report.table("counts").unwrap().row_count(), 1);
        assert_eq!(report.table("rates").unwrap().row_count(), 2);
        assert_eq!(report.table("counts").unwrap().column_count(), 2);
        assert_eq!(report.table("rates").unwrap().column_count(), 3);
        assert!(report.table("counts").unwrap().column("rate").is_none());
    }

    #[test]
    fn test_marker_match_is_exact() {
        // Leading whitespace and case differences must not match; trailing
        // whitespace is trimmed before the comparison and does.
        let input = " #:REPORT:Counts\n#:report:counts\nname\n";
        let report = scan_sections(Cursor::new(input), &counts_marker()).unwrap();
        assert!(report.is_empty());

        let input = "#:REPORT:Counts   \nname reads\na 1\n";
        let report = scan_sections(Cursor::new(input), &counts_marker()).unwrap();
        assert_eq!(report.table("counts").unwrap().row_count(), 1);
    }

    #[test]
    fn test_unmatched_marker_produces_no_entry() {
        let markers = counts_marker().with("#:REPORT:Missing", "missing");
        let input = "#:REPORT:Counts\nname\na\n";
        let report = scan_sections(Cursor::new(input), &markers).unwrap();
        assert!(report.table("missing").is_none());
        assert_eq!(report.len(), 1);
    }

    #[test]
    fn test_stream_end_terminates_table() {
        let input = "#:REPORT:Counts\nname reads\na 100\nb 250";
        let report = scan_sections(Cursor::new(input), &counts_marker()).unwrap();
        let table = report.table("counts").unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column("name").unwrap(), ["a", "b"]);
    }

    #[test]
    fn test_short_row_is_rejected() {
        let input = "#:REPORT:Counts\nname reads errors\na 100\n";
        let err = scan_sections(Cursor::new(input), &counts_marker()).unwrap_err();
        assert!(matches!(
            err,
            ParseError::RowWidthMismatch {
                row: 1,
                expected: 3,
                found: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_long_row_is_rejected() {
        let input = "#:REPORT:Counts\nname reads\na 100 extra\n";
        let err = scan_sections(Cursor::new(input), &counts_marker()).unwrap_err();
        assert!(matches!(
            err,
            ParseError::RowWidthMismatch {
                expected: 2,
                found: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_duplicate_column_is_rejected() {
        let input = "#:REPORT:Counts\nname reads name\n";
        let err = scan_sections(Cursor::new(input), &counts_marker()).unwrap_err();
        match err {
            ParseError::DuplicateColumn { section, column } => {
                assert_eq!(section, "counts");
                assert_eq!(column, "name");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_marker_at_end_of_stream() {
        let input = "#:REPORT:Counts";
        let err = scan_sections(Cursor::new(input), &counts_marker()).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEndOfSection { .. }));
    }

    #[test]
    fn test_blank_header_yields_empty_table() {
        // A blank line where the header row should be reads as a
        // zero-column section; it is present in the report but empty.
        let input = "#:REPORT:Counts\n\n\nignored\n";
        let report = scan_sections(Cursor::new(input), &counts_marker()).unwrap();
        let table = report.table("counts").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_repeated_marker_keeps_later_table() {
        let input = "\
#:REPORT:Counts
name reads
a 100

#:REPORT:Counts
name reads
b 250
c 300
";
        let report = scan_sections(Cursor::new(input), &counts_marker()).unwrap();
        let table = report.table("counts").unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column("name").unwrap(), ["b", "c"]);
    }

    #[test]
    fn test_windows_line_endings() {
        let input = "#:REPORT:Counts\r\nname reads\r\na 100\r\n\r\n";
        let report = scan_sections(Cursor::new(input), &counts_marker()).unwrap();
        let table = report.table("counts").unwrap();
        assert_eq!(table.column("reads").unwrap(), ["100"]);
    }

    #[test]
    fn test_all_columns_equal_length() {
        let input = "#:REPORT:Counts\na b c d\n1 2 3 4\n5 6 7 8\n9 10 11 12\n";
        let report = scan_sections(Cursor::new(input), &counts_marker()).unwrap();
        let table = report.table("counts").unwrap();
        for name in ["a", "b", "c", "d"] {
            assert_eq!(table.column(name).unwrap().len(), 3);
        }
    }
}
