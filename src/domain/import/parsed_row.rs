use crate::domain::crm::Metadata;
use serde::{Deserialize, Serialize};

/// A single cell in a parsed data row, tagged with its resolved header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowCell {
    /// Resolved header name (lower-cased, de-duplicated, placeholder-filled).
    pub header: String,

    /// Raw cell content, whitespace-trimmed by the parser.
    pub value: String,
}

impl RowCell {
    pub fn new(header: String, value: String) -> Self {
        Self { header, value }
    }

    pub fn is_empty(&self) -> bool {
        self.value.trim().is_empty()
    }
}

/// One source data row. Cells keep column order so that whole-row fallback
/// scans (price, phone, status keywords) stay deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedRow {
    /// 0-based data-row index (header row excluded).
    pub index: usize,
    pub cells: Vec<RowCell>,
}

impl ParsedRow {
    pub fn new(index: usize, cells: Vec<RowCell>) -> Self {
        Self { index, cells }
    }

    pub fn value_at(&self, idx: usize) -> Option<&str> {
        self.cells.get(idx).map(|c| c.value.as_str())
    }

    /// First non-empty cell whose header contains any of the given
    /// lower-case needles.
    pub fn value_by_header(&self, needles: &[&str]) -> Option<(usize, &str)> {
        self.cells.iter().enumerate().find_map(|(idx, cell)| {
            let matched = needles.iter().any(|n| cell.header.contains(n));
            if matched && !cell.is_empty() {
                Some((idx, cell.value.as_str()))
            } else {
                None
            }
        })
    }

    /// A row is blank when every cell is empty; blank rows are discarded
    /// by the pipeline instead of producing placeholder-only records.
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.is_empty())
    }

    /// The complete original row, keyed by resolved header. Retained
    /// verbatim on imported records for traceability.
    pub fn metadata(&self) -> Metadata {
        self.cells
            .iter()
            .map(|c| (c.header.clone(), c.value.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> ParsedRow {
        ParsedRow::new(
            0,
            pairs
                .iter()
                .map(|(h, v)| RowCell::new(h.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn header_lookup_takes_first_match() {
        let r = row(&[("work phone", "111"), ("cell phone", "222")]);
        assert_eq!(r.value_by_header(&["phone"]), Some((0, "111")));
    }

    #[test]
    fn header_lookup_skips_empty_cells() {
        let r = row(&[("phone", ""), ("mobile", "555-0100")]);
        assert_eq!(r.value_by_header(&["phone", "mobile"]), Some((1, "555-0100")));
    }

    #[test]
    fn blank_row_detection() {
        assert!(row(&[("a", ""), ("b", "  ")]).is_blank());
        assert!(!row(&[("a", ""), ("b", "x")]).is_blank());
    }

    #[test]
    fn metadata_keeps_every_column() {
        let r = row(&[("name", "Alice"), ("column_1", "")]);
        let meta = r.metadata();
        assert_eq!(meta.len(), 2);
        assert_eq!(meta.get("name").map(String::as_str), Some("Alice"));
        assert!(meta.contains_key("column_1"));
    }
}
