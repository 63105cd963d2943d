// ============================================================
// CSV PARSER
// ============================================================
// Single-pass scanner for the lenient CSV dialect produced by
// spreadsheet exports: quoted fields may embed delimiters and
// newlines, and a doubled quote inside a quoted field is a
// literal quote (RFC 4180 escaping).

use crate::domain::error::{AppError, Result};

pub struct CsvParser {
    /// Delimiter character (default: comma)
    delimiter: char,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self { delimiter: ',' }
    }
}

impl CsvParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom delimiter
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Parse delimited text into rows of trimmed string cells. The first
    /// row is the header row; a file with fewer than two rows (header +
    /// at least one data row) is rejected outright.
    pub fn parse_content(&self, content: &str) -> Result<Vec<Vec<String>>> {
        let rows = self.scan(content);

        if rows.len() < 2 {
            return Err(AppError::ParseError(
                "File is empty or missing data rows".to_string(),
            ));
        }

        Ok(rows)
    }

    fn scan(&self, content: &str) -> Vec<Vec<String>> {
        let mut rows: Vec<Vec<String>> = Vec::new();
        let mut current_row: Vec<String> = Vec::new();
        let mut current_field = String::new();
        let mut in_quotes = false;

        let mut chars = content.chars().peekable();
        while let Some(c) = chars.next() {
            if in_quotes {
                if c == '"' {
                    // "" inside a quoted field is a literal quote
                    if chars.peek() == Some(&'"') {
                        current_field.push('"');
                        chars.next();
                    } else {
                        in_quotes = false;
                    }
                } else {
                    current_field.push(c);
                }
                continue;
            }

            if c == '"' {
                in_quotes = true;
            } else if c == self.delimiter {
                current_row.push(current_field.trim().to_string());
                current_field.clear();
            } else if c == '\n' || c == '\r' {
                // End of row, skipping empty trailing fragments (\r\n,
                // blank lines between records).
                if !current_field.is_empty() || !current_row.is_empty() {
                    current_row.push(current_field.trim().to_string());
                    current_field.clear();
                    rows.push(std::mem::take(&mut current_row));
                }
            } else {
                current_field.push(c);
            }
        }

        if !current_field.is_empty() || !current_row.is_empty() {
            current_row.push(current_field.trim().to_string());
            rows.push(current_row);
        }

        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Vec<Vec<String>> {
        CsvParser::new().parse_content(content).unwrap()
    }

    #[test]
    fn splits_simple_rows_and_trims_cells() {
        let rows = parse("name, age ,city\nAlice,30 , NYC");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["name", "age", "city"]);
        assert_eq!(rows[1], vec!["Alice", "30", "NYC"]);
    }

    #[test]
    fn does_not_split_on_commas_inside_quotes() {
        let rows = parse("address,price\n\"123 Main St, Apt 2\",450000");
        assert_eq!(rows[1][0], "123 Main St, Apt 2");
        assert_eq!(rows[1][1], "450000");
    }

    #[test]
    fn keeps_newlines_inside_quoted_fields() {
        let rows = parse("notes,owner\n\"line one\nline two\",Doe");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][0], "line one\nline two");
    }

    #[test]
    fn doubled_quote_is_a_literal_quote() {
        let rows = parse("name,nickname\n\"Robert \"\"Bob\"\" Paulson\",Bob");
        assert_eq!(rows[1][0], "Robert \"Bob\" Paulson");
    }

    #[test]
    fn produces_one_record_per_data_row() {
        let rows = parse("h1,h2\r\na,b\r\nc,d\r\n");
        assert_eq!(rows.len() - 1, 2);
    }

    #[test]
    fn blank_lines_between_records_are_skipped() {
        let rows = parse("h1,h2\na,b\n\n\nc,d");
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn header_only_file_is_rejected() {
        let err = CsvParser::new().parse_content("name,email\n").unwrap_err();
        assert!(err.to_string().contains("missing data rows"));
    }

    #[test]
    fn empty_file_is_rejected() {
        assert!(CsvParser::new().parse_content("").is_err());
    }

    #[test]
    fn custom_delimiter() {
        let rows = CsvParser::new()
            .with_delimiter(';')
            .parse_content("a;b\n1;2")
            .unwrap();
        assert_eq!(rows[1], vec!["1", "2"]);
    }
}
