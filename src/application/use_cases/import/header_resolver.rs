use crate::domain::error::{AppError, Result};
use crate::domain::import::ImportSpec;
use std::collections::HashMap;

/// Outcome of matching an import spec against a file's header row.
/// Column indices are valid for every row of the padded table.
#[derive(Debug, Clone)]
pub struct HeaderResolution {
    columns: HashMap<&'static str, usize>,
}

impl HeaderResolution {
    pub fn column(&self, key: &str) -> Option<usize> {
        self.columns.get(key).copied()
    }

    pub fn resolved_count(&self) -> usize {
        self.columns.len()
    }
}

/// Produce the aligned header list: lower-cased, trimmed, empty headers
/// replaced with `column_<index>`, repeats de-duplicated by suffixing the
/// occurrence count (`foo`, `foo_1`, `foo_2`). Running this over an
/// already-unique list changes nothing.
pub fn resolve_headers(raw: &[String]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut resolved = Vec::with_capacity(raw.len());

    for (index, header) in raw.iter().enumerate() {
        let mut name = header.trim().to_lowercase();
        if name.is_empty() {
            name = format!("column_{}", index);
        }

        let occurrences = seen.entry(name.clone()).or_insert(0);
        if *occurrences > 0 {
            name = format!("{}_{}", name, occurrences);
        }
        *occurrences += 1;

        resolved.push(name);
    }

    resolved
}

/// For each canonical field, the first column (scanning left to right)
/// whose header contains the field key or one of its aliases. Partial
/// resolution is fine and reported per-field later; only a file where
/// nothing at all resolves is rejected.
pub fn resolve_fields(headers: &[String], spec: &ImportSpec) -> Result<HeaderResolution> {
    let mut columns = HashMap::new();

    for field in &spec.fields {
        let hit = headers.iter().position(|h| field.matches(h));
        if let Some(index) = hit {
            columns.insert(field.key, index);
        }
    }

    if columns.is_empty() && !spec.fields.is_empty() {
        return Err(AppError::ValidationError(
            "Could not find required columns in the uploaded file".to_string(),
        ));
    }

    Ok(HeaderResolution { columns })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::import_schema::{contact_spec, fields, listing_spec};

    fn headers(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn lowercases_and_fills_placeholders() {
        let resolved = resolve_headers(&headers(&["Name", "", "Phone"]));
        assert_eq!(resolved, vec!["name", "column_1", "phone"]);
    }

    #[test]
    fn renames_repeated_headers() {
        let resolved = resolve_headers(&headers(&["foo", "Foo", "foo"]));
        assert_eq!(resolved, vec!["foo", "foo_1", "foo_2"]);
    }

    #[test]
    fn idempotent_over_unique_lists() {
        let once = resolve_headers(&headers(&["name", "email", "column_2"]));
        let twice = resolve_headers(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn first_matching_column_wins() {
        let resolved = resolve_headers(&headers(&["Home Phone", "Cell Phone"]));
        let resolution = resolve_fields(&resolved, &contact_spec()).unwrap();
        assert_eq!(resolution.column(fields::PHONE), Some(0));
    }

    #[test]
    fn alias_substring_matching_resolves_messy_exports() {
        let resolved = resolve_headers(&headers(&["Address", "OwnerLastName", "SaleAmt"]));
        let resolution = resolve_fields(&resolved, &listing_spec()).unwrap();
        assert_eq!(resolution.column(fields::SELLER), Some(1));
        assert_eq!(resolution.column(fields::PRICE), Some(2));
    }

    #[test]
    fn partial_resolution_is_accepted() {
        let resolved = resolve_headers(&headers(&["Name"]));
        let resolution = resolve_fields(&resolved, &contact_spec()).unwrap();
        assert_eq!(resolution.column(fields::NAME), Some(0));
        assert_eq!(resolution.column(fields::EMAIL), None);
    }

    #[test]
    fn zero_resolution_fails() {
        let resolved = resolve_headers(&headers(&["alpha", "beta"]));
        assert!(resolve_fields(&resolved, &listing_spec()).is_err());
    }
}
