use crate::application::use_cases::import::header_resolver::HeaderResolution;
use crate::domain::import::{CoverageStatus, FieldCoverage, ImportSpec, ParsedRow};

/// Classify every expected field across the parsed batch: FOUND when its
/// column holds at least one non-empty value, EMPTY when the column
/// resolved but every value is blank, MISSING when no column resolved.
pub fn field_coverage(
    spec: &ImportSpec,
    res: &HeaderResolution,
    rows: &[ParsedRow],
) -> Vec<FieldCoverage> {
    spec.fields
        .iter()
        .map(|field| {
            let status = match res.column(field.key) {
                None => CoverageStatus::Missing,
                Some(idx) => {
                    let any_value = rows.iter().any(|row| {
                        row.value_at(idx)
                            .map(|v| !v.trim().is_empty())
                            .unwrap_or(false)
                    });
                    if any_value {
                        CoverageStatus::Found
                    } else {
                        CoverageStatus::Empty
                    }
                }
            };
            FieldCoverage {
                field: field.key.to_string(),
                status,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::import::header_resolver::{
        resolve_fields, resolve_headers,
    };
    use crate::application::use_cases::import_schema::contact_spec;
    use crate::domain::import::RowCell;

    fn rows_from(headers: &[&str], data: &[&[&str]]) -> (Vec<ParsedRow>, HeaderResolution) {
        let resolved =
            resolve_headers(&headers.iter().map(|h| h.to_string()).collect::<Vec<_>>());
        let res = resolve_fields(&resolved, &contact_spec()).unwrap();
        let rows = data
            .iter()
            .enumerate()
            .map(|(i, row)| {
                ParsedRow::new(
                    i,
                    row.iter()
                        .enumerate()
                        .map(|(c, v)| RowCell::new(resolved[c].clone(), v.to_string()))
                        .collect(),
                )
            })
            .collect();
        (rows, res)
    }

    fn status_of(coverage: &[FieldCoverage], field: &str) -> CoverageStatus {
        coverage.iter().find(|c| c.field == field).unwrap().status
    }

    #[test]
    fn blank_column_reports_empty_not_missing() {
        let (rows, res) = rows_from(
            &["Name", "Email", "Phone"],
            &[&["Alice", "a@x.com", ""], &["Bob", "b@x.com", ""]],
        );
        let coverage = field_coverage(&contact_spec(), &res, &rows);

        assert_eq!(status_of(&coverage, "name"), CoverageStatus::Found);
        assert_eq!(status_of(&coverage, "phone"), CoverageStatus::Empty);
        assert_eq!(status_of(&coverage, "tags"), CoverageStatus::Missing);
    }
}
