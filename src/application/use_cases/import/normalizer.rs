// ============================================================
// FIELD NORMALIZER
// ============================================================
// Per canonical field, extract a typed value from a parsed row or fall
// back to a documented default. Multi-tier lookups are written as
// explicit ordered cascades so each precedence rule stays independently
// testable.

use crate::application::use_cases::import::header_resolver::HeaderResolution;
use crate::application::use_cases::import_schema::fields;
use crate::domain::crm::{Financing, ListingStatus, OfferStatus, TaskPriority, TaskStatus};
use crate::domain::import::{ContactDraft, ListingDraft, OfferDraft, ParsedRow, TaskDraft};
use crate::infrastructure::config::ImportConfig;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static CURRENCY_STRIP_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[$€£¥,\s]").unwrap());

static PHONE_TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?[\d\s\-]{7,}$").unwrap());

static DIGITS_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// Keywords that make a cell a status candidate during the whole-row scan.
const STATUS_KEYWORDS: &[&str] = &[
    "sold", "closed", "settled", "contract", "pending", "escrow", "active", "market", "listed",
    "new", "draft",
];

const SOLD_WORDS: &[&str] = &["sold", "closed", "settled", "archived", "done", "complete"];
const CONTRACT_WORDS: &[&str] = &["contract", "pending", "option", "escrow", "offer", "accepted"];
const ACTIVE_WORDS: &[&str] = &["active", "sale", "available", "market", "listed", "open"];
const NEW_WORDS: &[&str] = &["new", "draft", "incoming", "fresh"];

pub fn normalize_contact(row: &ParsedRow, res: &HeaderResolution) -> ContactDraft {
    let tags = res
        .column(fields::TAGS)
        .and_then(|i| row.value_at(i))
        .map(split_list)
        .unwrap_or_default();

    ContactDraft {
        name: text_field(row, res, fields::NAME, &["client", "lead", "contact"], "Unnamed Contact"),
        email: text_field(row, res, fields::EMAIL, &["mail"], ""),
        phone: resolve_phone(row, res),
        tags,
        notes: text_field(row, res, fields::NOTES, &["comment", "remark"], ""),
        metadata: row.metadata(),
    }
}

pub fn normalize_listing(
    row: &ParsedRow,
    res: &HeaderResolution,
    config: &ImportConfig,
) -> ListingDraft {
    let detection = detect_listing_status(row, res);
    let price = resolve_price(row, res, config, detection.consumed_cell);

    let notes = optional_text_field(row, res, fields::NOTES, &["comment", "remark"]);

    ListingDraft {
        address: text_field(
            row,
            res,
            fields::ADDRESS,
            &["property", "street", "location"],
            "Unknown Address",
        ),
        seller_name: text_field(row, res, fields::SELLER, &["owner", "vendor"], "Unknown Seller"),
        price,
        status: detection.status,
        notes,
        metadata: row.metadata(),
    }
}

pub fn normalize_offer(
    row: &ParsedRow,
    res: &HeaderResolution,
    config: &ImportConfig,
) -> OfferDraft {
    let status = res
        .column(fields::STATUS)
        .and_then(|i| row.value_at(i))
        .and_then(bucket_offer_status)
        .unwrap_or_default();

    let price = resolve_price(row, res, config, None);

    OfferDraft {
        buyer_name: text_field(row, res, fields::BUYER, &["purchaser", "client"], "Unknown Buyer"),
        property_address: text_field(
            row,
            res,
            fields::ADDRESS,
            &["property", "listing", "street"],
            "Unknown Address",
        ),
        price,
        down_payment: explicit_currency(row, res, fields::DOWN_PAYMENT),
        earnest_money: explicit_currency(row, res, fields::EARNEST),
        financing: res
            .column(fields::FINANCING)
            .and_then(|i| row.value_at(i))
            .and_then(bucket_financing)
            .unwrap_or_default(),
        inspection_period: res
            .column(fields::INSPECTION)
            .and_then(|i| row.value_at(i))
            .and_then(parse_days)
            .unwrap_or(10),
        contingencies: res
            .column(fields::CONTINGENCIES)
            .and_then(|i| row.value_at(i))
            .map(split_list)
            .unwrap_or_default(),
        closing_date: res
            .column(fields::CLOSING)
            .and_then(|i| row.value_at(i))
            .map(normalize_date_string)
            .unwrap_or_default(),
        status,
        metadata: row.metadata(),
    }
}

pub fn normalize_task(row: &ParsedRow, res: &HeaderResolution) -> TaskDraft {
    let status = res
        .column(fields::STATUS)
        .and_then(|i| row.value_at(i))
        .map(|v| {
            let lower = v.to_lowercase();
            let done = ["done", "complete", "closed", "finished"]
                .iter()
                .any(|w| lower.contains(w));
            if done { TaskStatus::Done } else { TaskStatus::Pending }
        })
        .unwrap_or(TaskStatus::Pending);

    TaskDraft {
        title: text_field(row, res, fields::TITLE, &["task", "subject"], "Untitled Task"),
        due_date: res
            .column(fields::DUE_DATE)
            .and_then(|i| row.value_at(i))
            .map(normalize_date_string)
            .unwrap_or_default(),
        priority: res
            .column(fields::PRIORITY)
            .and_then(|i| row.value_at(i))
            .map(bucket_priority)
            .unwrap_or(TaskPriority::Medium),
        status,
        metadata: row.metadata(),
    }
}

// ---- status ------------------------------------------------------------

pub(crate) struct StatusDetection {
    pub(crate) status: ListingStatus,
    /// Cell that decided the status; the price scan must not re-read it.
    pub(crate) consumed_cell: Option<usize>,
}

/// Strict priority order:
/// 1. a settlement-date-like column holding a valid date forces Sold —
///    a recorded settlement date outranks whatever a status column says;
/// 2. an explicit status/stage/state column, bucketed by keyword;
/// 3. a whole-row scan for status keywords;
/// 4. New.
pub(crate) fn detect_listing_status(row: &ParsedRow, res: &HeaderResolution) -> StatusDetection {
    if let Some(idx) = res.column(fields::SETTLEMENT) {
        if let Some(value) = row.value_at(idx) {
            if parse_date_like(value).is_some() {
                return StatusDetection {
                    status: ListingStatus::Sold,
                    consumed_cell: Some(idx),
                };
            }
        }
    }

    if let Some(idx) = res.column(fields::STATUS) {
        if let Some(value) = row.value_at(idx) {
            if !value.trim().is_empty() {
                return StatusDetection {
                    status: bucket_listing_status(value).unwrap_or_default(),
                    consumed_cell: Some(idx),
                };
            }
        }
    }

    for (idx, cell) in row.cells.iter().enumerate() {
        if cell.is_empty() {
            continue;
        }
        let lower = cell.value.to_lowercase();
        if STATUS_KEYWORDS.iter().any(|k| lower.contains(k)) {
            return StatusDetection {
                status: bucket_listing_status(&cell.value).unwrap_or_default(),
                consumed_cell: Some(idx),
            };
        }
    }

    StatusDetection {
        status: ListingStatus::New,
        consumed_cell: None,
    }
}

pub(crate) fn bucket_listing_status(text: &str) -> Option<ListingStatus> {
    let lower = text.to_lowercase();
    let hit = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    if hit(SOLD_WORDS) {
        Some(ListingStatus::Sold)
    } else if hit(CONTRACT_WORDS) {
        Some(ListingStatus::UnderContract)
    } else if hit(ACTIVE_WORDS) {
        Some(ListingStatus::Active)
    } else if hit(NEW_WORDS) {
        Some(ListingStatus::New)
    } else {
        None
    }
}

fn bucket_offer_status(text: &str) -> Option<OfferStatus> {
    let lower = text.to_lowercase();
    let hit = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    if hit(&["accepted", "won", "agreed"]) {
        Some(OfferStatus::OfferAccepted)
    } else if hit(&["declined", "rejected", "lost", "withdrawn"]) {
        Some(OfferStatus::OfferDeclined)
    } else if hit(&["talks", "counter", "negotiat", "review"]) {
        Some(OfferStatus::InTalks)
    } else if hit(&["sent", "submitted", "presented", "delivered"]) {
        Some(OfferStatus::OfferSent)
    } else if hit(&["draft", "new", "preparing"]) {
        Some(OfferStatus::Draft)
    } else {
        None
    }
}

fn bucket_financing(text: &str) -> Option<Financing> {
    let lower = text.to_lowercase();
    if lower.contains("cash") {
        Some(Financing::Cash)
    } else if lower.contains("conv") {
        Some(Financing::Conventional)
    } else if lower.contains("fha") {
        Some(Financing::Fha)
    } else if lower.contains("va") {
        Some(Financing::Va)
    } else {
        None
    }
}

fn bucket_priority(text: &str) -> TaskPriority {
    let lower = text.to_lowercase();
    let hit = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    if hit(&["high", "urgent", "critical", "important"]) {
        TaskPriority::High
    } else if hit(&["low", "minor", "someday"]) {
        TaskPriority::Low
    } else {
        TaskPriority::Medium
    }
}

// ---- numbers -----------------------------------------------------------

/// Strip currency symbols, thousands separators and whitespace, then try
/// a float parse. Prices are clamped non-negative.
pub(crate) fn parse_currency(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let stripped = CURRENCY_STRIP_PATTERN.replace_all(trimmed, "");
    if stripped.is_empty() {
        return None;
    }

    stripped.parse::<f64>().ok().map(|v| v.max(0.0))
}

/// Two-tier price cascade: an explicitly mapped column is authoritative
/// (unparseable values become 0); with no mapped column, scan the whole
/// row for a plausible number, first within the narrow range and then the
/// wide one, skipping the status cell and anything zip-code shaped.
pub(crate) fn resolve_price(
    row: &ParsedRow,
    res: &HeaderResolution,
    config: &ImportConfig,
    status_cell: Option<usize>,
) -> f64 {
    if let Some(idx) = res.column(fields::PRICE) {
        return row.value_at(idx).and_then(parse_currency).unwrap_or(0.0);
    }

    scan_price(row, status_cell, config.narrow_price_min, config.narrow_price_max)
        .or_else(|| scan_price(row, status_cell, config.wide_price_min, config.wide_price_max))
        .unwrap_or(0.0)
}

fn scan_price(row: &ParsedRow, skip_cell: Option<usize>, min: f64, max: f64) -> Option<f64> {
    row.cells.iter().enumerate().find_map(|(idx, cell)| {
        if Some(idx) == skip_cell || cell.header.contains("zip") {
            return None;
        }
        parse_currency(&cell.value).filter(|v| (min..=max).contains(v))
    })
}

fn explicit_currency(row: &ParsedRow, res: &HeaderResolution, key: &str) -> f64 {
    res.column(key)
        .and_then(|i| row.value_at(i))
        .and_then(parse_currency)
        .unwrap_or(0.0)
}

fn parse_days(raw: &str) -> Option<u32> {
    DIGITS_PATTERN
        .find(raw)
        .and_then(|m| m.as_str().parse::<u32>().ok())
}

// ---- text --------------------------------------------------------------

/// Mapped column first, then a small set of synonym headers, then the
/// literal placeholder.
fn text_field(
    row: &ParsedRow,
    res: &HeaderResolution,
    key: &str,
    synonyms: &[&str],
    default: &str,
) -> String {
    if let Some(idx) = res.column(key) {
        if let Some(value) = row.value_at(idx) {
            if !value.trim().is_empty() {
                return value.trim().to_string();
            }
        }
    }

    if let Some((_, value)) = row.value_by_header(synonyms) {
        return value.trim().to_string();
    }

    default.to_string()
}

fn optional_text_field(
    row: &ParsedRow,
    res: &HeaderResolution,
    key: &str,
    synonyms: &[&str],
) -> Option<String> {
    let value = text_field(row, res, key, synonyms, "");
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Phone cascade: mapped column, then a header-substring scan, then a
/// whole-row scan for a token that looks like a dialable number.
fn resolve_phone(row: &ParsedRow, res: &HeaderResolution) -> String {
    if let Some(idx) = res.column(fields::PHONE) {
        if let Some(value) = row.value_at(idx) {
            if !value.trim().is_empty() {
                return value.trim().to_string();
            }
        }
    }

    if let Some((_, value)) = row.value_by_header(&["phone", "mobile", "cell"]) {
        return value.trim().to_string();
    }

    for cell in &row.cells {
        let value = cell.value.trim();
        if value.is_empty() {
            continue;
        }
        if looks_like_phone(value) {
            return value.to_string();
        }
        if let Some(token) = value.split_whitespace().find(|t| looks_like_phone(t)) {
            return token.to_string();
        }
    }

    String::new()
}

fn looks_like_phone(token: &str) -> bool {
    PHONE_TOKEN_PATTERN.is_match(token)
        && token.chars().filter(|c| c.is_ascii_digit()).count() >= 5
}

fn split_list(raw: &str) -> Vec<String> {
    let mut items: Vec<String> = Vec::new();
    for part in raw.split(',') {
        let item = part.trim();
        if item.is_empty() || items.iter().any(|existing| existing == item) {
            continue;
        }
        items.push(item.to_string());
    }
    items
}

// ---- dates -------------------------------------------------------------

/// Lenient date parser for the formats spreadsheet exports actually use.
pub(crate) fn parse_date_like(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if s.contains('T') {
        if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
            return Some(dt.date_naive());
        }
    }

    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d/%m/%Y", "%d-%m-%Y"];
    for format in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, format) {
            return Some(d);
        }
    }

    const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];
    for format in DATETIME_FORMATS {
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.date());
        }
    }

    None
}

/// ISO-normalize when the value parses as a date, otherwise keep the raw
/// text so nothing is silently dropped.
fn normalize_date_string(raw: &str) -> String {
    match parse_date_like(raw) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => raw.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::import::header_resolver::{
        resolve_fields, resolve_headers, HeaderResolution,
    };
    use crate::application::use_cases::import_schema::{contact_spec, listing_spec, offer_spec};
    use crate::domain::import::{ImportSpec, RowCell};

    fn table(spec: &ImportSpec, headers: &[&str], cells: &[&str]) -> (ParsedRow, HeaderResolution) {
        let resolved = resolve_headers(
            &headers.iter().map(|h| h.to_string()).collect::<Vec<_>>(),
        );
        let res = resolve_fields(&resolved, spec).unwrap();
        let mut row_cells: Vec<RowCell> = Vec::new();
        for (i, value) in cells.iter().enumerate() {
            let header = resolved
                .get(i)
                .cloned()
                .unwrap_or_else(|| format!("column_{}", i));
            row_cells.push(RowCell::new(header, value.to_string()));
        }
        (ParsedRow::new(0, row_cells), res)
    }

    #[test]
    fn currency_strips_symbols_and_separators() {
        assert_eq!(parse_currency("$450,000"), Some(450_000.0));
        assert_eq!(parse_currency(" 1 250 000 "), Some(1_250_000.0));
        assert_eq!(parse_currency("n/a"), None);
        assert_eq!(parse_currency(""), None);
    }

    #[test]
    fn explicit_status_column_buckets_keywords() {
        let (row, res) = table(
            &listing_spec(),
            &["Address", "Status"],
            &["1 Elm St", "Pending"],
        );
        let detection = detect_listing_status(&row, &res);
        assert_eq!(detection.status, ListingStatus::UnderContract);
        assert_eq!(detection.consumed_cell, Some(1));
    }

    #[test]
    fn sold_status_without_settlement_date() {
        let (row, res) = table(
            &listing_spec(),
            &["Address", "Status"],
            &["1 Elm St", "SOLD"],
        );
        assert_eq!(detect_listing_status(&row, &res).status, ListingStatus::Sold);
    }

    #[test]
    fn settlement_date_overrides_textual_status() {
        let (row, res) = table(
            &listing_spec(),
            &["Address", "Status", "SettleDate"],
            &["1 Elm St", "Springfield", "2023-01-15"],
        );
        assert_eq!(detect_listing_status(&row, &res).status, ListingStatus::Sold);
    }

    #[test]
    fn invalid_settlement_date_falls_through() {
        let (row, res) = table(
            &listing_spec(),
            &["Address", "Status", "SettleDate"],
            &["1 Elm St", "Active", "soon"],
        );
        assert_eq!(
            detect_listing_status(&row, &res).status,
            ListingStatus::Active
        );
    }

    #[test]
    fn keyword_scan_when_no_status_column() {
        // Leave status/settlement out of the field list so nothing is
        // mapped and the whole-row scan has to find the keyword.
        let spec = ImportSpec {
            entity: crate::domain::import::EntityKind::Listings,
            fields: listing_spec()
                .fields
                .into_iter()
                .filter(|f| f.key == "address" || f.key == "seller")
                .collect(),
        };
        let (row, res) = table(&spec, &["Address", "Owner", "Info"], &[
            "1 Elm St",
            "Doe",
            "under contract since May",
        ]);
        assert_eq!(
            detect_listing_status(&row, &res).status,
            ListingStatus::UnderContract
        );
    }

    #[test]
    fn price_uses_explicit_column_first() {
        let config = ImportConfig::default();
        let (row, res) = table(
            &listing_spec(),
            &["Address", "Price"],
            &["1 Elm St", "$450,000"],
        );
        assert_eq!(resolve_price(&row, &res, &config, None), 450_000.0);
    }

    #[test]
    fn price_scan_skips_zip_and_status_cells() {
        let config = ImportConfig::default();
        let spec = ImportSpec {
            entity: crate::domain::import::EntityKind::Listings,
            fields: listing_spec()
                .fields
                .into_iter()
                .filter(|f| f.key == "address")
                .collect(),
        };
        let (row, res) = table(&spec, &["Address", "Zip", "Col3"], &[
            "1 Elm St",
            "90210",
            "315000",
        ]);
        assert_eq!(resolve_price(&row, &res, &config, None), 315_000.0);
    }

    #[test]
    fn price_wide_range_second_pass() {
        let config = ImportConfig::default();
        let spec = ImportSpec {
            entity: crate::domain::import::EntityKind::Listings,
            fields: listing_spec()
                .fields
                .into_iter()
                .filter(|f| f.key == "address")
                .collect(),
        };
        // 2500 is below the narrow floor but inside the wide range.
        let (row, res) = table(&spec, &["Address", "Col2"], &["1 Elm St", "2500"]);
        assert_eq!(resolve_price(&row, &res, &config, None), 2500.0);
    }

    #[test]
    fn price_defaults_to_zero_when_nothing_plausible() {
        let config = ImportConfig::default();
        let spec = ImportSpec {
            entity: crate::domain::import::EntityKind::Listings,
            fields: listing_spec()
                .fields
                .into_iter()
                .filter(|f| f.key == "address")
                .collect(),
        };
        let (row, res) = table(&spec, &["Address", "Col2"], &["1 Elm St", "12"]);
        assert_eq!(resolve_price(&row, &res, &config, None), 0.0);
    }

    #[test]
    fn phone_found_in_unlabeled_column() {
        let (row, res) = table(
            &contact_spec(),
            &["Name", "Email"],
            &["Alice Johnson", "alice@x.com", "555-0199 mobile"],
        );
        let draft = normalize_contact(&row, &res);
        assert_eq!(draft.phone, "555-0199");
    }

    #[test]
    fn phone_scan_rejects_plain_words_and_short_numbers() {
        let (row, res) = table(
            &contact_spec(),
            &["Name", "Email"],
            &["Alice", "alice@x.com", "tomorrow 123"],
        );
        assert_eq!(normalize_contact(&row, &res).phone, "");
    }

    #[test]
    fn contact_name_placeholder() {
        let (row, res) = table(&contact_spec(), &["Name", "Email"], &["", "a@b.com"]);
        let draft = normalize_contact(&row, &res);
        assert_eq!(draft.name, "Unnamed Contact");
        assert!(draft.tags.is_empty());
    }

    #[test]
    fn tags_split_and_deduplicated() {
        let (row, res) = table(
            &contact_spec(),
            &["Name", "Tags"],
            &["Alice", "hot, buyer , hot,"],
        );
        assert_eq!(normalize_contact(&row, &res).tags, vec!["hot", "buyer"]);
    }

    #[test]
    fn metadata_carries_every_source_column() {
        let (row, res) = table(
            &listing_spec(),
            &["Address", "Mystery", "Price"],
            &["1 Elm St", "whatever", "450000"],
        );
        let draft = normalize_listing(&row, &res, &ImportConfig::default());
        assert!(draft.metadata.contains_key("address"));
        assert!(draft.metadata.contains_key("mystery"));
        assert!(draft.metadata.contains_key("price"));
    }

    #[test]
    fn offer_fields_normalize() {
        let (row, res) = table(
            &offer_spec(),
            &["Buyer", "Property", "Amount", "Financing", "Closing", "Status"],
            &["B. Wayne", "1 Elm St", "$300,000", "FHA loan", "01/15/2023", "submitted"],
        );
        let draft = normalize_offer(&row, &res, &ImportConfig::default());
        assert_eq!(draft.buyer_name, "B. Wayne");
        assert_eq!(draft.price, 300_000.0);
        assert_eq!(draft.financing, Financing::Fha);
        assert_eq!(draft.closing_date, "2023-01-15");
        assert_eq!(draft.status, OfferStatus::OfferSent);
        assert_eq!(draft.inspection_period, 10);
    }

    #[test]
    fn date_parser_accepts_common_formats() {
        assert!(parse_date_like("2023-01-15").is_some());
        assert!(parse_date_like("01/15/2023").is_some());
        assert!(parse_date_like("15-01-2023").is_some());
        assert!(parse_date_like("2023-01-15 13:45").is_some());
        assert!(parse_date_like("Springfield").is_none());
        assert!(parse_date_like("450000").is_none());
    }
}
