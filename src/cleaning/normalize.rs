//! Per-field normalization rules.
//!
//! Every function here is pure and total: malformed input degrades to `None`, never to an error.
//! Counting of degraded values is left to the caller ([`super::CleaningEngine`]).

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

use crate::types::{OrderStatus, RawValue};

/// Status spellings seen in the wild, mapped to the canonical vocabulary.
const STATUS_SYNONYMS: &[(&str, OrderStatus)] = &[
    ("payed", OrderStatus::Paid),
    ("paid", OrderStatus::Paid),
    ("done", OrderStatus::Paid),
    ("completed", OrderStatus::Paid),
    ("success", OrderStatus::Paid),
    ("waiting", OrderStatus::Pending),
    ("in progress", OrderStatus::Pending),
    ("in_progress", OrderStatus::Pending),
    ("pending", OrderStatus::Pending),
    ("canceled", OrderStatus::Cancelled),
    ("cancelled", OrderStatus::Cancelled),
    ("return", OrderStatus::Refunded),
    ("refunded", OrderStatus::Refunded),
];

static THOUSANDS_GROUPED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d{1,3}(,\d{3})+$").expect("valid grouping regex"));

const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
];

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S%.f",
    "%d/%m/%Y %H:%M",
    "%d.%m.%Y %H:%M:%S%.f",
    "%d.%m.%Y %H:%M",
    "%d-%b-%Y %H:%M:%S%.f",
    "%d-%b-%Y %H:%M",
];

// Month-first before day-first: "01/02/2024" is January 2nd.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%d.%m.%Y",
    "%d-%b-%Y",
    "%d-%B-%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
    "%Y%m%d",
];

/// Normalize a raw header: trim, lower-case, whitespace runs to `_`, drop anything outside
/// `[0-9a-zA-Z_]`.
pub fn normalize_column_name(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut in_whitespace = false;
    for ch in lowered.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                out.push('_');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if ch.is_ascii_alphanumeric() || ch == '_' {
            out.push(ch);
        }
    }
    out
}

/// Result of trimming one text cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trimmed {
    /// Trimmed value, `None` when missing or blank.
    pub value: Option<String>,
    /// Whether trimming changed a non-null value.
    pub changed: bool,
}

/// Trim a text cell. Missing and blank values become `None`.
pub fn trim_text(raw: &RawValue) -> Trimmed {
    let Some(text) = raw.to_text() else {
        return Trimmed {
            value: None,
            changed: false,
        };
    };
    let stripped = text.trim();
    let changed = stripped.len() != text.len();
    let value = (!stripped.is_empty()).then(|| stripped.to_string());
    Trimmed { value, changed }
}

/// Lower-case an email; values without `@` become `None`.
///
/// This is a presence check only; shape validation happens in [`crate::validation`].
pub fn normalize_email(value: Option<&str>) -> Option<String> {
    let lowered = value?.to_lowercase();
    lowered.contains('@').then_some(lowered)
}

/// Parse a currency amount from any of the supported representations.
///
/// Returns `None` for missing, empty and unparsable values.
pub fn parse_amount(raw: &RawValue) -> Option<f64> {
    match raw {
        RawValue::Null | RawValue::Bool(_) | RawValue::Timestamp(_) => None,
        RawValue::Int(i) => Some(*i as f64),
        RawValue::Float(f) => f.is_finite().then_some(*f),
        RawValue::Text(s) => parse_amount_str(s),
    }
}

/// Parse a textual amount such as `$1,234.56`, `1 234,56` or `1,234`.
pub fn parse_amount_str(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let sanitized: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect();

    let normalized = match (sanitized.rfind(','), sanitized.rfind('.')) {
        (Some(_), None) if THOUSANDS_GROUPED.is_match(&sanitized) => sanitized.replace(',', ""),
        (Some(_), None) => sanitized.replace(',', "."),
        (Some(comma), Some(dot)) if comma > dot => sanitized.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => sanitized.replace(',', ""),
        (None, _) => sanitized,
    };

    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Map a free-text status onto the canonical vocabulary; unknown values become `None`.
pub fn normalize_status(value: Option<&str>) -> Option<OrderStatus> {
    let key = value?.trim().to_lowercase();
    STATUS_SYNONYMS
        .iter()
        .find(|(synonym, _)| *synonym == key)
        .map(|(_, status)| *status)
}

/// Parse a timestamp cell. Native date-time cells pass through; numbers are not dates.
pub fn parse_timestamp(raw: &RawValue) -> Option<NaiveDateTime> {
    match raw {
        RawValue::Timestamp(ts) => Some(*ts),
        RawValue::Text(s) => parse_timestamp_str(s),
        RawValue::Null | RawValue::Int(_) | RawValue::Float(_) | RawValue::Bool(_) => None,
    }
}

/// Permissive absolute-timestamp parser. Offsets are converted to UTC.
pub fn parse_timestamp_str(raw: &str) -> Option<NaiveDateTime> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    for fmt in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(value, fmt) {
            return Some(dt.naive_utc());
        }
    }

    let naive = value
        .strip_suffix('Z')
        .or_else(|| value.strip_suffix(" UTC"))
        .unwrap_or(value);
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(naive, fmt) {
            return Some(d.and_time(NaiveTime::MIN));
        }
    }

    None
}
