//! Conversion to the provider's date encoding (days since 1970-01-01).

use std::sync::LazyLock;

use chrono::{NaiveDate, Utc};
use regex::Regex;

use crate::error::ApiError;

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

/// Convert `YYYY-MM-DD` to days since the Unix epoch, as a decimal string.
///
/// `None` means today (UTC). Malformed or impossible dates are rejected.
pub fn date_to_days(date: Option<&str>) -> Result<String, ApiError> {
    let date = match date {
        Some(raw) => parse_date(raw)?,
        None => Utc::now().date_naive(),
    };
    Ok(days_since_epoch(date).to_string())
}

fn parse_date(raw: &str) -> Result<NaiveDate, ApiError> {
    let invalid = || ApiError::Validation(format!("date must be YYYY-MM-DD, got {raw:?}"));
    if !DATE_RE.is_match(raw) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| invalid())
}

fn days_since_epoch(date: NaiveDate) -> i64 {
    (date - NaiveDate::default()).num_days()
}
