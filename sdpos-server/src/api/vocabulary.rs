//! Translation between dashboard terms and partner terms.

use time::macros::format_description;
use time::{Date, OffsetDateTime, format_description::well_known::Rfc3339};

use super::ApiError;

/// Dashboard status filter → partner status.
pub fn partner_status(dashboard: &str) -> Option<&'static str> {
    match dashboard {
        "success" => Some("CAPTURED"),
        "failed" => Some("FAILED"),
        "pending" => Some("AUTHORIZED"),
        "refunded" => Some("REFUNDED"),
        _ => None,
    }
}

/// Dashboard payment method → partner payment mode. Methods the partner does
/// not support (cash, other) become `None`.
pub fn partner_payment_mode(dashboard: &str) -> Option<&'static str> {
    match dashboard {
        "card" => Some("CARD"),
        "upi" => Some("UPI"),
        "nfc" => Some("NFC"),
        _ => None,
    }
}

/// Start of a dashboard range: a `YYYY-MM-DD` date means midnight UTC; an
/// RFC 3339 instant is taken as-is.
pub fn range_start(input: &str) -> Result<OffsetDateTime, ApiError> {
    if let Ok(date) = parse_date(input) {
        return Ok(date.midnight().assume_utc());
    }
    parse_instant(input)
}

/// End of a dashboard range: a `YYYY-MM-DD` date means the last millisecond
/// of that day in UTC; an RFC 3339 instant is taken as-is.
pub fn range_end(input: &str) -> Result<OffsetDateTime, ApiError> {
    if let Ok(date) = parse_date(input) {
        return date
            .with_hms_milli(23, 59, 59, 999)
            .map(|dt| dt.assume_utc())
            .map_err(|e| ApiError::BadRequest(e.to_string()));
    }
    parse_instant(input)
}

fn parse_date(input: &str) -> Result<Date, time::error::Parse> {
    Date::parse(input, format_description!("[year]-[month]-[day]"))
}

fn parse_instant(input: &str) -> Result<OffsetDateTime, ApiError> {
    OffsetDateTime::parse(input, &Rfc3339)
        .map_err(|_| ApiError::BadRequest(format!("invalid date: {input}")))
}
