// src/orders/format.rs

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;
use tracing::{debug, warn};

use super::types::Address;

/// Zone used when none is configured or the configured name is unknown.
pub const DEFAULT_TIME_ZONE: Tz = chrono_tz::Europe::Istanbul;

const DATE_PATTERN: &str = "%Y-%m-%d %H:%M";

/// Resolve an IANA zone name, falling back to [`DEFAULT_TIME_ZONE`].
pub fn resolve_time_zone(name: Option<&str>) -> Tz {
    match name.map(str::trim).filter(|n| !n.is_empty()) {
        None => DEFAULT_TIME_ZONE,
        Some(n) => n.parse::<Tz>().unwrap_or_else(|_| {
            warn!(zone = n, fallback = DEFAULT_TIME_ZONE.name(), "unknown time zone");
            DEFAULT_TIME_ZONE
        }),
    }
}

/// `2024-05-01T11:30:00Z` → `2024-05-01 14:30` (in `tz`).
///
/// Accepts RFC 3339 and, for offset-less timestamps, assumes UTC. Empty input
/// gives an empty string; anything unparseable is returned as-is.
pub fn format_date(iso: &str, tz: Tz) -> String {
    let iso = iso.trim();
    if iso.is_empty() {
        return String::new();
    }
    let parsed = DateTime::parse_from_rfc3339(iso)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(iso, "%Y-%m-%dT%H:%M:%S%.f").map(|n| n.and_utc())
        });
    match parsed {
        Ok(dt) => dt.with_timezone(&tz).format(DATE_PATTERN).to_string(),
        Err(e) => {
            debug!(value = iso, error = %e, "leaving unparseable timestamp as-is");
            iso.to_string()
        }
    }
}

/// First and last name separated by one space; blank parts are dropped.
pub fn full_name(first: &str, last: &str) -> String {
    [first.trim(), last.trim()]
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// `"<amount> <currency>"`, or empty if the amount is missing, zero or not a
/// decimal number, or the currency is blank. The amount is printed in shortest
/// form (`1299.00` → `1299`) without going through floating point.
pub fn format_money(amount: Option<&str>, currency: &str) -> String {
    let currency = currency.trim();
    if currency.is_empty() {
        return String::new();
    }
    match amount.and_then(shortest_decimal) {
        Some(a) => format!("{} {}", a, currency),
        None => String::new(),
    }
}

/// Canonical text of a plain decimal (`[+-]digits[.digits]`): redundant
/// leading and trailing zeros and a bare trailing `.` removed. `None` for zero
/// and for anything that is not a plain decimal.
fn shortest_decimal(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let (negative, digits) = match raw.as_bytes().first()? {
        b'-' => (true, &raw[1..]),
        b'+' => (false, &raw[1..]),
        _ => (false, raw),
    };
    let (int, frac) = digits.split_once('.').unwrap_or((digits, ""));
    if int.is_empty() && frac.is_empty() {
        return None;
    }
    if !int.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let int = int.trim_start_matches('0');
    let frac = frac.trim_end_matches('0');
    if int.is_empty() && frac.is_empty() {
        return None;
    }

    let mut out = String::with_capacity(raw.len());
    if negative {
        out.push('-');
    }
    out.push_str(if int.is_empty() { "0" } else { int });
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    Some(out)
}

/// Comma-joined address lines, skipping blanks.
pub fn format_address(address: Option<&Address>) -> String {
    let Some(address) = address else {
        return String::new();
    };
    address
        .lines()
        .into_iter()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}
