//! Built-in string format checkers
//!
//! Copyright (c) 2025 xAPI Tools Team
//! Licensed under the Apache-2.0 license

use chrono::{DateTime, NaiveDate};
use regex::Regex;
use std::sync::OnceLock;
use url::Url;
use uuid::Uuid;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static DURATION_RE: OnceLock<Regex> = OnceLock::new();
static HEX_RE: OnceLock<Regex> = OnceLock::new();
static MIMETYPE_RE: OnceLock<Regex> = OnceLock::new();
static LANGTAG_RE: OnceLock<Regex> = OnceLock::new();

fn cached(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("built-in format pattern compiles"))
}

/// Absolute IRI with a scheme
pub fn is_uri(value: &str) -> bool {
    Url::parse(value).is_ok()
}

/// E-mail address, bare or as a `mailto:` IRI
pub fn is_email(value: &str) -> bool {
    let email_re = cached(
        &EMAIL_RE,
        r"^(mailto:)?[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$",
    );
    email_re.is_match(value)
}

/// Hyphenated UUID
pub fn is_uuid(value: &str) -> bool {
    value.len() == 36 && Uuid::parse_str(value).is_ok()
}

/// Full date, `YYYY-MM-DD`
pub fn is_date(value: &str) -> bool {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

/// RFC 3339 timestamp
pub fn is_date_time(value: &str) -> bool {
    DateTime::parse_from_rfc3339(value).is_ok()
}

/// ISO 8601 duration such as `PT1H30M` or `P3W`
pub fn is_duration(value: &str) -> bool {
    let duration_re = cached(
        &DURATION_RE,
        r"^P(\d+(\.\d+)?Y)?(\d+(\.\d+)?M)?(\d+(\.\d+)?W)?(\d+(\.\d+)?D)?(T(\d+(\.\d+)?H)?(\d+(\.\d+)?M)?(\d+(\.\d+)?S)?)?$",
    );
    // "P" and "PT" alone carry no designator
    value.len() > 1 && !value.ends_with('T') && duration_re.is_match(value)
}

fn is_hex(value: &str) -> bool {
    cached(&HEX_RE, "^[0-9a-fA-F]+$").is_match(value)
}

/// SHA-1 hex digest
pub fn is_sha1(value: &str) -> bool {
    value.len() == 40 && is_hex(value)
}

/// SHA-2 hex digest (SHA-224, SHA-256, SHA-384 or SHA-512)
pub fn is_sha2(value: &str) -> bool {
    matches!(value.len(), 56 | 64 | 96 | 128) && is_hex(value)
}

/// Internet media type, e.g. `text/plain; charset=utf-8`
pub fn is_mimetype(value: &str) -> bool {
    let mimetype_re = cached(
        &MIMETYPE_RE,
        r"^[A-Za-z0-9][A-Za-z0-9!#$&^_.+-]{0,126}/[A-Za-z0-9][A-Za-z0-9!#$&^_.+-]{0,126}(\s*;.*)?$",
    );
    mimetype_re.is_match(value)
}

/// RFC 5646 language tag shape
pub fn is_langtag(value: &str) -> bool {
    cached(&LANGTAG_RE, "^[A-Za-z]{1,8}(-[A-Za-z0-9]{1,8})*$").is_match(value)
}
