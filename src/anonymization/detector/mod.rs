//! Scalar classifiers
//!
//! Pure predicates used by the field policy to decide whether a value, or
//! the key it lives under, carries PII. Every classifier is independent and
//! side-effect free.

pub mod patterns;
pub mod strength;

pub use strength::{is_likely_password, password_strength, LIKELY_PASSWORD_THRESHOLD};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Returns true if the value holds a `{{ ... }}` or `{% ... %}` template
///
/// Templated values are computed at runtime and are not PII at rest.
///
/// ```
/// use task_anonymizer::is_templating_expression;
///
/// assert!(is_templating_expression("{{ ansible_user }}"));
/// assert!(is_templating_expression("{{}}"));
/// assert!(!is_templating_expression("plain value"));
/// ```
pub fn is_templating_expression(value: &str) -> bool {
    patterns::TEMPLATING.is_match(value)
}

/// Returns true if the value looks like a filesystem path
///
/// Accepts any value starting with `/` or `~`, and relative paths made of
/// ASCII word characters, dots and hyphens with at least one `/` separator.
pub fn is_filesystem_path(value: &str) -> bool {
    patterns::FILESYSTEM_PATH.is_match(value)
}

/// Returns true if an email address appears anywhere in the value
pub fn is_email_address(value: &str) -> bool {
    patterns::EMAIL.is_match(value)
}

/// Returns true if the value is an ISO-8601 date or timestamp
pub fn is_date(value: &str) -> bool {
    DateTime::parse_from_rfc3339(value).is_ok()
        || patterns::DATETIME_FORMATS
            .iter()
            .any(|format| NaiveDateTime::parse_from_str(value, format).is_ok())
        || patterns::OFFSET_DATETIME_FORMATS
            .iter()
            .any(|format| DateTime::parse_from_str(value, format).is_ok())
        || patterns::DATE_FORMATS
            .iter()
            .any(|format| NaiveDate::parse_from_str(value, format).is_ok())
}

/// Returns true if the whole value is an IPv4 or IPv6 address
pub fn is_ip_address(value: &str) -> bool {
    value.parse::<IpAddr>().is_ok()
}

/// Returns true if the whole value is an IPv4 address
pub fn is_ipv4_address(value: &str) -> bool {
    value.parse::<Ipv4Addr>().is_ok()
}

/// Returns true if the whole value is an IPv6 address
pub fn is_ipv6_address(value: &str) -> bool {
    value.parse::<Ipv6Addr>().is_ok()
}

/// Returns true if a mapping key name marks its value as a secret
///
/// This looks at the key, never the value. Matching is a case-insensitive
/// substring search over [`patterns::PASSWORD_FIELD_DENY_LIST`].
pub fn is_password_field_name(name: &str) -> bool {
    let name = name.to_lowercase();
    patterns::PASSWORD_FIELD_DENY_LIST
        .iter()
        .any(|entry| name.contains(entry))
}
