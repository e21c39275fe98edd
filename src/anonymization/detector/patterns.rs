//! Compiled patterns and fixed word lists used by the classifiers
//!
//! Patterns are compiled once on first use. A pattern that fails to compile
//! is a programming error, so initialisation panics instead of returning.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

/// Upper bound for the compiled size of any built-in pattern
const PATTERN_SIZE_LIMIT: usize = 1 << 20;

fn build(builder: &mut RegexBuilder) -> Regex {
    builder
        .size_limit(PATTERN_SIZE_LIMIT)
        .build()
        .unwrap_or_else(|e| panic!("built-in pattern failed to compile: {e}"))
}

/// `{{ ... }}` expressions and `{% ... %}` statements, possibly spanning lines
pub static TEMPLATING: Lazy<Regex> = Lazy::new(|| {
    build(
        RegexBuilder::new(r"\{\{.*?\}\}|\{%.*?%\}")
            .multi_line(true)
            .dot_matches_new_line(true),
    )
});

/// Email addresses anywhere in a string; `\w` is Unicode-aware so
/// non-ASCII local parts match
pub static EMAIL: Lazy<Regex> = Lazy::new(|| {
    build(RegexBuilder::new(r"[\w.+%-]+@[\w-]+(?:\.[\w-]+)*\.\w{2,}").case_insensitive(true))
});

/// Anything starting with `/` or `~`, or an ASCII relative path with at
/// least one `/` separator
pub static FILESYSTEM_PATH: Lazy<Regex> = Lazy::new(|| {
    build(&mut RegexBuilder::new(
        r"^(?:[/~]|[A-Za-z0-9_.-]+/[A-Za-z0-9_./~-]*$)",
    ))
});

/// Substrings marking a mapping key as holding a secret.
///
/// Pinned copy of the keyword deny-list used by common secret scanners,
/// plus the automation-specific `key_data`, `key_name` and `host_config_key`.
/// Matching is case-insensitive.
pub const PASSWORD_FIELD_DENY_LIST: &[&str] = &[
    "password",
    "passwd",
    "pwd",
    "secret",
    "token",
    "apikey",
    "api_key",
    "authkey",
    "auth_key",
    "private_key",
    "privkey",
    "priv_key",
    "client_key",
    "service_key",
    "account_key",
    "db_key",
    "database_key",
    "db_pass",
    "db_passwd",
    "database_pass",
    "key_pass",
    "key_data",
    "key_name",
    "host_config_key",
    "contraseña",
    "contrasena",
];

/// Datetime layouts accepted by `is_date` in addition to RFC 3339
pub const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y%m%dT%H%M%S",
];

/// ISO-8601 basic layouts carrying a `Z` or numeric offset
pub const OFFSET_DATETIME_FORMATS: &[&str] = &["%Y%m%dT%H%M%S%#z"];

/// Calendar date layouts accepted by `is_date`
pub const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y%m%d"];
