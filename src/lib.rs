// Task Anonymizer - PII anonymization for automation task documents
// Copyright (c) 2025 Task Anonymizer Contributors
// Licensed under the MIT License

//! # Task Anonymizer
//!
//! Task Anonymizer walks nested automation task documents (mappings,
//! sequences and scalars) and returns a structurally identical copy in which
//! emails, IP addresses and password-like secrets are replaced with safe
//! surrogates.
//!
//! ## Overview
//!
//! This library provides:
//! - **Classifiers** for templating expressions, paths, emails, dates, IP
//!   addresses, password-like key names and password strength
//! - **Redactors** producing surrogate emails and passwords and truncating
//!   public IP addresses to their network
//! - **A walker** applying an ordered rule table to every scalar
//! - **A batch adapter** running the walker over YAML text documents
//!
//! ## Architecture
//!
//! - [`anonymization`] - Classifiers, redactors, field policy and engine
//! - [`domain`] - Document model and error types
//! - [`logging`] - Optional `tracing` subscriber setup for host programs
//!
//! ## Quick Start
//!
//! ```rust
//! use task_anonymizer::domain::Document;
//! use serde_json::json;
//!
//! let task = Document::from(json!({
//!     "name": "foo@montreal.ca",
//!     "a_module": {"ip": ["2001:460:48::888", "192.168.1.1"], "password": "@This-should-disapear!"}
//! }));
//!
//! let anonymized = task_anonymizer::walk(&task);
//! let module = anonymized.get("a_module").unwrap();
//! assert_eq!(module.get("password").and_then(Document::as_str), Some("{{}}"));
//! assert_ne!(anonymized.get("name").and_then(Document::as_str), Some("foo@montreal.ca"));
//! ```
//!
//! ## Batch Processing
//!
//! ```rust
//! let docs = ["- name: foo@bar.com\n  password: 'admin'\n"];
//! let anonymized = task_anonymizer::anonymize_batch(&docs)?;
//! assert!(!anonymized[0].contains("foo@bar.com"));
//! # Ok::<(), task_anonymizer::domain::AnonymizerError>(())
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return [`domain::Result`] with a
//! [`domain::AnonymizerError`]:
//!
//! ```rust
//! use task_anonymizer::domain::AnonymizerError;
//!
//! let err = task_anonymizer::anonymize_batch(&["- ok\n", "key: [unclosed\n"]).unwrap_err();
//! assert!(matches!(err, AnonymizerError::MalformedDocument { index: 1, .. }));
//! ```
//!
//! ## Deterministic Output
//!
//! Email surrogates are random. Pin the random source with
//! [`Anonymizer::with_seed`] when output must be reproducible.

pub mod anonymization;
pub mod domain;
pub mod logging;

pub use anonymization::anonymizer::{
    generate_surrogate_email, generate_surrogate_password, redact_ip, redact_ipv4, redact_ipv6,
    remove_email,
};
pub use anonymization::detector::{
    is_date, is_email_address, is_filesystem_path, is_ip_address, is_ipv4_address,
    is_ipv6_address, is_likely_password, is_password_field_name, is_templating_expression,
    password_strength,
};
pub use anonymization::{Anonymizer, AnonymizerConfig};

use domain::{Document, Result, Scalar};

/// Walk `document` with the built-in rules
///
/// Shorthand for [`Anonymizer::walk`] on a default anonymizer.
pub fn walk(document: &Document) -> Document {
    Anonymizer::new().walk(document)
}

/// Walk `document` as if it lived under `key_name`
pub fn walk_with_key(document: &Document, key_name: &str) -> Document {
    Anonymizer::new().walk_with_key(document, key_name)
}

/// Replacement for one scalar living under `key_name`
pub fn anonymize_scalar(scalar: &Scalar, key_name: &str) -> Scalar {
    Anonymizer::new().anonymize_scalar(scalar, key_name)
}

/// Anonymize a batch of YAML documents with the built-in rules
///
/// See [`Anonymizer::anonymize_batch`].
pub fn anonymize_batch<S: AsRef<str>>(docs: &[S]) -> Result<Vec<String>> {
    Anonymizer::new().anonymize_batch(docs)
}

/// Anonymize one YAML document with the built-in rules
pub fn anonymize_text(doc: &str) -> Result<String> {
    Anonymizer::new().anonymize_text(doc)
}
