//! Domain models and types for the anonymizer.
//!
//! The domain layer provides:
//! - **Document model** ([`Document`], [`Mapping`], [`Scalar`], [`Number`], [`Shape`])
//! - **Error types** ([`AnonymizerError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, AnonymizerError>`]:
//!
//! ```rust
//! use task_anonymizer::domain::{AnonymizerError, Document, Result};
//!
//! fn parse(text: &str) -> Result<Document> {
//!     let value: serde_yml::Value = serde_yml::from_str(text)
//!         .map_err(|e| AnonymizerError::MalformedDocument { index: 0, reason: e.to_string() })?;
//!     Document::try_from(value)
//! }
//! # assert!(parse("- name: ok\n").is_ok());
//! ```

pub mod document;
pub mod errors;
pub mod result;

pub use document::{Document, Mapping, Number, Scalar, Shape};
pub use errors::AnonymizerError;
pub use result::Result;
