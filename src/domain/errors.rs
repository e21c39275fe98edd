//! Domain error types
//!
//! This module defines the error hierarchy for the anonymizer.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main anonymizer error type
///
/// Classifiers and redactors never fail for normal inputs. Errors only come
/// from the edges: parsing foreign documents, emitting YAML, and loading
/// configuration.
#[derive(Debug, Error)]
pub enum AnonymizerError {
    /// A text document in a batch could not be parsed
    ///
    /// The batch stops at the offending document; `index` is its position in
    /// the input slice.
    #[error("Malformed document at index {index}: {reason}")]
    MalformedDocument { index: usize, reason: String },

    /// A node is not a mapping, sequence, or recognized scalar
    #[error("Invalid input at {path}: {reason}")]
    InvalidInput { path: String, reason: String },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AnonymizerError {
    /// Creates an `InvalidInput` error for the node at `path`
    pub fn invalid_input(path: impl Into<String>, reason: impl Into<String>) -> Self {
        AnonymizerError::InvalidInput {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Returns the batch index of a `MalformedDocument` error
    pub fn batch_index(&self) -> Option<usize> {
        match self {
            AnonymizerError::MalformedDocument { index, .. } => Some(*index),
            _ => None,
        }
    }
}

// Conversion from serde_yml errors (emission only; parse errors carry a batch index)
impl From<serde_yml::Error> for AnonymizerError {
    fn from(err: serde_yml::Error) -> Self {
        AnonymizerError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for AnonymizerError {
    fn from(err: toml::de::Error) -> Self {
        AnonymizerError::Configuration(format!("TOML parse error: {err}"))
    }
}
