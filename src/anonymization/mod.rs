//! Anonymization of automation task documents
//!
//! Values carrying PII, secrets or network identifiers are replaced with safe
//! surrogates while the document keeps its exact shape.
//!
//! # Architecture
//!
//! The pipeline is layered leaf-first:
//! - **Detection** ([`detector`]): pure classifiers over one string
//! - **Redaction** ([`anonymizer`]): surrogate generators and IP redaction
//! - **Policy** ([`policy`]): the ordered rule table for one scalar
//! - **Engine** ([`engine`]): the document walker and the YAML batch adapter
//!
//! # Usage
//!
//! ```rust
//! use task_anonymizer::anonymization::{Anonymizer, AnonymizerConfig};
//!
//! let config = AnonymizerConfig::from_toml(r#"password_field_deny_list = ["vault_pass"]"#)?;
//! let mut anonymizer = Anonymizer::with_config(&config)?;
//! let output = anonymizer.anonymize_batch(&["- vault_pass: 'Xk9#vT2q'\n"])?;
//! assert!(output[0].contains("'{{}}'") || output[0].contains("\"{{}}\""));
//! # Ok::<(), task_anonymizer::domain::AnonymizerError>(())
//! ```

pub mod anonymizer;
pub mod config;
pub mod detector;
pub mod engine;
pub mod policy;
pub mod report;

// Re-export main types
pub use anonymizer::NetworkPolicy;
pub use config::AnonymizerConfig;
pub use engine::Anonymizer;
pub use policy::{FieldPolicy, Outcome, Rule, SECRET_PLACEHOLDER};
pub use report::AnonymizationReport;
