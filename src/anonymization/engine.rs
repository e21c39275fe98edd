//! Anonymization engine
//!
//! This module provides [`Anonymizer`], which walks documents through the
//! [`FieldPolicy`] and runs the YAML batch adapter on top of the walk.
//!
//! # Traversal
//!
//! The walk is depth-first. Mapping entries are visited in input order and
//! sequence elements left to right:
//! - **Mapping**: keys are kept as-is; each value is walked under the key's
//!   textual form
//! - **Sequence**: every element inherits the enclosing key, so a list under
//!   `password` is still treated as secret material
//! - **Scalar**: handed to the field policy
//!
//! # Examples
//!
//! ```
//! use task_anonymizer::anonymization::{Anonymizer, AnonymizerConfig};
//! use task_anonymizer::domain::Document;
//! use serde_json::json;
//!
//! let mut anonymizer = Anonymizer::with_seed(&AnonymizerConfig::default(), 7)?;
//! let task = Document::from(json!({"user": {"password": "Xk9#vT2q", "state": "present"}}));
//!
//! let anonymized = anonymizer.walk(&task);
//! assert_eq!(anonymized.shape(), task.shape());
//! let user = anonymized.get("user").unwrap();
//! assert_eq!(user.get("password").and_then(Document::as_str), Some("{{}}"));
//! assert_eq!(user.get("state").and_then(Document::as_str), Some("present"));
//! # Ok::<(), task_anonymizer::domain::AnonymizerError>(())
//! ```

use crate::anonymization::config::AnonymizerConfig;
use crate::anonymization::policy::FieldPolicy;
use crate::anonymization::report::AnonymizationReport;
use crate::domain::{AnonymizerError, Document, Result, Scalar};
use rand::rngs::{StdRng, ThreadRng};
use rand::{RngCore, SeedableRng};

/// Walker and batch adapter over a [`FieldPolicy`]
///
/// The anonymizer owns its random source. The default uses the thread-local
/// generator; tests pin it with [`Anonymizer::with_seed`] so that email
/// surrogates are reproducible.
pub struct Anonymizer<R: RngCore = ThreadRng> {
    policy: FieldPolicy,
    rng: R,
}

impl Anonymizer<ThreadRng> {
    /// Create an anonymizer with the built-in rules and the thread-local
    /// random source
    pub fn new() -> Self {
        Self::from_parts(FieldPolicy::new(), rand::thread_rng())
    }

    /// Create an anonymizer extending the built-in rules with `config`
    ///
    /// # Errors
    ///
    /// Returns [`AnonymizerError::Configuration`] if `config` fails validation.
    pub fn with_config(config: &AnonymizerConfig) -> Result<Self> {
        Self::with_rng(config, rand::thread_rng())
    }
}

impl Default for Anonymizer<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl Anonymizer<StdRng> {
    /// Create an anonymizer whose surrogates are reproducible for `seed`
    pub fn with_seed(config: &AnonymizerConfig, seed: u64) -> Result<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: RngCore> Anonymizer<R> {
    /// Create an anonymizer drawing surrogates from `rng`
    pub fn with_rng(config: &AnonymizerConfig, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(FieldPolicy::from_config(config), rng))
    }

    pub fn from_parts(policy: FieldPolicy, rng: R) -> Self {
        Self { policy, rng }
    }

    pub fn policy(&self) -> &FieldPolicy {
        &self.policy
    }

    /// Replacement for a single scalar living under `key_name`
    pub fn anonymize_scalar(&mut self, scalar: &Scalar, key_name: &str) -> Scalar {
        self.policy.anonymize_scalar(scalar, key_name, &mut self.rng)
    }

    /// Walk `document` from the root with an empty key name
    pub fn walk(&mut self, document: &Document) -> Document {
        self.walk_with_key(document, "")
    }

    /// Walk `document` as if it lived under `key_name`
    pub fn walk_with_key(&mut self, document: &Document, key_name: &str) -> Document {
        let mut report = AnonymizationReport::new();
        self.walk_node(document, key_name, &mut report)
    }

    /// Walk `document` and report which rules fired
    pub fn walk_with_report(&mut self, document: &Document) -> (Document, AnonymizationReport) {
        let mut report = AnonymizationReport::new();
        report.documents = 1;
        let walked = self.walk_node(document, "", &mut report);
        (walked, report)
    }

    fn walk_node(
        &mut self,
        node: &Document,
        key_name: &str,
        report: &mut AnonymizationReport,
    ) -> Document {
        match node {
            Document::Mapping(mapping) => {
                let mut entries = Vec::with_capacity(mapping.len());
                for (key, value) in mapping.iter() {
                    let walked = self.walk_node(value, &key.to_key_string(), report);
                    entries.push((key.clone(), walked));
                }
                Document::Mapping(entries.into_iter().collect())
            }
            Document::Sequence(items) => {
                let mut walked = Vec::with_capacity(items.len());
                for item in items {
                    walked.push(self.walk_node(item, key_name, report));
                }
                Document::Sequence(walked)
            }
            Document::Scalar(scalar) => {
                let outcome = self.policy.evaluate(scalar, key_name, &mut self.rng);
                report.record(&outcome, outcome.value != *scalar);
                Document::Scalar(outcome.value)
            }
        }
    }

    /// Anonymize a batch of YAML documents
    ///
    /// Each document is parsed, walked and serialized back. Blank documents
    /// are returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`AnonymizerError::MalformedDocument`] for the first document
    /// that fails to parse or holds an unsupported node. Results for earlier
    /// documents are discarded.
    pub fn anonymize_batch<S: AsRef<str>>(&mut self, docs: &[S]) -> Result<Vec<String>> {
        self.anonymize_batch_with_report(docs)
            .map(|(anonymized, _)| anonymized)
    }

    /// [`anonymize_batch`](Self::anonymize_batch) with a report covering every
    /// walked document
    #[tracing::instrument(skip_all, fields(documents = docs.len()))]
    pub fn anonymize_batch_with_report<S: AsRef<str>>(
        &mut self,
        docs: &[S],
    ) -> Result<(Vec<String>, AnonymizationReport)> {
        let mut report = AnonymizationReport::new();
        let mut anonymized = Vec::with_capacity(docs.len());

        for (index, doc) in docs.iter().enumerate() {
            anonymized.push(self.anonymize_document(index, doc.as_ref(), &mut report)?);
        }

        tracing::debug!(summary = %report.summary(), "Batch anonymized");
        Ok((anonymized, report))
    }

    /// Anonymize a single YAML document
    ///
    /// Behaves like a batch of one; a parse failure reports index 0.
    pub fn anonymize_text(&mut self, doc: &str) -> Result<String> {
        let mut report = AnonymizationReport::new();
        self.anonymize_document(0, doc, &mut report)
    }

    fn anonymize_document(
        &mut self,
        index: usize,
        text: &str,
        report: &mut AnonymizationReport,
    ) -> Result<String> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }

        let document = parse_document(index, text)?;
        let (walked, document_report) = self.walk_with_report(&document);
        report.merge(&document_report);

        Ok(serde_yml::to_string(&serde_yml::Value::from(walked))?)
    }
}

fn parse_document(index: usize, text: &str) -> Result<Document> {
    let malformed = |reason: String| {
        tracing::debug!(index, reason = %reason, "Malformed document");
        AnonymizerError::MalformedDocument { index, reason }
    };

    let value: serde_yml::Value =
        serde_yml::from_str(text).map_err(|e| malformed(e.to_string()))?;
    Document::try_from(value).map_err(|e| malformed(e.to_string()))
}
