//! Anonymization reporting
//!
//! Counts what the policy did during a walk or a batch. Reports only hold
//! counters and rule names, never original or replacement values.

use crate::anonymization::policy::{Outcome, Rule};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Statistics gathered while anonymizing one or more documents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnonymizationReport {
    /// Documents walked
    pub documents: usize,

    /// Scalars passed to the field policy
    pub scalars_visited: usize,

    /// Scalars whose replacement differs from the input
    pub values_rewritten: usize,

    /// How often each rule fired
    pub rules_fired: BTreeMap<Rule, usize>,
}

impl AnonymizationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one scalar evaluation
    pub fn record(&mut self, outcome: &Outcome, rewritten: bool) {
        self.scalars_visited += 1;
        if rewritten {
            self.values_rewritten += 1;
        }
        if let Some(rule) = outcome.rule {
            *self.rules_fired.entry(rule).or_insert(0) += 1;
        }
    }

    /// Number of times `rule` fired
    pub fn count(&self, rule: Rule) -> usize {
        self.rules_fired.get(&rule).copied().unwrap_or(0)
    }

    /// Fold another report into this one
    pub fn merge(&mut self, other: &AnonymizationReport) {
        self.documents += other.documents;
        self.scalars_visited += other.scalars_visited;
        self.values_rewritten += other.values_rewritten;
        for (rule, count) in &other.rules_fired {
            *self.rules_fired.entry(*rule).or_insert(0) += count;
        }
    }

    /// One-line human readable summary
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "{} document(s), {} scalar(s) visited, {} rewritten",
            self.documents, self.scalars_visited, self.values_rewritten
        );
        if !self.rules_fired.is_empty() {
            let rules: Vec<String> = self
                .rules_fired
                .iter()
                .map(|(rule, count)| format!("{rule}={count}"))
                .collect();
            summary.push_str(&format!(" ({})", rules.join(", ")));
        }
        summary
    }
}
