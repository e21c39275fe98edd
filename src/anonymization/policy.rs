//! Field policy
//!
//! Decides what happens to a single scalar given the key it lives under.
//! The policy is an ordered table of `(guard, transform)` entries; the first
//! entry whose guard matches produces the result and later entries are not
//! consulted. Reordering [`RULES`] changes behaviour.

use crate::anonymization::anonymizer::{remove_email, NetworkPolicy};
use crate::anonymization::config::AnonymizerConfig;
use crate::anonymization::detector::{
    is_date, is_email_address, is_filesystem_path, is_ip_address, is_likely_password,
    is_password_field_name, is_templating_expression,
};
use crate::domain::Scalar;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Replacement for secrets
///
/// It is itself a templating expression, so a second pass leaves it alone.
pub const SECRET_PLACEHOLDER: &str = "{{}}";

/// Rule of the field policy, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    /// Empty strings and non-string scalars
    Inert,
    /// `{{ ... }}` and `{% ... %}` values
    Templating,
    /// Whole-value IPv4 or IPv6 address
    IpAddress,
    /// Email address anywhere in the value
    Email,
    /// Filesystem path under a password-named key
    PathUnderSecretKey,
    /// Date under a password-named key
    DateUnderSecretKey,
    /// Likely password under a password-named key
    Secret,
}

impl Rule {
    /// Every rule in the order the policy consults them
    pub const ORDER: [Rule; 7] = [
        Rule::Inert,
        Rule::Templating,
        Rule::IpAddress,
        Rule::Email,
        Rule::PathUnderSecretKey,
        Rule::DateUnderSecretKey,
        Rule::Secret,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Rule::Inert => "inert",
            Rule::Templating => "templating",
            Rule::IpAddress => "ip_address",
            Rule::Email => "email",
            Rule::PathUnderSecretKey => "path_under_secret_key",
            Rule::DateUnderSecretKey => "date_under_secret_key",
            Rule::Secret => "secret",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Guard deciding whether a rule applies to `(value, key_name)`
pub type Guard = fn(&FieldPolicy, &str, &str) -> bool;

/// Transform producing the replacement for a value
pub type Transform = fn(&FieldPolicy, &str, &mut dyn RngCore) -> String;

/// One row of the policy table
#[derive(Clone, Copy)]
pub struct RuleEntry {
    pub rule: Rule,
    pub guard: Guard,
    pub transform: Transform,
}

impl fmt::Debug for RuleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleEntry").field("rule", &self.rule).finish()
    }
}

/// The policy table for string scalars, in precedence order
pub const RULES: [RuleEntry; 7] = [
    RuleEntry {
        rule: Rule::Inert,
        guard: guard_empty,
        transform: keep,
    },
    RuleEntry {
        rule: Rule::Templating,
        guard: guard_templating,
        transform: keep,
    },
    RuleEntry {
        rule: Rule::IpAddress,
        guard: guard_ip_address,
        transform: redact_address,
    },
    RuleEntry {
        rule: Rule::Email,
        guard: guard_email,
        transform: replace_emails,
    },
    RuleEntry {
        rule: Rule::PathUnderSecretKey,
        guard: guard_path_under_secret_key,
        transform: keep,
    },
    RuleEntry {
        rule: Rule::DateUnderSecretKey,
        guard: guard_date_under_secret_key,
        transform: keep,
    },
    RuleEntry {
        rule: Rule::Secret,
        guard: guard_secret,
        transform: placeholder,
    },
];

fn guard_empty(_: &FieldPolicy, value: &str, _: &str) -> bool {
    value.is_empty()
}

fn guard_templating(_: &FieldPolicy, value: &str, _: &str) -> bool {
    is_templating_expression(value)
}

fn guard_ip_address(_: &FieldPolicy, value: &str, _: &str) -> bool {
    is_ip_address(value)
}

fn guard_email(_: &FieldPolicy, value: &str, _: &str) -> bool {
    is_email_address(value)
}

fn guard_path_under_secret_key(policy: &FieldPolicy, value: &str, key_name: &str) -> bool {
    policy.is_password_field(key_name) && is_filesystem_path(value)
}

fn guard_date_under_secret_key(policy: &FieldPolicy, value: &str, key_name: &str) -> bool {
    policy.is_password_field(key_name) && is_date(value)
}

fn guard_secret(policy: &FieldPolicy, value: &str, key_name: &str) -> bool {
    policy.is_password_field(key_name) && is_likely_password(value)
}

fn keep(_: &FieldPolicy, value: &str, _: &mut dyn RngCore) -> String {
    value.to_string()
}

fn redact_address(policy: &FieldPolicy, value: &str, _: &mut dyn RngCore) -> String {
    policy.network.redact_ip(value)
}

fn replace_emails(_: &FieldPolicy, value: &str, rng: &mut dyn RngCore) -> String {
    remove_email(value, rng)
}

fn placeholder(_: &FieldPolicy, _: &str, _: &mut dyn RngCore) -> String {
    SECRET_PLACEHOLDER.to_string()
}

/// Result of evaluating the policy on one scalar
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// Rule that fired, `None` on fallthrough
    pub rule: Option<Rule>,
    /// Replacement scalar
    pub value: Scalar,
}

/// Composes classifiers and redactors into the per-scalar policy
#[derive(Debug, Clone, Default)]
pub struct FieldPolicy {
    network: NetworkPolicy,
    extra_password_fields: Vec<String>,
}

impl FieldPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extend the built-in allow-lists and deny-list with `config`
    pub fn from_config(config: &AnonymizerConfig) -> Self {
        Self {
            network: NetworkPolicy::with_allowed(
                config.ipv4_allow_list.iter().copied(),
                config.ipv6_allow_list.iter().copied(),
            ),
            extra_password_fields: config
                .password_field_deny_list
                .iter()
                .map(|entry| entry.to_lowercase())
                .collect(),
        }
    }

    pub fn network(&self) -> &NetworkPolicy {
        &self.network
    }

    /// Built-in deny-list check, extended by configured entries
    pub fn is_password_field(&self, key_name: &str) -> bool {
        if is_password_field_name(key_name) {
            return true;
        }
        let key_name = key_name.to_lowercase();
        self.extra_password_fields
            .iter()
            .any(|entry| key_name.contains(entry.as_str()))
    }

    /// Run the rule table on `scalar` living under `key_name`
    pub fn evaluate(&self, scalar: &Scalar, key_name: &str, rng: &mut dyn RngCore) -> Outcome {
        let Some(value) = scalar.as_str() else {
            tracing::trace!(rule = Rule::Inert.label(), key = key_name, "Rule fired");
            return Outcome {
                rule: Some(Rule::Inert),
                value: scalar.clone(),
            };
        };

        for entry in &RULES {
            if (entry.guard)(self, value, key_name) {
                tracing::trace!(rule = entry.rule.label(), key = key_name, "Rule fired");
                return Outcome {
                    rule: Some(entry.rule),
                    value: Scalar::String((entry.transform)(self, value, rng)),
                };
            }
        }

        Outcome {
            rule: None,
            value: scalar.clone(),
        }
    }

    /// Replacement for `scalar` living under `key_name`
    pub fn anonymize_scalar(&self, scalar: &Scalar, key_name: &str, rng: &mut dyn RngCore) -> Scalar {
        self.evaluate(scalar, key_name, rng).value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Number;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn evaluate(value: &str, key_name: &str) -> Outcome {
        let mut rng = StdRng::seed_from_u64(0);
        FieldPolicy::new().evaluate(&Scalar::from(value), key_name, &mut rng)
    }

    fn string(outcome: &Outcome) -> &str {
        outcome.value.as_str().unwrap()
    }

    #[test]
    fn test_table_follows_rule_order() {
        let table: Vec<Rule> = RULES.iter().map(|entry| entry.rule).collect();
        assert_eq!(table, Rule::ORDER.to_vec());

        let mut sorted = Rule::ORDER.to_vec();
        sorted.sort();
        assert_eq!(sorted, Rule::ORDER.to_vec());
    }

    #[test]
    fn test_non_string_scalars_are_inert() {
        let mut rng = StdRng::seed_from_u64(0);
        let policy = FieldPolicy::new();

        for scalar in [
            Scalar::Null,
            Scalar::Bool(true),
            Scalar::Number(Number::PosInt(8080)),
            Scalar::Number(Number::Float(1.5)),
        ] {
            let outcome = policy.evaluate(&scalar, "password", &mut rng);
            assert_eq!(outcome.rule, Some(Rule::Inert));
            assert_eq!(outcome.value, scalar);
        }
    }

    #[test]
    fn test_empty_secret_is_kept() {
        let outcome = evaluate("", "password");
        assert_eq!(outcome.rule, Some(Rule::Inert));
        assert_eq!(string(&outcome), "");
    }

    #[test]
    fn test_templating_wins_under_secret_key() {
        let outcome = evaluate("{{ vault_db_password }}", "db_password");
        assert_eq!(outcome.rule, Some(Rule::Templating));
        assert_eq!(string(&outcome), "{{ vault_db_password }}");
    }

    #[test]
    fn test_ip_address_is_redacted() {
        let outcome = evaluate("81.2.69.142", "host");
        assert_eq!(outcome.rule, Some(Rule::IpAddress));
        assert_eq!(string(&outcome), "81.2.69.1");
    }

    #[test]
    fn test_email_wins_over_secret() {
        let outcome = evaluate("foo@montreal.ca", "password");
        assert_eq!(outcome.rule, Some(Rule::Email));
        assert!(string(&outcome).ends_with("@example.com"));
    }

    #[test]
    fn test_path_under_secret_key_is_kept() {
        let outcome = evaluate("certificates/CA.key", "key_name");
        assert_eq!(outcome.rule, Some(Rule::PathUnderSecretKey));
        assert_eq!(string(&outcome), "certificates/CA.key");
    }

    #[test]
    fn test_absolute_path_with_spaces_under_secret_key_is_kept() {
        for path in ["/etc/ssl/private/my cert.key", "~/My Documents/id_rsa"] {
            let outcome = evaluate(path, "key_name");
            assert_eq!(outcome.rule, Some(Rule::PathUnderSecretKey), "{path}");
            assert_eq!(string(&outcome), path);
        }
    }

    #[test]
    fn test_date_under_secret_key_is_kept() {
        let outcome = evaluate("2023-06-01T12:30:00Z", "token_expiry");
        assert_eq!(outcome.rule, Some(Rule::DateUnderSecretKey));
        assert_eq!(string(&outcome), "2023-06-01T12:30:00Z");
    }

    #[test]
    fn test_basic_format_date_under_secret_key_is_kept() {
        for date in ["20230601", "20230601T123000Z"] {
            let outcome = evaluate(date, "password_expiry");
            assert_eq!(outcome.rule, Some(Rule::DateUnderSecretKey), "{date}");
            assert_eq!(string(&outcome), date);
        }
    }

    #[test]
    fn test_secret_is_replaced_by_placeholder() {
        let outcome = evaluate("@This-should-disapear!", "password");
        assert_eq!(outcome.rule, Some(Rule::Secret));
        assert_eq!(string(&outcome), SECRET_PLACEHOLDER);
        assert!(is_templating_expression(SECRET_PLACEHOLDER));
    }

    #[test]
    fn test_weak_secret_falls_through() {
        let outcome = evaluate("yes", "password");
        assert_eq!(outcome.rule, None);
        assert_eq!(string(&outcome), "yes");
    }

    #[test]
    fn test_strong_value_under_plain_key_falls_through() {
        let outcome = evaluate("@This-should-disapear!", "description");
        assert_eq!(outcome.rule, None);
    }

    #[test]
    fn test_configured_deny_list_entry() {
        let config = AnonymizerConfig {
            password_field_deny_list: vec!["Bind_Credential".to_string()],
            ..Default::default()
        };
        let policy = FieldPolicy::from_config(&config);
        let mut rng = StdRng::seed_from_u64(0);

        assert!(policy.is_password_field("ldap_bind_credential"));
        assert!(policy.is_password_field("password"));
        assert!(!FieldPolicy::new().is_password_field("ldap_bind_credential"));

        let outcome = policy.evaluate(&Scalar::from("Xk9#vT2q"), "LDAP_BIND_CREDENTIAL", &mut rng);
        assert_eq!(outcome.rule, Some(Rule::Secret));
    }

    #[test]
    fn test_configured_allow_list_entry() {
        let config = AnonymizerConfig {
            ipv4_allow_list: vec!["81.2.69.142".parse().unwrap()],
            ..Default::default()
        };
        let policy = FieldPolicy::from_config(&config);
        let mut rng = StdRng::seed_from_u64(0);

        let outcome = policy.evaluate(&Scalar::from("81.2.69.142"), "host", &mut rng);
        assert_eq!(outcome.rule, Some(Rule::IpAddress));
        assert_eq!(outcome.value, Scalar::from("81.2.69.142"));
    }

    #[test]
    fn test_rule_serializes_snake_case() {
        let json = serde_json::to_string(&Rule::PathUnderSecretKey).unwrap();
        assert_eq!(json, "\"path_under_secret_key\"");
        assert_eq!(Rule::Secret.to_string(), "secret");
    }
}
