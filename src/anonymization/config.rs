//! Anonymization configuration

use crate::domain::{AnonymizerError, Result};
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, Ipv6Addr};

/// Optional extensions to the built-in anonymization rules
///
/// Every list extends the built-in defaults; nothing here can remove a
/// built-in entry. The random source is not configuration and is supplied
/// through `Anonymizer::with_rng` or `Anonymizer::with_seed` instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnonymizerConfig {
    /// Additional IPv4 addresses that are never redacted
    pub ipv4_allow_list: Vec<Ipv4Addr>,

    /// Additional IPv6 addresses that are never redacted
    pub ipv6_allow_list: Vec<Ipv6Addr>,

    /// Additional key substrings marking a value as a secret
    pub password_field_deny_list: Vec<String>,
}

impl AnonymizerConfig {
    /// Parse and validate a TOML configuration
    ///
    /// ```
    /// use task_anonymizer::anonymization::AnonymizerConfig;
    ///
    /// let config = AnonymizerConfig::from_toml(r#"
    ///     ipv4_allow_list = ["203.0.114.10"]
    ///     password_field_deny_list = ["vault_pass"]
    /// "#).unwrap();
    /// assert_eq!(config.password_field_deny_list, vec!["vault_pass"]);
    /// ```
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        for entry in &self.password_field_deny_list {
            if entry.is_empty() {
                return Err(AnonymizerError::Configuration(
                    "password_field_deny_list entries must not be empty".to_string(),
                ));
            }
            if entry.chars().any(char::is_whitespace) {
                return Err(AnonymizerError::Configuration(format!(
                    "password_field_deny_list entry '{entry}' must not contain whitespace"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_empty_and_valid() {
        let config = AnonymizerConfig::default();
        assert!(config.ipv4_allow_list.is_empty());
        assert!(config.ipv6_allow_list.is_empty());
        assert!(config.password_field_deny_list.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = AnonymizerConfig::from_toml("").unwrap();
        assert_eq!(config, AnonymizerConfig::default());
    }

    #[test]
    fn test_addresses_are_typed() {
        let config = AnonymizerConfig::from_toml(
            r#"
            ipv4_allow_list = ["203.0.114.10"]
            ipv6_allow_list = ["2a00:1450:4001::1"]
            "#,
        )
        .unwrap();

        assert_eq!(config.ipv4_allow_list, vec![Ipv4Addr::new(203, 0, 114, 10)]);
        assert_eq!(
            config.ipv6_allow_list,
            vec!["2a00:1450:4001::1".parse::<Ipv6Addr>().unwrap()]
        );
    }

    #[test]
    fn test_invalid_address_is_rejected() {
        let err = AnonymizerConfig::from_toml(r#"ipv4_allow_list = ["300.1.1.1"]"#).unwrap_err();
        assert!(matches!(err, AnonymizerError::Configuration(_)));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let err = AnonymizerConfig::from_toml("random_source = 42").unwrap_err();
        assert!(matches!(err, AnonymizerError::Configuration(_)));
    }

    #[test]
    fn test_whitespace_entry_is_rejected() {
        let config = AnonymizerConfig {
            password_field_deny_list: vec!["vault pass".to_string()],
            ..Default::default()
        };

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("vault pass"));
    }

    #[test]
    fn test_empty_entry_is_rejected() {
        let config = AnonymizerConfig {
            password_field_deny_list: vec![String::new()],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
