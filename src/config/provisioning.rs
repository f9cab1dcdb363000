use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::{auth::AttributeMapping, models};

/// Attribute mapping and account-creation policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProvisioningConfig {
    /// Create a local account on first login for usernames the store has
    /// never seen. When false, unknown usernames fail to resolve.
    #[serde(default = "default_true")]
    pub create_unknown_user: bool,

    /// Assertion attribute name → ordered local field names.
    ///
    /// Exactly one entry must target the `username` field; it determines
    /// which attribute the local account is keyed on.
    #[serde(default)]
    pub attribute_mapping: AttributeMapping,
}

impl Default for ProvisioningConfig {
    fn default() -> Self {
        Self {
            create_unknown_user: true,
            attribute_mapping: AttributeMapping::default(),
        }
    }
}

impl ProvisioningConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.attribute_mapping.is_empty() {
            // Empty mapping is allowed: update_user degrades to a no-op and
            // authenticate fails to resolve a username at runtime.
            return Ok(());
        }

        let username_sources: Vec<&str> = self
            .attribute_mapping
            .iter()
            .filter(|(_, fields)| fields.iter().any(|f| f == models::USERNAME_FIELD))
            .map(|(attr, _)| attr.as_str())
            .collect();

        if username_sources.len() > 1 {
            let mut sources = username_sources;
            sources.sort_unstable();
            return Err(ConfigError::Validation(format!(
                "attribute_mapping has multiple username sources ({}); exactly one entry may \
                 target the 'username' field",
                sources.join(", ")
            )));
        }

        if username_sources.is_empty() {
            return Err(ConfigError::Validation(
                "attribute_mapping has no entry targeting the 'username' field".into(),
            ));
        }

        Ok(())
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn mapping(entries: &[(&str, &[&str])]) -> AttributeMapping {
        entries
            .iter()
            .map(|(attr, fields)| {
                (
                    attr.to_string(),
                    fields.iter().map(|f| f.to_string()).collect(),
                )
            })
            .collect::<HashMap<_, _>>()
    }

    #[test]
    fn single_username_source_is_valid() {
        let config = ProvisioningConfig {
            create_unknown_user: true,
            attribute_mapping: mapping(&[
                ("uid", &["username"]),
                ("mail", &["email"]),
                ("cn", &["name", "display_name"]),
            ]),
        };

        assert!(config.validate().is_ok());
    }

    #[test]
    fn multiple_username_sources_are_rejected() {
        let config = ProvisioningConfig {
            create_unknown_user: true,
            attribute_mapping: mapping(&[("uid", &["username"]), ("mail", &["username", "email"])]),
        };

        let err = config.validate().expect_err("should be rejected");
        assert!(err.to_string().contains("multiple username sources"));
    }

    #[test]
    fn mapping_without_username_target_is_rejected() {
        let config = ProvisioningConfig {
            create_unknown_user: true,
            attribute_mapping: mapping(&[("mail", &["email"])]),
        };

        let err = config.validate().expect_err("should be rejected");
        assert!(err.to_string().contains("no entry targeting"));
    }

    #[test]
    fn empty_mapping_is_tolerated() {
        let config = ProvisioningConfig::default();
        assert!(config.validate().is_ok());
    }
}
