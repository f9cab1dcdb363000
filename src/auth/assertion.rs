//! Inputs handed over by the external SAML processing layer.
//!
//! By the time these types exist, the assertion has already been parsed and
//! its signature verified upstream. This crate only sees the decoded
//! attribute/value pairs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Mapping from assertion attribute name to the ordered local field names it
/// populates. Supplied by configuration; read-only here.
pub type AttributeMapping = HashMap<String, Vec<String>>;

/// The decoded attribute statement of a validated assertion.
///
/// Each attribute carries a non-empty ordered value sequence; the first value
/// is authoritative for single-valued local fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeBag(HashMap<String, Vec<String>>);

impl AttributeBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, attribute: &str) -> bool {
        self.0.contains_key(attribute)
    }

    /// All values of an attribute, in assertion order.
    pub fn values(&self, attribute: &str) -> Option<&[String]> {
        self.0.get(attribute).map(Vec::as_slice)
    }

    /// The authoritative (first) value of an attribute.
    pub fn first(&self, attribute: &str) -> Option<&str> {
        self.0
            .get(attribute)
            .and_then(|values| values.first())
            .map(String::as_str)
    }
}

impl From<HashMap<String, Vec<String>>> for AttributeBag {
    fn from(attributes: HashMap<String, Vec<String>>) -> Self {
        Self(attributes)
    }
}

impl<const N: usize> From<[(&str, &[&str]); N]> for AttributeBag {
    fn from(entries: [(&str, &[&str]); N]) -> Self {
        Self(
            entries
                .into_iter()
                .map(|(attr, values)| {
                    (
                        attr.to_string(),
                        values.iter().map(|v| v.to_string()).collect(),
                    )
                })
                .collect(),
        )
    }
}

/// Session payload produced by the SAML layer after a successful login.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionInfo {
    /// Decoded assertion attributes (`ava`). Absent when the upstream layer
    /// produced a session without an attribute statement.
    pub ava: Option<AttributeBag>,

    /// Entity ID of the asserting IdP, for log context.
    pub issuer: Option<String>,
}

impl SessionInfo {
    pub fn new(ava: AttributeBag) -> Self {
        Self {
            ava: Some(ava),
            issuer: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_value_is_authoritative() {
        let bag = AttributeBag::from([("uid", &["alice", "alice-alt"][..])]);

        assert_eq!(bag.first("uid"), Some("alice"));
        assert_eq!(bag.values("uid").map(<[String]>::len), Some(2));
        assert_eq!(bag.first("mail"), None);
    }

    #[test]
    fn deserializes_from_upstream_json() {
        let info: SessionInfo = serde_json::from_str(
            r#"{"ava": {"uid": ["alice"], "mail": ["alice@example.com"]}, "issuer": "https://idp.example.com"}"#,
        )
        .expect("valid session payload");

        let ava = info.ava.expect("ava present");
        assert_eq!(ava.first("mail"), Some("alice@example.com"));
        assert_eq!(info.issuer.as_deref(), Some("https://idp.example.com"));
    }
}
