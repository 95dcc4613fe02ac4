//! Secure credential handling using the secrecy crate
//!
//! MongoDB connection strings routinely embed a password, so the URI is held
//! as a [`SecretString`]. Memory is zeroed when the secret is dropped and the
//! value never appears in `Debug` output.
//!
//! # Example
//!
//! ```rust
//! use docmodel::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let uri = secret_string("mongodb://user:pw@localhost:27017".to_string());
//! assert!(uri.expose_secret().starts_with("mongodb://"));
//!
//! // Debug output is redacted
//! assert!(!format!("{uri:?}").contains("pw@"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// Newtype wrapper for String that implements the required traits for Secret
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl SecretValue {
    /// Check if the secret value is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check if the secret value starts with a prefix
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }
}

impl Serialize for SecretValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// Type alias for a secret string
pub type SecretString = Secret<SecretValue>;

/// Wrap a String as a [`SecretString`]
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_secret_string_creation() {
        let secret = secret_string("mongodb://localhost".to_string());
        assert_eq!(secret.expose_secret(), "mongodb://localhost");
        assert!(secret.expose_secret().starts_with("mongodb://"));
    }

    #[test]
    fn test_secret_debug_redacted() {
        let secret = secret_string("mongodb://admin:hunter2@db".to_string());
        let debug_output = format!("{secret:?}");

        assert!(!debug_output.contains("hunter2"));
        assert!(debug_output.contains("REDACTED") || debug_output.contains("Secret"));
    }

    #[test]
    fn test_secret_from_toml() {
        #[derive(Serialize, Deserialize)]
        struct Section {
            uri: SecretString,
        }

        let parsed: Section = toml::from_str("uri = \"mongodb://db:27017\"").unwrap();
        assert_eq!(parsed.uri.expose_secret(), "mongodb://db:27017");
        assert!(!parsed.uri.expose_secret().is_empty());
    }
}
