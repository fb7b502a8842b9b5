//! Credential handling for the registry connection string
//!
//! The connection string embeds the database password, so it is held in a
//! `secrecy::Secret` that zeroizes on drop and redacts itself in `Debug`.
//! Call `expose_secret()` only at the point the driver needs the value.
//!
//! # Example
//!
//! ```rust
//! use registry_audit::config::{redact_connection_string, secret_string};
//! use secrecy::ExposeSecret;
//!
//! let conn = secret_string("postgresql://svc:hunter2@db:5432/registry".to_string());
//! assert_eq!(redact_connection_string(&conn), "postgresql://***@db:5432/registry");
//! assert!(!format!("{conn:?}").contains("hunter2"));
//! assert!(conn.expose_secret().as_str().contains("hunter2"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, ExposeSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// String payload stored inside a [`SecretString`]
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl SecretValue {
    /// Borrow the raw value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check if the secret value is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check if the secret value starts with a prefix
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }
}

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

impl Serialize for SecretValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// Zeroizing, debug-redacted string secret
pub type SecretString = Secret<SecretValue>;

/// Wraps a plain string as a [`SecretString`]
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

/// Connection string with the user-info part replaced by `***`
///
/// Safe to log. Strings without credentials are returned unchanged.
pub fn redact_connection_string(secret: &SecretString) -> String {
    let raw = secret.expose_secret().as_str();
    let (scheme, rest) = match raw.split_once("://") {
        Some(parts) => parts,
        None => return "***".to_string(),
    };
    match rest.rsplit_once('@') {
        Some((_, host)) => format!("{scheme}://***@{host}"),
        None => raw.to_string(),
    }
}
