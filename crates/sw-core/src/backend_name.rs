//! Strongly-typed backend identifier.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

/// Identifier of an execution backend (`duckdb`, `mssql`, ...).
///
/// Always stored trimmed and lowercased, so `"DuckDB"` and `"duckdb"` name
/// the same backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct BackendName(String);

impl BackendName {
    /// Try to create a backend name, returning `None` if it is blank.
    pub fn try_new(name: impl AsRef<str>) -> Option<Self> {
        let normalized = name.as_ref().trim().to_lowercase();
        if normalized.is_empty() {
            None
        } else {
            Some(Self(normalized))
        }
    }

    /// Create a backend name, panicking in debug builds if it is blank.
    ///
    /// Prefer [`try_new`](Self::try_new) for untrusted input.
    pub fn new(name: impl AsRef<str>) -> Self {
        let normalized = name.as_ref().trim().to_lowercase();
        debug_assert!(!normalized.is_empty(), "BackendName must not be empty");
        Self(normalized)
    }

    /// Return the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for BackendName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        BackendName::try_new(&s)
            .ok_or_else(|| serde::de::Error::custom("backend name must not be empty"))
    }
}

impl fmt::Display for BackendName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Deref for BackendName {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for BackendName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for BackendName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for BackendName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for BackendName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_name_normalizes_case() {
        assert_eq!(BackendName::new(" DuckDB "), "duckdb");
        assert_eq!(BackendName::new("MSSQL"), BackendName::new("mssql"));
    }

    #[test]
    fn test_backend_name_rejects_blank() {
        assert!(BackendName::try_new("   ").is_none());
        let result: Result<BackendName, _> = serde_yaml::from_str("''");
        assert!(result.is_err());
    }

    #[test]
    fn test_backend_name_as_map_key() {
        let mut map = std::collections::HashMap::new();
        map.insert(BackendName::new("postgres"), 1);
        assert_eq!(map.get("postgres"), Some(&1));
    }
}
