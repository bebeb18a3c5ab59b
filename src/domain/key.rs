use std::{fmt, sync::OnceLock};

use regex::Regex;
use serde::Serialize;

use super::DomainError;

static KEY_PATTERN: OnceLock<Regex> = OnceLock::new();

fn key_pattern() -> &'static Regex {
    KEY_PATTERN.get_or_init(|| {
        #[allow(clippy::expect_used)]
        Regex::new(r"^[a-zA-Z0-9]+(\.[a-zA-Z0-9]+)*$").expect("key pattern compiles")
    })
}

/// Identifier of a configuration: dot-separated alphanumeric segments.
///
/// Keys are immutable and compared by value. The segment sequence doubles as
/// the configuration's location in the coordination namespace (each segment
/// becomes one path level).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ConfigurationKey(String);

impl ConfigurationKey {
    /// Segment separator within a key.
    pub const SEPARATOR: char = '.';

    /// Creates a key after validating its shape.
    ///
    /// # Errors
    /// Returns `DomainError::InvalidKey` if the key is empty or contains
    /// anything other than dot-separated alphanumeric segments.
    pub fn new(key: impl Into<String>) -> Result<Self, DomainError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(DomainError::InvalidKey {
                key,
                reason: "must be non-empty".to_string(),
            });
        }
        if !key_pattern().is_match(&key) {
            return Err(DomainError::InvalidKey {
                key,
                reason: "must be dot-separated alphanumeric segments".to_string(),
            });
        }
        Ok(Self(key))
    }

    /// The key as entered, e.g. `"app.log.level"`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The ordered path segments of the key.
    pub fn segments(&self) -> Vec<&str> {
        self.0.split(Self::SEPARATOR).collect()
    }
}

impl fmt::Display for ConfigurationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
