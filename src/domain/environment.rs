use std::{fmt, sync::OnceLock};

use regex::Regex;
use serde::Serialize;

use super::DomainError;

/// Node names the namespace layout claims under every key path. An
/// environment with one of these names would address the layout node itself.
const RESERVED_NAMES: [&str; 2] = ["config", "value"];

static ENVIRONMENT_PATTERN: OnceLock<Regex> = OnceLock::new();

fn environment_pattern() -> &'static Regex {
    ENVIRONMENT_PATTERN.get_or_init(|| {
        #[allow(clippy::expect_used)]
        Regex::new(r"^[a-zA-Z0-9\-_.]{3,}$").expect("environment pattern compiles")
    })
}

/// A deployment environment, used as a per-environment override scope.
///
/// An override defined for an environment takes precedence over the
/// configuration's global value for consumers reading in that environment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Environment(String);

impl Environment {
    /// Creates an environment after validating its name.
    ///
    /// # Errors
    /// Returns `DomainError::InvalidEnvironment` if the name is shorter than
    /// three characters, contains anything outside `[a-zA-Z0-9-_.]`, or is
    /// one of the reserved node names `config` and `value`.
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::InvalidEnvironment {
                name,
                reason: "must be non-empty".to_string(),
            });
        }
        if name.len() < 3 {
            return Err(DomainError::InvalidEnvironment {
                name,
                reason: "must contain at least 3 characters".to_string(),
            });
        }
        if !environment_pattern().is_match(&name) {
            return Err(DomainError::InvalidEnvironment {
                name,
                reason: "allowed characters are alphanumerics, '-', '_' and '.'".to_string(),
            });
        }
        if RESERVED_NAMES.contains(&name.as_str()) {
            return Err(DomainError::InvalidEnvironment {
                name,
                reason: "is a reserved node name".to_string(),
            });
        }
        Ok(Self(name))
    }

    /// The environment name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
