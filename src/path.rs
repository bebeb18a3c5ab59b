//! Namespace path mapping.
//!
//! Pure translation between domain identifiers and coordination-store paths:
//! no I/O happens here. A configuration key maps to one path (dots become
//! path separators) and an environment maps to a single segment; both can
//! then be anchored under a parent path without double-anchoring.

use std::{fmt, sync::OnceLock};

use regex::Regex;

use crate::domain::{ConfigurationKey, DomainError, Environment};

#[cfg(test)]
mod tests;

static PATH_PATTERN: OnceLock<Regex> = OnceLock::new();

fn path_pattern() -> &'static Regex {
    PATH_PATTERN.get_or_init(|| {
        #[allow(clippy::expect_used)]
        Regex::new(r"^(/[a-zA-Z0-9]+)+$").expect("path pattern compiles")
    })
}

/// A validated coordination-store path: `/`-separated alphanumeric segments.
///
/// The segment alphabet is stricter than a configuration key's (no dots),
/// which is why keys are transliterated into paths rather than embedded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodePath(String);

impl NodePath {
    /// Creates a path after validating its shape.
    ///
    /// # Errors
    /// Returns `DomainError::InvalidPath` if the path is empty, not rooted,
    /// has empty segments, a trailing separator, or non-alphanumeric
    /// characters in any segment.
    pub fn new(path: impl Into<String>) -> Result<Self, DomainError> {
        let path = path.into();
        if path.trim().is_empty() {
            return Err(DomainError::InvalidPath {
                path,
                reason: "must be non-empty".to_string(),
            });
        }
        if !path_pattern().is_match(&path) {
            return Err(DomainError::InvalidPath {
                path,
                reason: "must be one or more /-separated alphanumeric segments".to_string(),
            });
        }
        Ok(Self(path))
    }

    /// Maps a configuration key to its namespace path, one level per
    /// key segment.
    pub fn from_key(key: &ConfigurationKey) -> Self {
        // Key segments are alphanumeric by construction, so the
        // transliterated path always satisfies the path shape.
        Self(format!(
            "/{}",
            key.as_str().replace(ConfigurationKey::SEPARATOR, "/")
        ))
    }

    /// Maps an environment to a single-segment path.
    ///
    /// # Errors
    /// Returns `DomainError::InvalidPath` if the environment name contains
    /// characters outside the path alphabet (`-`, `_` and `.` are legal in
    /// environment names but not in paths).
    pub fn from_environment(environment: &Environment) -> Result<Self, DomainError> {
        Self::new(format!("/{}", environment.name()))
    }

    /// Anchors this path under `parent`.
    ///
    /// A no-op when the path already starts with `parent`, so the same
    /// relative literal can be re-anchored repeatedly without doubling up.
    pub fn anchored_under(&self, parent: &NodePath) -> NodePath {
        // Segment-aware prefix check: /vane2/x is not anchored under /vane.
        let already_anchored = self.0 == parent.0
            || (self.0.starts_with(&parent.0) && self.0.as_bytes().get(parent.0.len()) == Some(&b'/'));
        if already_anchored {
            return self.clone();
        }
        Self(format!("{}{}", parent.0, self.0))
    }

    /// The path's segments, in order.
    pub fn segments(&self) -> Vec<&str> {
        self.0.split('/').filter(|item| !item.is_empty()).collect()
    }

    /// The path as a string, e.g. `/app/log/level`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
