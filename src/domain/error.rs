use thiserror::Error;

/// Errors raised when constructing domain values from malformed input.
///
/// These are caller bugs: none of them is transient and none should be
/// retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The configuration key does not match the expected shape.
    #[error("invalid configuration key '{key}': {reason}")]
    InvalidKey {
        /// The rejected key.
        key: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The environment name does not match the expected shape.
    #[error("invalid environment '{name}': {reason}")]
    InvalidEnvironment {
        /// The rejected environment name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The namespace path does not match the expected shape.
    #[error("invalid node path '{path}': {reason}")]
    InvalidPath {
        /// The rejected path.
        path: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A configuration entry is malformed.
    #[error("invalid configuration entry: {reason}")]
    InvalidEntry {
        /// Why the entry was rejected.
        reason: String,
    },

    /// A configuration definition is malformed.
    #[error("invalid configuration '{key}': {reason}")]
    InvalidConfiguration {
        /// Key of the rejected configuration.
        key: String,
        /// Why it was rejected.
        reason: String,
    },
}
