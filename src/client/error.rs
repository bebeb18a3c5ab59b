use thiserror::Error;

use crate::store::StoreError;

/// Faults from the namespace client.
///
/// Every store-layer failure collapses into `Fault` so callers only have to
/// distinguish "the store misbehaved" from the typed domain errors raised
/// higher up; the operation name and path carry enough context to decide
/// whether a retry makes sense (version conflicts usually do, after
/// re-reading).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// A coordination-store operation failed.
    #[error("{operation} failed on '{path}': {source}")]
    Fault {
        /// The client operation that was attempted.
        operation: &'static str,
        /// Absolute path the operation addressed.
        path: String,
        /// The underlying store fault.
        source: StoreError,
    },
}
