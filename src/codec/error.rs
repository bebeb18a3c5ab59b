use thiserror::Error;

use crate::domain::ValueKind;

/// Faults at the bytes-to-records boundary.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodecError {
    /// A record could not be serialized.
    #[error("failed to encode {record}: {details}")]
    Encode {
        /// Record shape being encoded ("configuration" or "entry").
        record: &'static str,
        /// Serializer error details.
        details: String,
    },

    /// The bytes do not describe a valid record.
    #[error("malformed {record} payload: {details}")]
    Malformed {
        /// Record shape being decoded ("configuration" or "entry").
        record: &'static str,
        /// What was wrong with the payload.
        details: String,
    },

    /// The carried value cannot be read as the directed kind.
    #[error("value {actual} cannot be decoded as {expected}")]
    KindMismatch {
        /// Kind the decode was directed to.
        expected: ValueKind,
        /// The JSON value actually present.
        actual: serde_json::Value,
    },
}
