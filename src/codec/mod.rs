//! Record encoding at the namespace boundary.
//!
//! Configuration definitions and entries are stored as bytes; [`Codec`] is
//! the pluggable bytes-to-records boundary and [`JsonCodec`] the default
//! implementation. Decoding empty bytes yields `None` (an absent node reads
//! as empty bytes, never as a fault), and entry values are decoded as the
//! [`ValueKind`](crate::domain::ValueKind) the caller directs.

mod error;
mod json;


use crate::domain::{Configuration, ConfigurationEntry, ValueKind};

pub use error::CodecError;
pub use json::JsonCodec;

/// Codec for the two persisted record shapes.
pub trait Codec: Send + Sync {
    /// Encodes a configuration definition.
    ///
    /// # Errors
    /// `CodecError::Encode` if the definition cannot be serialized.
    fn encode_configuration(&self, configuration: &Configuration) -> Result<Vec<u8>, CodecError>;

    /// Encodes a configuration entry.
    ///
    /// # Errors
    /// `CodecError::Encode` if the entry cannot be serialized.
    fn encode_entry(&self, entry: &ConfigurationEntry) -> Result<Vec<u8>, CodecError>;

    /// Decodes a configuration definition; empty bytes decode to `None`.
    ///
    /// The payload is self-describing: the definition records its own value
    /// kind, so no kind token is needed to read it back.
    ///
    /// # Errors
    /// `CodecError::Malformed` if the bytes are not a valid definition.
    fn decode_configuration(&self, data: &[u8]) -> Result<Option<Configuration>, CodecError>;

    /// Decodes a configuration entry as `kind`; empty bytes decode to
    /// `None`.
    ///
    /// # Errors
    /// `CodecError::Malformed` if the bytes are not a valid entry,
    /// `CodecError::KindMismatch` if the carried value cannot be read as
    /// `kind`.
    fn decode_entry(
        &self,
        data: &[u8],
        kind: ValueKind,
    ) -> Result<Option<ConfigurationEntry>, CodecError>;
}
