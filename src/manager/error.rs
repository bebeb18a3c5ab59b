use thiserror::Error;

use crate::{
    client::ClientError,
    codec::CodecError,
    domain::{ConfigurationKey, DomainError},
};

/// Errors from write-side configuration operations.
#[derive(Error, Debug)]
pub enum ManagerError {
    /// No definition is stored for the key.
    #[error("no configuration stored for key '{0}'")]
    NotFound(ConfigurationKey),

    /// A definition is already stored for the key.
    #[error("configuration '{0}' already exists")]
    AlreadyExists(ConfigurationKey),

    /// The entry is not one of the configuration's declared variants.
    #[error("entry '{variant}' is not a declared variant of configuration '{key}'")]
    InvalidVariant {
        /// Key of the configuration being updated.
        key: ConfigurationKey,
        /// Name of the rejected entry.
        variant: String,
    },

    /// A coordination store round trip failed.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// A persisted record could not be encoded or decoded.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// A domain value could not be addressed in the namespace.
    #[error(transparent)]
    Domain(#[from] DomainError),
}
