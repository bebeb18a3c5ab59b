use thiserror::Error;

use crate::{client::ClientError, codec::CodecError, domain::DomainError};

/// Errors from read-side value resolution and watch registration.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// A coordination store round trip failed.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// A persisted record could not be decoded.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// A domain value could not be addressed in the namespace.
    #[error(transparent)]
    Domain(#[from] DomainError),
}
