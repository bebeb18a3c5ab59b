//! Domain types for configuration distribution.
//!
//! Everything here is a validated value type: constructors reject malformed
//! input with [`DomainError`] and the remaining code can rely on the
//! invariants (keys are well-formed, a configuration's default is always one
//! of its variants).

mod configuration;
mod entry;
mod environment;
mod error;
mod key;
mod value;

#[cfg(test)]
mod tests;

pub use configuration::Configuration;
pub use entry::ConfigurationEntry;
pub use environment::Environment;
pub use error::DomainError;
pub use key::ConfigurationKey;
pub use value::{ConfigValue, ValueKind};
