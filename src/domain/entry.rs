use serde::Serialize;

use super::{ConfigValue, DomainError};

/// One named value variant a configuration may be set to.
///
/// Entries are compared by all three fields; variant-membership checks when
/// defining a value rely on that equality.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigurationEntry {
    name: String,
    value: Option<ConfigValue>,
    description: String,
}

impl ConfigurationEntry {
    /// Creates an entry.
    ///
    /// # Errors
    /// Returns `DomainError::InvalidEntry` if `name` is empty.
    pub fn new(
        name: impl Into<String>,
        value: Option<ConfigValue>,
        description: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::InvalidEntry {
                reason: "name must be non-empty".to_string(),
            });
        }
        Ok(Self {
            name,
            value,
            description: description.into(),
        })
    }

    /// The variant name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The carried value; `None` means the entry defers to the default.
    pub fn value(&self) -> Option<&ConfigValue> {
        self.value.as_ref()
    }

    /// Human-readable description of the variant.
    pub fn description(&self) -> &str {
        &self.description
    }
}
