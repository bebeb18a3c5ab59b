use std::collections::HashMap;

use serde::Serialize;

use super::{ConfigurationEntry, ConfigurationKey, DomainError, ValueKind};

/// The immutable definition of a configuration.
///
/// A definition names the allowed variants, declares which of them is the
/// default, and fixes the value kind every variant must carry. It is written
/// once when the configuration is stored and never updated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Configuration {
    key: ConfigurationKey,
    name: String,
    value_kind: ValueKind,
    metadata: HashMap<String, String>,
    variants: Vec<ConfigurationEntry>,
    default_variant: ConfigurationEntry,
}

impl Configuration {
    /// Creates a definition.
    ///
    /// # Errors
    /// Returns `DomainError::InvalidConfiguration` if `name` is empty, if
    /// `variants` is empty, if `default_variant` is not a member of
    /// `variants`, or if any variant carries a value of a kind other than
    /// `value_kind`.
    pub fn new(
        key: ConfigurationKey,
        name: impl Into<String>,
        value_kind: ValueKind,
        metadata: HashMap<String, String>,
        variants: Vec<ConfigurationEntry>,
        default_variant: ConfigurationEntry,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        let invalid = |reason: String| DomainError::InvalidConfiguration {
            key: key.as_str().to_string(),
            reason,
        };

        if name.trim().is_empty() {
            return Err(invalid("name must be non-empty".to_string()));
        }
        if variants.is_empty() {
            return Err(invalid("variants must be non-empty".to_string()));
        }
        if !variants.contains(&default_variant) {
            return Err(invalid(format!(
                "default variant '{}' is not part of the declared variants",
                default_variant.name()
            )));
        }
        for variant in &variants {
            if let Some(value) = variant.value()
                && value.kind() != value_kind
            {
                return Err(invalid(format!(
                    "variant '{}' carries a {} value but the configuration declares {}",
                    variant.name(),
                    value.kind(),
                    value_kind
                )));
            }
        }

        Ok(Self {
            key,
            name,
            value_kind,
            metadata,
            variants,
            default_variant,
        })
    }

    /// The configuration's key.
    pub fn key(&self) -> &ConfigurationKey {
        &self.key
    }

    /// Human-readable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The kind every variant value carries.
    pub fn value_kind(&self) -> ValueKind {
        self.value_kind
    }

    /// Free-form metadata attached by the definer.
    pub fn metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }

    /// The allowed variants, in declaration order.
    pub fn variants(&self) -> &[ConfigurationEntry] {
        &self.variants
    }

    /// The variant used when no explicit value has been set for a scope.
    pub fn default_variant(&self) -> &ConfigurationEntry {
        &self.default_variant
    }

    /// Whether `entry` is one of the declared variants.
    pub fn is_variant(&self, entry: &ConfigurationEntry) -> bool {
        self.variants.contains(entry)
    }
}
