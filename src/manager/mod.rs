//! Definition and value administration.
//!
//! [`ConfigurationManager`] owns the write side of the namespace layout:
//! storing a definition (`<key-path>/config` plus the seeded
//! `<key-path>/value`), pointing the current value at another declared
//! variant globally or per environment, and deleting a configuration's whole
//! subtree. Every multi-round-trip operation runs under the key's lock.

mod error;

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::{
    client::CoordinationClient,
    codec::Codec,
    domain::{Configuration, ConfigurationEntry, ConfigurationKey, Environment},
    locks::KeyLockRegistry,
    path::NodePath,
};

pub use error::ManagerError;

/// Name of the node holding a configuration's immutable definition.
/// Reserved: [`Environment`] rejects it as an environment name.
pub const CONFIG_NODE: &str = "config";
/// Name of the node holding a configuration's current global value.
/// Reserved: [`Environment`] rejects it as an environment name.
pub const VALUE_NODE: &str = "value";

/// What `store` does when the definition already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorePolicy {
    /// Reject a second `store` for the same key. Definitions are immutable,
    /// so this is the default.
    #[default]
    CreateOnce,
    /// Overwrite the definition; the value node is seeded with the default
    /// only when no value node exists yet.
    Upsert,
}

/// Write-side operations on stored configurations.
pub struct ConfigurationManager {
    client: CoordinationClient,
    codec: Arc<dyn Codec>,
    locks: KeyLockRegistry,
    policy: StorePolicy,
}

impl ConfigurationManager {
    /// Creates a manager with the default [`StorePolicy::CreateOnce`].
    pub fn new(client: CoordinationClient, codec: Arc<dyn Codec>) -> Self {
        Self::with_policy(client, codec, StorePolicy::default())
    }

    /// Creates a manager with an explicit store policy.
    pub fn with_policy(
        client: CoordinationClient,
        codec: Arc<dyn Codec>,
        policy: StorePolicy,
    ) -> Self {
        Self {
            client,
            codec,
            locks: KeyLockRegistry::new(),
            policy,
        }
    }

    /// The lock registry guarding this manager's operations.
    ///
    /// Pass a clone to
    /// [`ValueProvider::with_locks`](crate::provider::ValueProvider::with_locks)
    /// so reads on a key serialize against writes on the same key.
    pub fn locks(&self) -> &KeyLockRegistry {
        &self.locks
    }

    /// Stores a configuration definition and seeds its value node with the
    /// default variant.
    ///
    /// # Errors
    /// `ManagerError::AlreadyExists` if the definition exists and the policy
    /// is `CreateOnce`; `ManagerError::Client`/`Codec` on store or encoding
    /// faults.
    #[instrument(skip(self, configuration), fields(key = %configuration.key()))]
    pub fn store(&self, configuration: &Configuration) -> Result<(), ManagerError> {
        let key = configuration.key().clone();
        self.locks.with_lock(&key, || {
            let key_path = NodePath::from_key(&key);
            let config_path = relative(CONFIG_NODE).anchored_under(&key_path);

            if self.client.exists(&config_path)?.is_some() {
                return match self.policy {
                    StorePolicy::CreateOnce => Err(ManagerError::AlreadyExists(key.clone())),
                    StorePolicy::Upsert => self.overwrite(configuration, &key_path, &config_path),
                };
            }

            let definition = self.codec.encode_configuration(configuration)?;
            let default = self.codec.encode_entry(configuration.default_variant())?;
            let root = self.client.create_path(&key_path, &[])?;
            // Definition first: a reader that can see the value node can
            // already decode the definition it belongs to.
            self.client
                .create_path(&relative(CONFIG_NODE).anchored_under(&root), &definition)?;
            self.client
                .create_path(&relative(VALUE_NODE).anchored_under(&root), &default)?;
            debug!("configuration stored");
            Ok(())
        })
    }

    /// Points the configuration's global value at `entry`.
    ///
    /// # Errors
    /// `ManagerError::NotFound` if no definition is stored for `key`;
    /// `ManagerError::InvalidVariant` if `entry` is not one of the declared
    /// variants; `ManagerError::Client`/`Codec` on store or codec faults.
    #[instrument(skip(self, entry), fields(variant = entry.name()))]
    pub fn define_value(
        &self,
        key: &ConfigurationKey,
        entry: &ConfigurationEntry,
    ) -> Result<(), ManagerError> {
        self.locks.with_lock(key, || {
            let key_path = NodePath::from_key(key);
            self.validate_entry(key, &key_path, entry)?;
            let data = self.codec.encode_entry(entry)?;
            self.client
                .update(&relative(VALUE_NODE).anchored_under(&key_path), &data)?;
            debug!("global value defined");
            Ok(())
        })
    }

    /// Points the configuration's value for `environment` at `entry`,
    /// creating the environment's node on first override.
    ///
    /// # Errors
    /// As [`define_value`](Self::define_value); additionally
    /// `ManagerError::Domain` if the environment name cannot be addressed
    /// as a namespace path.
    #[instrument(skip(self, entry), fields(variant = entry.name()))]
    pub fn define_value_for(
        &self,
        key: &ConfigurationKey,
        environment: &Environment,
        entry: &ConfigurationEntry,
    ) -> Result<(), ManagerError> {
        self.locks.with_lock(key, || {
            let key_path = NodePath::from_key(key);
            self.validate_entry(key, &key_path, entry)?;
            let target = NodePath::from_environment(environment)?.anchored_under(&key_path);
            let data = self.codec.encode_entry(entry)?;
            if self.client.exists(&target)?.is_none() {
                self.client.create_path(&target, &data)?;
            } else {
                self.client.update(&target, &data)?;
            }
            debug!("environment value defined");
            Ok(())
        })
    }

    /// Deletes the configuration's definition, value and every environment
    /// override. A no-op for an unknown key; an active subscription on the
    /// deleted value observes a change to empty content.
    ///
    /// # Errors
    /// `ManagerError::Client` on store faults.
    #[instrument(skip(self))]
    pub fn delete(&self, key: &ConfigurationKey) -> Result<(), ManagerError> {
        self.locks.with_lock(key, || {
            self.client.delete_recursive(&NodePath::from_key(key))?;
            debug!("configuration deleted");
            Ok(())
        })
    }

    fn overwrite(
        &self,
        configuration: &Configuration,
        key_path: &NodePath,
        config_path: &NodePath,
    ) -> Result<(), ManagerError> {
        let definition = self.codec.encode_configuration(configuration)?;
        self.client.update(config_path, &definition)?;
        let value_path = relative(VALUE_NODE).anchored_under(key_path);
        if self.client.exists(&value_path)?.is_none() {
            let default = self.codec.encode_entry(configuration.default_variant())?;
            self.client.create_path(&value_path, &default)?;
        }
        debug!("configuration overwritten");
        Ok(())
    }

    /// Re-reads the stored definition and checks `entry` against its
    /// declared variants. Definitions are immutable, so this is a pure
    /// validation read.
    fn validate_entry(
        &self,
        key: &ConfigurationKey,
        key_path: &NodePath,
        entry: &ConfigurationEntry,
    ) -> Result<(), ManagerError> {
        let content = self
            .client
            .get_content(&relative(CONFIG_NODE).anchored_under(key_path))?;
        let configuration = self
            .codec
            .decode_configuration(&content)?
            .ok_or_else(|| ManagerError::NotFound(key.clone()))?;
        if !configuration.is_variant(entry) {
            return Err(ManagerError::InvalidVariant {
                key: key.clone(),
                variant: entry.name().to_string(),
            });
        }
        Ok(())
    }
}

/// A relative layout node (`config`, `value`) as an anchorable path.
pub(crate) fn relative(node: &str) -> NodePath {
    #[allow(clippy::expect_used)]
    NodePath::new(format!("/{node}")).expect("layout node names are valid path segments")
}
