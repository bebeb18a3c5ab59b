//! Read side: value resolution and change subscriptions.
//!
//! [`ValueProvider`] resolves the current value of a configuration
//! (environment override, then global value, then the declared default) and
//! arms watches that keep delivering changes through a [`ValueChangeListener`]
//! or a [`futures::Stream`] of [`ValueChange`] records until the returned
//! [`Subscription`] is dropped or cancelled.

mod changes;
mod error;
mod watch;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, instrument};

use crate::{
    client::CoordinationClient,
    codec::Codec,
    domain::{ConfigValue, ConfigurationEntry, ConfigurationKey, Environment, ValueKind},
    locks::KeyLockRegistry,
    manager::{CONFIG_NODE, VALUE_NODE, relative},
    path::NodePath,
};

pub use changes::{ValueChange, ValueChangeListener, ValueChanges};
pub use error::ProviderError;
pub use watch::Subscription;

use watch::ValueWatcher;

/// Read-side access to stored configuration values.
pub struct ValueProvider {
    client: CoordinationClient,
    codec: Arc<dyn Codec>,
    locks: KeyLockRegistry,
}

impl ValueProvider {
    /// Creates a provider over `client`, decoding records with `codec`.
    ///
    /// The provider gets its own lock registry, so reads do not serialize
    /// against any [`ConfigurationManager`](crate::manager::ConfigurationManager)'s
    /// writes. When a manager runs in the same process, prefer
    /// [`with_locks`](Self::with_locks) with the manager's registry.
    pub fn new(client: CoordinationClient, codec: Arc<dyn Codec>) -> Self {
        Self::with_locks(client, codec, KeyLockRegistry::new())
    }

    /// Creates a provider sharing `locks` with other components, so reads
    /// on a key serialize against writes guarded by the same registry.
    pub fn with_locks(
        client: CoordinationClient,
        codec: Arc<dyn Codec>,
        locks: KeyLockRegistry,
    ) -> Self {
        Self {
            client,
            codec,
            locks,
        }
    }

    /// Resolves the current value for `key`.
    ///
    /// With an environment, that environment's override wins when present;
    /// otherwise the global value applies. A stored entry without a value of
    /// its own resolves to the default variant's value. Returns `Ok(None)`
    /// when no configuration is stored for the key, or when resolution ends
    /// at a default variant that carries no value.
    ///
    /// # Errors
    /// `ProviderError::Client` on store faults, `ProviderError::Codec` when
    /// a stored record cannot be decoded, `ProviderError::Domain` when the
    /// environment name cannot be addressed in the namespace.
    #[instrument(skip(self))]
    pub fn get_value(
        &self,
        key: &ConfigurationKey,
        environment: Option<&Environment>,
    ) -> Result<Option<ConfigValue>, ProviderError> {
        self.locks.with_lock(key, || {
            let key_path = NodePath::from_key(key);
            let content = self
                .client
                .get_content(&relative(CONFIG_NODE).anchored_under(&key_path))?;
            let Some(configuration) = self.codec.decode_configuration(&content)? else {
                debug!("no configuration stored");
                return Ok(None);
            };

            let entry = self.current_entry(&key_path, environment, configuration.value_kind())?;
            if let Some(entry) = entry
                && let Some(value) = entry.value()
            {
                return Ok(Some(value.clone()));
            }
            Ok(configuration.default_variant().value().cloned())
        })
    }

    /// Arms a watch on the value for `key` (the environment's override node
    /// when an environment is given, the global value node otherwise) and
    /// delivers every observed change to `listener`.
    ///
    /// Entries are decoded as `kind`; the watch may be armed before the
    /// configuration itself is stored, which is why the kind is explicit
    /// here. Deletion of the watched node is delivered as a change to an
    /// absent entry, and the watch stays armed on the same path. Dropping
    /// the returned [`Subscription`] cancels the watch; call
    /// [`Subscription::detach`] to let it outlive the handle.
    ///
    /// # Errors
    /// `ProviderError::Client` if the baseline read or watch registration
    /// fails, `ProviderError::Domain` for an unaddressable environment name.
    #[instrument(skip(self, listener))]
    pub fn subscribe_to_value_change(
        &self,
        key: &ConfigurationKey,
        environment: Option<&Environment>,
        kind: ValueKind,
        listener: impl ValueChangeListener,
    ) -> Result<Subscription, ProviderError> {
        let path = self.watch_path(key, environment)?;
        let watcher = ValueWatcher::start(
            self.client.clone(),
            Arc::clone(&self.codec),
            key.clone(),
            kind,
            path,
            Box::new(listener),
        )?;
        Ok(Subscription::new(watcher))
    }

    /// Like [`subscribe_to_value_change`](Self::subscribe_to_value_change)
    /// but returns the changes as a [`futures::Stream`]. Dropping the stream
    /// cancels the underlying watch.
    ///
    /// # Errors
    /// As [`subscribe_to_value_change`](Self::subscribe_to_value_change).
    pub fn value_changes(
        &self,
        key: &ConfigurationKey,
        environment: Option<&Environment>,
        kind: ValueKind,
    ) -> Result<ValueChanges, ProviderError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let subscription =
            self.subscribe_to_value_change(key, environment, kind, move |change: ValueChange| {
                // A dropped stream also cancels the watch; a send after the
                // receiver is gone is harmless.
                let _ = tx.send(change);
            })?;
        Ok(ValueChanges::new(subscription, rx))
    }

    /// The stored entry the resolution currently points at, if any.
    fn current_entry(
        &self,
        key_path: &NodePath,
        environment: Option<&Environment>,
        kind: ValueKind,
    ) -> Result<Option<ConfigurationEntry>, ProviderError> {
        if let Some(environment) = environment {
            let path = NodePath::from_environment(environment)?.anchored_under(key_path);
            let content = self.client.get_content(&path)?;
            if let Some(entry) = self.codec.decode_entry(&content, kind)? {
                return Ok(Some(entry));
            }
        }
        let content = self
            .client
            .get_content(&relative(VALUE_NODE).anchored_under(key_path))?;
        Ok(self.codec.decode_entry(&content, kind)?)
    }

    fn watch_path(
        &self,
        key: &ConfigurationKey,
        environment: Option<&Environment>,
    ) -> Result<NodePath, ProviderError> {
        let key_path = NodePath::from_key(key);
        Ok(match environment {
            Some(environment) => {
                NodePath::from_environment(environment)?.anchored_under(&key_path)
            }
            None => relative(VALUE_NODE).anchored_under(&key_path),
        })
    }
}
