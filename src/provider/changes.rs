use std::{
    pin::Pin,
    task::{Context, Poll},
    time::SystemTime,
};

use futures::Stream;
use tokio::sync::mpsc;

use crate::domain::{ConfigValue, ConfigurationEntry, ConfigurationKey};

use super::watch::Subscription;

/// One observed change to a watched value.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueChange {
    /// Key of the configuration whose value changed.
    pub key: ConfigurationKey,
    /// Entry before the change; `None` when the previous content was absent.
    pub previous: Option<ConfigurationEntry>,
    /// Entry after the change; `None` when the node was deleted.
    pub current: Option<ConfigurationEntry>,
    /// When the watcher observed the change.
    pub observed_at: SystemTime,
}

impl ValueChange {
    /// The value carried before the change, if any.
    pub fn previous_value(&self) -> Option<&ConfigValue> {
        self.previous.as_ref().and_then(ConfigurationEntry::value)
    }

    /// The value carried after the change, if any.
    pub fn current_value(&self) -> Option<&ConfigValue> {
        self.current.as_ref().and_then(ConfigurationEntry::value)
    }
}

/// Receives changes to a watched value, one call per change in observation
/// order. Any `Fn(ValueChange)` closure implements this.
///
/// A panicking listener is isolated and logged; it never tears down the
/// watch.
pub trait ValueChangeListener: Send + Sync + 'static {
    /// Called for every observed change.
    fn on_change(&self, change: ValueChange);
}

impl<F> ValueChangeListener for F
where
    F: Fn(ValueChange) + Send + Sync + 'static,
{
    fn on_change(&self, change: ValueChange) {
        self(change);
    }
}

/// Changes to a watched value as a [`Stream`].
///
/// Dropping the stream cancels the underlying watch.
pub struct ValueChanges {
    subscription: Option<Subscription>,
    receiver: mpsc::UnboundedReceiver<ValueChange>,
}

impl ValueChanges {
    pub(super) fn new(
        subscription: Subscription,
        receiver: mpsc::UnboundedReceiver<ValueChange>,
    ) -> Self {
        Self {
            subscription: Some(subscription),
            receiver,
        }
    }

    /// Lets the underlying watch outlive the stream. Changes observed after
    /// detaching are dropped.
    pub fn detach(mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.detach();
        }
    }
}

impl Stream for ValueChanges {
    type Item = ValueChange;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}
