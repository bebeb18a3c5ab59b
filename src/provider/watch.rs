use std::{
    panic::{self, AssertUnwindSafe},
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
    time::SystemTime,
};

use tracing::{debug, error, warn};

use crate::{
    client::{ClientError, CoordinationClient},
    codec::{Codec, CodecError},
    domain::{ConfigurationEntry, ConfigurationKey, ValueKind},
    path::NodePath,
    store::WatchEvent,
};

use super::changes::{ValueChange, ValueChangeListener};

/// Baseline held between watch firings.
///
/// The transition is pure: the driver re-reads the node and folds the result
/// in here, so ordering and comparison logic can be tested without a store.
#[derive(Debug)]
pub(super) struct WatchState {
    baseline: Vec<u8>,
}

/// Content pair a transition asks the driver to deliver.
#[derive(Debug, PartialEq, Eq)]
pub(super) struct Delivery {
    pub previous: Vec<u8>,
    pub current: Vec<u8>,
}

impl WatchState {
    pub(super) fn new(baseline: Vec<u8>) -> Self {
        Self { baseline }
    }

    /// Folds a re-read of the watched node into the state. The re-read
    /// always becomes the new baseline; a pair is returned only when it
    /// differs from the old one.
    ///
    /// Absent content arrives as empty bytes, so creation, data change,
    /// deletion and a post-reconnect re-read all reduce to this one
    /// comparison.
    pub(super) fn observe(&mut self, current: Vec<u8>) -> Option<Delivery> {
        if current == self.baseline {
            return None;
        }
        let previous = std::mem::replace(&mut self.baseline, current.clone());
        Some(Delivery { previous, current })
    }
}

/// Self-re-arming driver behind a [`Subscription`].
///
/// Watches are one-shot: every firing registers the next watch on the same
/// path, then re-reads the node, compares against the held baseline and
/// delivers when they differ.
pub(super) struct ValueWatcher {
    client: CoordinationClient,
    codec: Arc<dyn Codec>,
    key: ConfigurationKey,
    kind: ValueKind,
    path: NodePath,
    listener: Box<dyn ValueChangeListener>,
    state: Mutex<WatchState>,
    cancelled: AtomicBool,
}

impl ValueWatcher {
    /// Arms the first watch and reads the initial baseline.
    ///
    /// Armed first: a write landing between the two calls fires the armed
    /// watch, and the firing blocks on the state lock until the baseline is
    /// in place.
    pub(super) fn start(
        client: CoordinationClient,
        codec: Arc<dyn Codec>,
        key: ConfigurationKey,
        kind: ValueKind,
        path: NodePath,
        listener: Box<dyn ValueChangeListener>,
    ) -> Result<Arc<Self>, ClientError> {
        let watcher = Arc::new(Self {
            client,
            codec,
            key,
            kind,
            path,
            listener,
            state: Mutex::new(WatchState::new(Vec::new())),
            cancelled: AtomicBool::new(false),
        });
        {
            let mut state = watcher.lock_state();
            watcher.arm()?;
            let baseline = match watcher.client.get_content(&watcher.path) {
                Ok(content) => content,
                Err(fault) => {
                    // Discards the registration just armed on its next firing.
                    watcher.cancel();
                    return Err(fault);
                }
            };
            *state = WatchState::new(baseline);
        }
        Ok(watcher)
    }

    /// Stops the re-arm cycle. The currently armed watch fires once more
    /// and is discarded without delivery.
    pub(super) fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    fn arm(self: &Arc<Self>) -> Result<(), ClientError> {
        let watcher = Arc::clone(self);
        self.client
            .watch(&self.path, Box::new(move |event| watcher.on_event(&event)))?;
        Ok(())
    }

    fn on_event(self: &Arc<Self>, event: &WatchEvent) {
        if self.cancelled.load(Ordering::SeqCst) {
            debug!(path = %self.path, "watch cancelled, not re-arming");
            return;
        }
        let mut state = self.lock_state();
        // Re-arm before the re-read: a write landing between the two calls
        // already has a registration to fire, so it either coalesces into
        // this delivery or arrives as the next one.
        if let Err(fault) = self.arm() {
            error!(path = %self.path, error = %fault, "failed to re-arm watch, subscription is dead");
        }
        let delivery = match self.client.get_content(&self.path) {
            Ok(current) => state.observe(current),
            // The baseline is kept, so the missed read surfaces as a change
            // on the next firing.
            Err(fault) => {
                warn!(path = %self.path, error = %fault, "re-read after watch event failed");
                None
            }
        };
        drop(state);
        if let Some(delivery) = delivery {
            self.deliver(&delivery, event);
        }
    }

    fn deliver(&self, delivery: &Delivery, event: &WatchEvent) {
        let (previous, current) = match (
            self.decode(&delivery.previous),
            self.decode(&delivery.current),
        ) {
            (Ok(previous), Ok(current)) => (previous, current),
            (Err(fault), _) | (_, Err(fault)) => {
                error!(path = %self.path, error = %fault, "undecodable content on watched node");
                return;
            }
        };
        let change = ValueChange {
            key: self.key.clone(),
            previous,
            current,
            observed_at: SystemTime::now(),
        };
        debug!(path = %self.path, event = ?event.kind, "delivering value change");
        if panic::catch_unwind(AssertUnwindSafe(|| self.listener.on_change(change))).is_err() {
            error!(path = %self.path, "value change listener panicked");
        }
    }

    fn decode(&self, content: &[u8]) -> Result<Option<ConfigurationEntry>, CodecError> {
        self.codec.decode_entry(content, self.kind)
    }

    fn lock_state(&self) -> MutexGuard<'_, WatchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Handle to an armed value watch.
///
/// Dropping the handle cancels the watch; [`detach`](Self::detach) lets the
/// watch run for the life of the process instead.
pub struct Subscription {
    watcher: Arc<ValueWatcher>,
    detached: bool,
}

impl Subscription {
    pub(super) fn new(watcher: Arc<ValueWatcher>) -> Self {
        Self {
            watcher,
            detached: false,
        }
    }

    /// Cancels the watch. Changes after this point are not delivered.
    pub fn cancel(&self) {
        self.watcher.cancel();
    }

    /// Consumes the handle without cancelling; the watch keeps delivering
    /// changes until the process exits.
    pub fn detach(mut self) {
        self.detached = true;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if !self.detached {
            self.watcher.cancel();
        }
    }
}
