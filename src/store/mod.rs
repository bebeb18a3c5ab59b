//! Coordination-store boundary.
//!
//! The crate does not talk to a concrete coordination service; it talks to
//! [`CoordinationStore`], a hierarchical namespace with versioned writes and
//! one-shot change watches. [`MemoryStore`] is a complete in-process
//! implementation used for embedding and testing.

mod memory;

#[cfg(test)]
mod tests;

use thiserror::Error;

pub use memory::MemoryStore;

/// Version token of a namespace node, required for guarded writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeStat {
    /// Write counter of the node; bumped on every data update.
    pub version: i32,
}

/// A change notification delivered to a one-shot watch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEvent {
    /// Path the watch was registered on.
    pub path: String,
    /// What happened.
    pub kind: WatchEventKind,
}

/// The kinds of notification a watch can receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchEventKind {
    /// The node was created.
    Created,
    /// The node's payload changed.
    DataChanged,
    /// The node was deleted.
    Deleted,
    /// The connection to the store was re-established; notifications may
    /// have been lost while it was down.
    ConnectionRestored,
}

/// Callback invoked at most once per watch registration.
pub type WatchCallback = Box<dyn FnOnce(WatchEvent) + Send + 'static>;

/// Faults surfaced by a coordination store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Create refused because the node already exists.
    #[error("node '{0}' already exists")]
    NodeExists(String),

    /// The addressed node (or a required parent) does not exist.
    #[error("node '{0}' does not exist")]
    NoNode(String),

    /// A guarded write carried a stale version token.
    #[error("stale version {version} for node '{path}'")]
    BadVersion {
        /// Path of the contended node.
        path: String,
        /// The stale version the caller presented.
        version: i32,
    },

    /// Delete refused because the node still has children.
    #[error("node '{0}' still has children")]
    NotEmpty(String),

    /// The connection to the store was lost mid-operation.
    #[error("connection lost: {0}")]
    ConnectionLoss(String),
}

/// The coordination-store collaborator: a hierarchical namespace offering
/// atomic node operations and one-shot change watches.
///
/// All operations are synchronous; implementations block the caller for the
/// round-trip. Watch callbacks are delivered sequentially on a dispatch
/// thread owned by the implementation, at most once per registration;
/// continued observation requires re-registration.
pub trait CoordinationStore: Send + Sync {
    /// Creates `path` with `data`. The parent must already exist.
    ///
    /// # Errors
    /// `StoreError::NodeExists` if the node is present,
    /// `StoreError::NoNode` if its parent is not.
    fn create(&self, path: &str, data: &[u8]) -> Result<(), StoreError>;

    /// Returns the node's version token, or `None` if it does not exist.
    ///
    /// # Errors
    /// Store faults only; absence is not an error.
    fn exists(&self, path: &str) -> Result<Option<NodeStat>, StoreError>;

    /// Reads the node's payload.
    ///
    /// # Errors
    /// `StoreError::NoNode` if the node does not exist.
    fn get_data(&self, path: &str) -> Result<Vec<u8>, StoreError>;

    /// Replaces the node's payload, guarded by `version`.
    ///
    /// # Errors
    /// `StoreError::NoNode` if the node does not exist,
    /// `StoreError::BadVersion` if `version` is stale.
    fn set_data(&self, path: &str, data: &[u8], version: i32) -> Result<(), StoreError>;

    /// Deletes the node, guarded by `version`.
    ///
    /// # Errors
    /// `StoreError::NoNode` if the node does not exist,
    /// `StoreError::BadVersion` if `version` is stale,
    /// `StoreError::NotEmpty` if the node still has children.
    fn delete(&self, path: &str, version: i32) -> Result<(), StoreError>;

    /// Names of the node's direct children.
    ///
    /// # Errors
    /// `StoreError::NoNode` if the node does not exist.
    fn children(&self, path: &str) -> Result<Vec<String>, StoreError>;

    /// Registers a one-shot watch on `path` and returns the node's version
    /// token at registration time. `None` means the node does not exist
    /// yet; the watch still arms and fires on creation.
    ///
    /// # Errors
    /// Store faults only.
    fn watch(&self, path: &str, callback: WatchCallback) -> Result<Option<NodeStat>, StoreError>;
}
