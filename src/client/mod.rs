//! Low-level namespace client.
//!
//! [`CoordinationClient`] wraps the raw [`CoordinationStore`] API with the
//! conventions the rest of the crate relies on: every path is anchored under
//! a root node, path creation is idempotent and walks intermediate segments,
//! reads tolerate absence, and writes are version-guarded by a fresh
//! existence check. Every store fault is wrapped into a single
//! [`ClientError::Fault`] carrying the operation name and the path.

mod error;


use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    path::NodePath,
    store::{CoordinationStore, NodeStat, StoreError, WatchCallback},
};

pub use error::ClientError;

/// Default root node all managed paths live under.
pub const DEFAULT_ROOT: &str = "/vane";

/// Synchronous client over a coordination store, rooted at a fixed path.
///
/// Cheap to clone; clones share the underlying store handle.
#[derive(Clone)]
pub struct CoordinationClient {
    store: Arc<dyn CoordinationStore>,
    root: NodePath,
}

impl CoordinationClient {
    /// Creates a client rooted at [`DEFAULT_ROOT`].
    pub fn new(store: Arc<dyn CoordinationStore>) -> Self {
        #[allow(clippy::expect_used)]
        let root = NodePath::new(DEFAULT_ROOT).expect("default root is a valid path");
        Self { store, root }
    }

    /// Creates a client rooted at `root`.
    pub fn with_root(store: Arc<dyn CoordinationStore>, root: NodePath) -> Self {
        Self { store, root }
    }

    /// The root every managed path is anchored under.
    pub fn root(&self) -> &NodePath {
        &self.root
    }

    /// Creates every missing node along `path`, the leaf with
    /// `leaf_content` and intermediate nodes empty. Idempotent: existing
    /// segments are left untouched (an existing leaf keeps its content) and
    /// the resolved absolute path is returned either way.
    ///
    /// # Errors
    /// `ClientError::Fault` on any store fault.
    pub fn create_path(&self, path: &NodePath, leaf_content: &[u8]) -> Result<NodePath, ClientError> {
        let full = path.anchored_under(&self.root);
        let segments = full.segments();
        let mut walked = String::new();
        for (index, segment) in segments.iter().enumerate() {
            walked.push('/');
            walked.push_str(segment);
            let is_leaf = index == segments.len() - 1;
            let stat = self
                .store
                .exists(&walked)
                .map_err(|source| self.fault("create_path", &walked, source))?;
            if stat.is_none() {
                let content = if is_leaf { leaf_content } else { &[] };
                debug!(node = %walked, leaf = is_leaf, "creating node");
                match self.store.create(&walked, content) {
                    Ok(()) => {}
                    // Lost a race with a concurrent creator; the segment
                    // exists now, which is all this walk needs.
                    Err(StoreError::NodeExists(_)) => {}
                    Err(source) => return Err(self.fault("create_path", &walked, source)),
                }
            }
        }
        Ok(full)
    }

    /// Returns the node's version token, or `None` if it does not exist.
    ///
    /// # Errors
    /// `ClientError::Fault` on any store fault.
    pub fn exists(&self, path: &NodePath) -> Result<Option<NodeStat>, ClientError> {
        let full = path.anchored_under(&self.root);
        self.store
            .exists(full.as_str())
            .map_err(|source| self.fault("exists", full.as_str(), source))
    }

    /// Reads the node's payload; an absent node reads as empty bytes.
    ///
    /// # Errors
    /// `ClientError::Fault` on any store fault.
    pub fn get_content(&self, path: &NodePath) -> Result<Vec<u8>, ClientError> {
        let full = path.anchored_under(&self.root);
        if self.exists(path)?.is_none() {
            return Ok(Vec::new());
        }
        match self.store.get_data(full.as_str()) {
            Ok(data) => Ok(data),
            // Deleted between the check and the read; absence reads empty.
            Err(StoreError::NoNode(_)) => Ok(Vec::new()),
            Err(source) => Err(self.fault("get_content", full.as_str(), source)),
        }
    }

    /// Replaces the node's payload, guarded by the version from a fresh
    /// existence check. A no-op if the node does not exist.
    ///
    /// # Errors
    /// `ClientError::Fault` on any store fault, including a version conflict
    /// when the node changed between the check and the write.
    pub fn update(&self, path: &NodePath, data: &[u8]) -> Result<(), ClientError> {
        let full = path.anchored_under(&self.root);
        let Some(stat) = self.exists(path)? else {
            return Ok(());
        };
        self.store
            .set_data(full.as_str(), data, stat.version)
            .map_err(|source| self.fault("update", full.as_str(), source))
    }

    /// Deletes the node and all its descendants, depth-first. A no-op if the
    /// node does not exist. Each deletion is guarded by a fresh existence
    /// check.
    ///
    /// # Errors
    /// `ClientError::Fault` on any store fault.
    pub fn delete_recursive(&self, path: &NodePath) -> Result<(), ClientError> {
        let full = path.anchored_under(&self.root);
        let Some(stat) = self.exists(path)? else {
            return Ok(());
        };
        for child in self.children_of(&full)? {
            self.delete_recursive(&child)?;
        }
        debug!(node = %full, "deleting node");
        self.store
            .delete(full.as_str(), stat.version)
            .map_err(|source| self.fault("delete_recursive", full.as_str(), source))
    }

    /// Absolute paths of the node's direct children, anchored under the
    /// queried path.
    ///
    /// # Errors
    /// `ClientError::Fault` on any store fault.
    pub fn children_of(&self, path: &NodePath) -> Result<Vec<NodePath>, ClientError> {
        let full = path.anchored_under(&self.root);
        let names = self
            .store
            .children(full.as_str())
            .map_err(|source| self.fault("children_of", full.as_str(), source))?;
        let mut children = Vec::with_capacity(names.len());
        for name in names {
            match NodePath::new(format!("/{name}")) {
                Ok(child) => children.push(child.anchored_under(&full)),
                // Foreign node created outside this crate's conventions.
                Err(_) => warn!(parent = %full, child = %name, "skipping unaddressable child"),
            }
        }
        Ok(children)
    }

    /// Registers a one-shot watch on the node and returns its version token
    /// at registration time (`None` if the node does not exist yet).
    ///
    /// # Errors
    /// `ClientError::Fault` on any store fault.
    pub fn watch(
        &self,
        path: &NodePath,
        callback: WatchCallback,
    ) -> Result<Option<NodeStat>, ClientError> {
        let full = path.anchored_under(&self.root);
        self.store
            .watch(full.as_str(), callback)
            .map_err(|source| self.fault("watch", full.as_str(), source))
    }

    fn fault(&self, operation: &'static str, path: &str, source: StoreError) -> ClientError {
        ClientError::Fault {
            operation,
            path: path.to_string(),
            source,
        }
    }
}
