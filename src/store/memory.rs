use std::{
    collections::HashMap,
    sync::{
        Mutex, PoisonError,
        atomic::{AtomicBool, Ordering},
        mpsc,
    },
    thread,
};

use tracing::debug;

use super::{CoordinationStore, NodeStat, StoreError, WatchCallback, WatchEvent, WatchEventKind};

struct Node {
    data: Vec<u8>,
    version: i32,
}

type DispatchJob = (WatchCallback, WatchEvent);

/// In-process coordination store.
///
/// Implements the full [`CoordinationStore`] contract over a heap-resident
/// namespace: versioned single-node writes, parent-checked creates and
/// one-shot watches delivered sequentially on a dedicated dispatch thread.
/// Useful as an embedded store for single-process deployments and as the
/// harness every test in this crate runs against.
///
/// The connection hooks ([`sever_connection`](Self::sever_connection) /
/// [`restore_connection`](Self::restore_connection)) simulate a client that
/// lost its session: while severed, node events are dropped instead of
/// delivered, and restoring fires `ConnectionRestored` to every armed watch.
pub struct MemoryStore {
    nodes: Mutex<HashMap<String, Node>>,
    watches: Mutex<HashMap<String, Vec<WatchCallback>>>,
    connected: AtomicBool,
    dispatch_tx: mpsc::Sender<DispatchJob>,
    _dispatcher: thread::JoinHandle<()>,
}

impl MemoryStore {
    /// Creates an empty store and starts its watch-dispatch thread.
    ///
    /// # Panics
    /// Panics if the dispatch thread cannot be spawned.
    pub fn new() -> Self {
        let (dispatch_tx, dispatch_rx) = mpsc::channel::<DispatchJob>();
        #[allow(clippy::expect_used)]
        let dispatcher = thread::Builder::new()
            .name("vane-watch-dispatch".to_string())
            .spawn(move || {
                while let Ok((callback, event)) = dispatch_rx.recv() {
                    callback(event);
                }
            })
            .expect("spawn watch dispatch thread");

        Self {
            nodes: Mutex::new(HashMap::new()),
            watches: Mutex::new(HashMap::new()),
            connected: AtomicBool::new(true),
            dispatch_tx,
            _dispatcher: dispatcher,
        }
    }

    /// Simulates losing the connection: subsequent node events are dropped
    /// instead of being delivered to armed watches.
    pub fn sever_connection(&self) {
        self.connected.store(false, Ordering::SeqCst);
        debug!("connection severed; watch delivery suspended");
    }

    /// Simulates the connection coming back: every armed watch receives a
    /// `ConnectionRestored` notification (consuming its registration).
    pub fn restore_connection(&self) {
        self.connected.store(true, Ordering::SeqCst);
        let drained: Vec<(String, Vec<WatchCallback>)> = {
            let mut watches = lock(&self.watches);
            watches.drain().collect()
        };
        for (path, callbacks) in drained {
            for callback in callbacks {
                let event = WatchEvent {
                    path: path.clone(),
                    kind: WatchEventKind::ConnectionRestored,
                };
                let _ = self.dispatch_tx.send((callback, event));
            }
        }
        debug!("connection restored; reconnect events dispatched");
    }

    fn fire(&self, path: &str, kind: WatchEventKind) {
        if !self.connected.load(Ordering::SeqCst) {
            // Notifications are lost while the connection is down; the
            // registrations stay armed and hear ConnectionRestored later.
            debug!(path, ?kind, "dropping watch notification while severed");
            return;
        }
        let callbacks = {
            let mut watches = lock(&self.watches);
            watches.remove(path).unwrap_or_default()
        };
        for callback in callbacks {
            let event = WatchEvent {
                path: path.to_string(),
                kind,
            };
            let _ = self.dispatch_tx.send((callback, event));
        }
    }
}

impl CoordinationStore for MemoryStore {
    fn create(&self, path: &str, data: &[u8]) -> Result<(), StoreError> {
        {
            let mut nodes = lock(&self.nodes);
            if nodes.contains_key(path) {
                return Err(StoreError::NodeExists(path.to_string()));
            }
            let parent = parent_of(path);
            if parent != "/" && !nodes.contains_key(parent) {
                return Err(StoreError::NoNode(parent.to_string()));
            }
            nodes.insert(
                path.to_string(),
                Node {
                    data: data.to_vec(),
                    version: 0,
                },
            );
        }
        self.fire(path, WatchEventKind::Created);
        Ok(())
    }

    fn exists(&self, path: &str) -> Result<Option<NodeStat>, StoreError> {
        let nodes = lock(&self.nodes);
        Ok(nodes.get(path).map(|node| NodeStat {
            version: node.version,
        }))
    }

    fn get_data(&self, path: &str) -> Result<Vec<u8>, StoreError> {
        let nodes = lock(&self.nodes);
        nodes
            .get(path)
            .map(|node| node.data.clone())
            .ok_or_else(|| StoreError::NoNode(path.to_string()))
    }

    fn set_data(&self, path: &str, data: &[u8], version: i32) -> Result<(), StoreError> {
        {
            let mut nodes = lock(&self.nodes);
            let node = nodes
                .get_mut(path)
                .ok_or_else(|| StoreError::NoNode(path.to_string()))?;
            if node.version != version {
                return Err(StoreError::BadVersion {
                    path: path.to_string(),
                    version,
                });
            }
            node.data = data.to_vec();
            node.version += 1;
        }
        self.fire(path, WatchEventKind::DataChanged);
        Ok(())
    }

    fn delete(&self, path: &str, version: i32) -> Result<(), StoreError> {
        {
            let mut nodes = lock(&self.nodes);
            let node = nodes
                .get(path)
                .ok_or_else(|| StoreError::NoNode(path.to_string()))?;
            if node.version != version {
                return Err(StoreError::BadVersion {
                    path: path.to_string(),
                    version,
                });
            }
            if nodes.keys().any(|other| is_child_of(other, path)) {
                return Err(StoreError::NotEmpty(path.to_string()));
            }
            nodes.remove(path);
        }
        self.fire(path, WatchEventKind::Deleted);
        Ok(())
    }

    fn children(&self, path: &str) -> Result<Vec<String>, StoreError> {
        let nodes = lock(&self.nodes);
        if path != "/" && !nodes.contains_key(path) {
            return Err(StoreError::NoNode(path.to_string()));
        }
        let mut names: Vec<String> = nodes
            .keys()
            .filter(|other| is_child_of(other, path))
            .filter_map(|child| child.rsplit('/').next())
            .map(str::to_string)
            .collect();
        names.sort();
        Ok(names)
    }

    fn watch(&self, path: &str, callback: WatchCallback) -> Result<Option<NodeStat>, StoreError> {
        let stat = self.exists(path)?;
        let mut watches = lock(&self.watches);
        watches.entry(path.to_string()).or_default().push(callback);
        Ok(stat)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn parent_of(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) | None => "/",
        Some(idx) => &path[..idx],
    }
}

fn is_child_of(candidate: &str, parent: &str) -> bool {
    let prefix = if parent == "/" {
        "/".to_string()
    } else {
        format!("{parent}/")
    };
    candidate.len() > prefix.len()
        && candidate.starts_with(&prefix)
        && !candidate[prefix.len()..].contains('/')
}
