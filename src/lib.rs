//! Vane - Hierarchical configuration distribution over a coordination store.
//!
//! Vane stores typed configuration definitions in a shared hierarchical
//! namespace and lets processes read and watch the currently selected value,
//! globally or per environment. The main pieces are:
//!
//! - Validated domain records (keys, environments, variants, definitions)
//! - A rooted namespace client over a pluggable coordination store
//! - Write-side administration with per-key locking
//! - Read-side resolution and self-re-arming change subscriptions
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use vane::client::CoordinationClient;
//! use vane::codec::JsonCodec;
//! use vane::domain::ConfigurationKey;
//! use vane::manager::ConfigurationManager;
//! use vane::provider::ValueProvider;
//! use vane::store::MemoryStore;
//!
//! let client = CoordinationClient::new(Arc::new(MemoryStore::new()));
//! let codec = Arc::new(JsonCodec::new());
//! let manager = ConfigurationManager::new(client.clone(), codec.clone());
//! // Sharing the manager's lock registry serializes reads on a key against
//! // writes on the same key.
//! let provider = ValueProvider::with_locks(client, codec, manager.locks().clone());
//!
//! let key = ConfigurationKey::new("app.log.level").unwrap();
//! let value = provider.get_value(&key, None).unwrap();
//! println!("current value: {value:?}");
//! ```

/// Validated configuration domain records.
pub mod domain;

/// Hierarchical namespace paths and their mapping from domain values.
pub mod path;

/// Coordination store abstraction and the in-memory implementation.
pub mod store;

/// Rooted namespace client over a coordination store.
pub mod client;

/// Per-key locking for multi-round-trip operations.
pub mod locks;

/// Record encoding between domain records and stored bytes.
pub mod codec;

/// Write-side configuration administration.
pub mod manager;

/// Read-side value resolution and change subscriptions.
pub mod provider;
