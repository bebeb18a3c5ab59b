//! Unit tests for the in-memory coordination store.

#![allow(clippy::unwrap_used)]

use std::{
    sync::{
        Arc,
        mpsc::{self, RecvTimeoutError},
    },
    time::Duration,
};

use super::{CoordinationStore, MemoryStore, StoreError, WatchEvent, WatchEventKind};

const TIMEOUT: Duration = Duration::from_secs(2);

fn watch_events(store: &MemoryStore, path: &str) -> mpsc::Receiver<WatchEvent> {
    let (tx, rx) = mpsc::channel();
    // Keep the channel connected after the one-shot callback consumes its
    // sender, so "no further event" reads as Timeout rather than Disconnected.
    std::mem::forget(tx.clone());
    store
        .watch(path, Box::new(move |event| drop(tx.send(event))))
        .unwrap();
    rx
}

#[test]
fn create_requires_existing_parent() {
    let store = MemoryStore::new();
    assert!(matches!(
        store.create("/app/log", b"data"),
        Err(StoreError::NoNode(_))
    ));

    store.create("/app", b"").unwrap();
    store.create("/app/log", b"data").unwrap();
    assert_eq!(store.get_data("/app/log").unwrap(), b"data");
}

#[test]
fn create_refuses_existing_node() {
    let store = MemoryStore::new();
    store.create("/app", b"").unwrap();
    assert!(matches!(
        store.create("/app", b""),
        Err(StoreError::NodeExists(_))
    ));
}

#[test]
fn set_data_is_version_guarded() {
    let store = MemoryStore::new();
    store.create("/app", b"first").unwrap();

    let stat = store.exists("/app").unwrap().unwrap();
    store.set_data("/app", b"second", stat.version).unwrap();

    // The token is now stale.
    assert!(matches!(
        store.set_data("/app", b"third", stat.version),
        Err(StoreError::BadVersion { .. })
    ));
    assert_eq!(store.get_data("/app").unwrap(), b"second");
}

#[test]
fn delete_is_version_guarded_and_refuses_children() {
    let store = MemoryStore::new();
    store.create("/app", b"").unwrap();
    store.create("/app/log", b"").unwrap();

    assert!(matches!(
        store.delete("/app", 0),
        Err(StoreError::NotEmpty(_))
    ));
    assert!(matches!(
        store.delete("/app/log", 7),
        Err(StoreError::BadVersion { .. })
    ));

    store.delete("/app/log", 0).unwrap();
    store.delete("/app", 0).unwrap();
    assert!(store.exists("/app").unwrap().is_none());
}

#[test]
fn children_lists_direct_descendants_only() {
    let store = MemoryStore::new();
    store.create("/app", b"").unwrap();
    store.create("/app/log", b"").unwrap();
    store.create("/app/log/level", b"").unwrap();
    store.create("/app/cache", b"").unwrap();

    assert_eq!(store.children("/app").unwrap(), vec!["cache", "log"]);
    assert_eq!(store.children("/app/log").unwrap(), vec!["level"]);
    assert_eq!(store.children("/").unwrap(), vec!["app"]);
    assert!(matches!(
        store.children("/missing"),
        Err(StoreError::NoNode(_))
    ));
}

#[test]
fn watch_fires_once_per_registration() {
    let store = MemoryStore::new();
    store.create("/app", b"first").unwrap();

    let rx = watch_events(&store, "/app");
    store.set_data("/app", b"second", 0).unwrap();
    store.set_data("/app", b"third", 1).unwrap();

    let event = rx.recv_timeout(TIMEOUT).unwrap();
    assert_eq!(event.kind, WatchEventKind::DataChanged);
    assert_eq!(event.path, "/app");
    // One-shot: the second update is not observed.
    assert!(matches!(
        rx.recv_timeout(Duration::from_millis(100)),
        Err(RecvTimeoutError::Timeout)
    ));
}

#[test]
fn watch_on_absent_node_fires_on_creation() {
    let store = MemoryStore::new();
    store.create("/app", b"").unwrap();

    let (tx, rx) = mpsc::channel();
    let stat = store
        .watch("/app/log", Box::new(move |event| drop(tx.send(event))))
        .unwrap();
    assert!(stat.is_none());

    store.create("/app/log", b"fresh").unwrap();
    let event = rx.recv_timeout(TIMEOUT).unwrap();
    assert_eq!(event.kind, WatchEventKind::Created);
}

#[test]
fn watch_observes_deletion() {
    let store = MemoryStore::new();
    store.create("/app", b"").unwrap();

    let rx = watch_events(&store, "/app");
    store.delete("/app", 0).unwrap();
    assert_eq!(
        rx.recv_timeout(TIMEOUT).unwrap().kind,
        WatchEventKind::Deleted
    );
}

#[test]
fn events_are_dispatched_in_order() {
    let store = Arc::new(MemoryStore::new());
    store.create("/app", b"0").unwrap();

    let (seen_tx, seen_rx) = mpsc::channel();

    // Re-arming watcher that reports each observed payload. Re-arms before
    // reporting so the next write always finds a registration.
    fn arm(store: &Arc<MemoryStore>, seen: &mpsc::Sender<Vec<u8>>) {
        let store_ref = Arc::clone(store);
        let seen_ref = seen.clone();
        store
            .watch(
                "/app",
                Box::new(move |_event| {
                    let data = store_ref.get_data("/app").unwrap();
                    arm(&store_ref, &seen_ref);
                    drop(seen_ref.send(data));
                }),
            )
            .unwrap();
    }

    arm(&store, &seen_tx);
    for (payload, version) in [(&b"1"[..], 0), (&b"2"[..], 1), (&b"3"[..], 2)] {
        store.set_data("/app", payload, version).unwrap();
        assert_eq!(seen_rx.recv_timeout(TIMEOUT).unwrap(), payload.to_vec());
    }
}

#[test]
fn severed_connection_drops_notifications_and_restore_announces_itself() {
    let store = MemoryStore::new();
    store.create("/app", b"first").unwrap();

    let rx = watch_events(&store, "/app");

    store.sever_connection();
    store.set_data("/app", b"second", 0).unwrap();
    assert!(matches!(
        rx.recv_timeout(Duration::from_millis(100)),
        Err(RecvTimeoutError::Timeout)
    ));

    // The registration stayed armed through the outage.
    store.restore_connection();
    assert_eq!(
        rx.recv_timeout(TIMEOUT).unwrap().kind,
        WatchEventKind::ConnectionRestored
    );
}
