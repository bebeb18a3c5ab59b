//! Unit tests for the watch transition state.

#![allow(clippy::unwrap_used)]

use super::watch::{Delivery, WatchState};

#[test]
fn identical_content_is_not_delivered() {
    let mut state = WatchState::new(b"a".to_vec());
    assert_eq!(state.observe(b"a".to_vec()), None);
}

#[test]
fn changed_content_is_delivered_with_the_old_baseline() {
    let mut state = WatchState::new(b"a".to_vec());
    assert_eq!(
        state.observe(b"b".to_vec()),
        Some(Delivery {
            previous: b"a".to_vec(),
            current: b"b".to_vec(),
        })
    );
}

#[test]
fn observation_adopts_the_new_baseline() {
    let mut state = WatchState::new(b"a".to_vec());
    state.observe(b"b".to_vec());
    assert_eq!(state.observe(b"b".to_vec()), None);
    assert_eq!(
        state.observe(b"a".to_vec()),
        Some(Delivery {
            previous: b"b".to_vec(),
            current: b"a".to_vec(),
        })
    );
}

#[test]
fn creation_from_empty_baseline_is_a_change() {
    let mut state = WatchState::new(Vec::new());
    assert_eq!(
        state.observe(b"first".to_vec()),
        Some(Delivery {
            previous: Vec::new(),
            current: b"first".to_vec(),
        })
    );
}

#[test]
fn deletion_reads_as_a_change_to_empty() {
    let mut state = WatchState::new(b"a".to_vec());
    assert_eq!(
        state.observe(Vec::new()),
        Some(Delivery {
            previous: b"a".to_vec(),
            current: Vec::new(),
        })
    );
    assert_eq!(state.observe(Vec::new()), None);
}
