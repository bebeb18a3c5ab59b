#![allow(clippy::unwrap_used)]

use crate::domain::{ConfigurationKey, DomainError, Environment};

use super::NodePath;

#[test]
fn key_mapping_replaces_dots_with_separators() {
    let key = ConfigurationKey::new("app.log.level").unwrap();
    let path = NodePath::from_key(&key);
    assert_eq!(path.as_str(), "/app/log/level");
}

#[test]
fn key_mapping_round_trips_segments() {
    for raw in ["app.log.level", "feature1", "a.b.c.d.e"] {
        let key = ConfigurationKey::new(raw).unwrap();
        let path = NodePath::from_key(&key);
        assert_eq!(path.segments(), key.segments());
    }
}

#[test]
fn distinct_keys_map_to_distinct_paths() {
    let first = NodePath::from_key(&ConfigurationKey::new("app.log").unwrap());
    let second = NodePath::from_key(&ConfigurationKey::new("app.log.level").unwrap());
    let third = NodePath::from_key(&ConfigurationKey::new("app.loglevel").unwrap());
    assert_ne!(first, second);
    assert_ne!(second, third);
    assert_ne!(first, third);
}

#[test]
fn environment_maps_to_single_segment() {
    let environment = Environment::new("production").unwrap();
    let path = NodePath::from_environment(&environment).unwrap();
    assert_eq!(path.as_str(), "/production");
}

#[test]
fn environment_with_path_foreign_characters_is_rejected() {
    let environment = Environment::new("pre-prod").unwrap();
    assert!(matches!(
        NodePath::from_environment(&environment),
        Err(DomainError::InvalidPath { .. })
    ));
}

#[test]
fn anchoring_prefixes_the_parent() {
    let value = NodePath::new("/value").unwrap();
    let parent = NodePath::new("/app/log/level").unwrap();
    assert_eq!(value.anchored_under(&parent).as_str(), "/app/log/level/value");
}

#[test]
fn anchoring_is_idempotent() {
    let parent = NodePath::new("/app/log/level").unwrap();
    let anchored = NodePath::new("/value").unwrap().anchored_under(&parent);
    assert_eq!(anchored.anchored_under(&parent), anchored);
}

#[test]
fn anchoring_compares_whole_segments() {
    let parent = NodePath::new("/app").unwrap();
    let sibling = NodePath::new("/app2/value").unwrap();
    assert_eq!(sibling.anchored_under(&parent).as_str(), "/app/app2/value");
}

#[test]
fn rejects_malformed_paths() {
    for bad in [
        "",
        "value",
        "/",
        "//value",
        "/value/",
        "/va lue",
        "/app.log",
        "/café",
    ] {
        assert!(
            matches!(NodePath::new(bad), Err(DomainError::InvalidPath { .. })),
            "expected '{bad}' to be rejected"
        );
    }
}
