//! Unit tests for domain value types.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;

use crate::domain::{
    ConfigValue, Configuration, ConfigurationEntry, ConfigurationKey, DomainError, Environment,
    ValueKind,
};

fn entry(name: &str, value: Option<ConfigValue>) -> ConfigurationEntry {
    ConfigurationEntry::new(name, value, format!("{name} variant")).unwrap()
}

mod keys {
    use super::*;

    #[test]
    fn accepts_dotted_alphanumeric_segments() {
        let key = ConfigurationKey::new("app.log.level").unwrap();
        assert_eq!(key.as_str(), "app.log.level");
        assert_eq!(key.segments(), vec!["app", "log", "level"]);
    }

    #[test]
    fn accepts_single_segment() {
        let key = ConfigurationKey::new("feature1").unwrap();
        assert_eq!(key.segments(), vec!["feature1"]);
    }

    #[test]
    fn rejects_empty_key() {
        assert!(matches!(
            ConfigurationKey::new(""),
            Err(DomainError::InvalidKey { .. })
        ));
    }

    #[test]
    fn rejects_empty_segments_and_bad_characters() {
        for bad in ["app..level", ".app", "app.", "app/log", "app log", "café"] {
            assert!(
                matches!(
                    ConfigurationKey::new(bad),
                    Err(DomainError::InvalidKey { .. })
                ),
                "expected '{bad}' to be rejected"
            );
        }
    }

    #[test]
    fn equality_is_by_value() {
        let first = ConfigurationKey::new("app.log.level").unwrap();
        let second = ConfigurationKey::new("app.log.level").unwrap();
        assert_eq!(first, second);
    }
}

mod environments {
    use super::*;

    #[test]
    fn accepts_valid_names() {
        for name in ["prod", "pre-prod", "staging_eu", "qa.internal", "dev"] {
            assert!(Environment::new(name).is_ok(), "expected '{name}' accepted");
        }
    }

    #[test]
    fn rejects_short_names() {
        assert!(matches!(
            Environment::new("qa"),
            Err(DomainError::InvalidEnvironment { .. })
        ));
    }

    #[test]
    fn rejects_reserved_node_names() {
        // "config" and "value" resolve to the layout nodes under a key
        // path; an override defined for them would clobber the definition
        // or the global value.
        for reserved in ["config", "value"] {
            assert!(
                matches!(
                    Environment::new(reserved),
                    Err(DomainError::InvalidEnvironment { .. })
                ),
                "expected '{reserved}' to be rejected"
            );
        }
    }

    #[test]
    fn rejects_forbidden_characters() {
        for bad in ["pr od", "prod!", "prod/eu", ""] {
            assert!(
                matches!(
                    Environment::new(bad),
                    Err(DomainError::InvalidEnvironment { .. })
                ),
                "expected '{bad}' to be rejected"
            );
        }
    }
}

mod entries {
    use super::*;

    #[test]
    fn rejects_empty_name() {
        assert!(matches!(
            ConfigurationEntry::new("", Some(ConfigValue::Bool(true)), "desc"),
            Err(DomainError::InvalidEntry { .. })
        ));
    }

    #[test]
    fn equality_covers_all_fields() {
        let base = ConfigurationEntry::new("on", Some(ConfigValue::Bool(true)), "d").unwrap();
        let same = ConfigurationEntry::new("on", Some(ConfigValue::Bool(true)), "d").unwrap();
        let other_value =
            ConfigurationEntry::new("on", Some(ConfigValue::Bool(false)), "d").unwrap();
        let other_description =
            ConfigurationEntry::new("on", Some(ConfigValue::Bool(true)), "x").unwrap();

        assert_eq!(base, same);
        assert_ne!(base, other_value);
        assert_ne!(base, other_description);
    }

    #[test]
    fn value_may_be_absent() {
        let unset = ConfigurationEntry::new("inherit", None, "defer to default").unwrap();
        assert!(unset.value().is_none());
    }
}

mod configurations {
    use super::*;

    #[test]
    fn default_variant_must_be_declared() {
        let key = ConfigurationKey::new("app.log.level").unwrap();
        let on = entry("on", Some(ConfigValue::Bool(true)));
        let off = entry("off", Some(ConfigValue::Bool(false)));
        let stray = entry("stray", Some(ConfigValue::Bool(false)));

        let result = Configuration::new(
            key,
            "Log level",
            ValueKind::Bool,
            HashMap::new(),
            vec![on, off],
            stray,
        );
        assert!(matches!(
            result,
            Err(DomainError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn variants_must_match_declared_kind() {
        let key = ConfigurationKey::new("app.log.level").unwrap();
        let on = entry("on", Some(ConfigValue::Bool(true)));
        let odd = entry("odd", Some(ConfigValue::Str("seven".to_string())));

        let result = Configuration::new(
            key,
            "Log level",
            ValueKind::Bool,
            HashMap::new(),
            vec![on.clone(), odd],
            on,
        );
        assert!(matches!(
            result,
            Err(DomainError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn rejects_empty_variant_list() {
        let key = ConfigurationKey::new("app.log.level").unwrap();
        let on = entry("on", Some(ConfigValue::Bool(true)));

        let result = Configuration::new(
            key,
            "Log level",
            ValueKind::Bool,
            HashMap::new(),
            Vec::new(),
            on,
        );
        assert!(matches!(
            result,
            Err(DomainError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn exposes_declared_pieces() {
        let key = ConfigurationKey::new("app.log.level").unwrap();
        let on = entry("on", Some(ConfigValue::Bool(true)));
        let off = entry("off", Some(ConfigValue::Bool(false)));
        let metadata = HashMap::from([("owner".to_string(), "platform".to_string())]);

        let configuration = Configuration::new(
            key.clone(),
            "Log level",
            ValueKind::Bool,
            metadata,
            vec![on.clone(), off.clone()],
            on.clone(),
        )
        .unwrap();

        assert_eq!(configuration.key(), &key);
        assert_eq!(configuration.value_kind(), ValueKind::Bool);
        assert_eq!(configuration.variants(), &[on.clone(), off.clone()]);
        assert_eq!(configuration.default_variant(), &on);
        assert!(configuration.is_variant(&off));
        assert!(!configuration.is_variant(&entry("other", None)));
        assert_eq!(
            configuration.metadata().get("owner").map(String::as_str),
            Some("platform")
        );
    }
}

mod values {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        assert_eq!(ConfigValue::Bool(true).kind(), ValueKind::Bool);
        assert_eq!(ConfigValue::Int(1).kind(), ValueKind::Int);
        assert_eq!(ConfigValue::Long(1).kind(), ValueKind::Long);
        assert_eq!(ConfigValue::Float(1.0).kind(), ValueKind::Float);
        assert_eq!(ConfigValue::from("x").kind(), ValueKind::Str);
    }

    #[test]
    fn accessors_are_kind_checked() {
        let value = ConfigValue::Long(42);
        assert_eq!(value.as_long(), Some(42));
        assert_eq!(value.as_int(), None);
        assert_eq!(value.as_str(), None);
    }
}
