//! Credential pool discovery and rotation across a whole pool.

use billbrief::credentials::{discover_credentials, CredentialRotator};
use billbrief::error::ConfigError;
use std::collections::HashMap;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name: &str| map.get(name).cloned()
}

fn exposed(pool: &[billbrief::credentials::Credential]) -> Vec<&str> {
    pool.iter().map(|c| c.expose()).collect()
}

#[test]
fn test_environment_pool_in_index_order() {
    let env = env_from(&[
        ("GEMINI_API_KEY", "default"),
        ("GEMINI_API_KEY_1", "first"),
        ("GEMINI_API_KEY_2", "second"),
        ("GEMINI_API_KEY_4", "unreachable"),
    ]);
    let pool = discover_credentials(None, &[], env).unwrap();
    assert_eq!(exposed(&pool), vec!["default", "first", "second"]);
}

#[test]
fn test_numbered_keys_without_default() {
    let env = env_from(&[("GEMINI_API_KEY_1", "first"), ("GEMINI_API_KEY_2", "first")]);
    let pool = discover_credentials(None, &[], env).unwrap();
    assert_eq!(exposed(&pool), vec!["first"]);
}

#[test]
fn test_explicit_list_wins_over_config_and_env() {
    let env = env_from(&[("GEMINI_API_KEY", "from-env")]);
    let configured = vec!["from-config".to_string()];

    let pool = discover_credentials(Some(" k1 , ,k2,k1"), &configured, &env).unwrap();
    assert_eq!(exposed(&pool), vec!["k1", "k2"]);

    let pool = discover_credentials(None, &configured, &env).unwrap();
    assert_eq!(exposed(&pool), vec!["from-config"]);
}

#[test]
fn test_empty_pool_is_config_error() {
    let err = discover_credentials(Some("   "), &[], env_from(&[])).unwrap_err();
    assert!(matches!(err, ConfigError::NoCredentials));
}

#[test]
fn test_rotation_visits_each_key_once() {
    let env = env_from(&[
        ("GEMINI_API_KEY", "a"),
        ("GEMINI_API_KEY_1", "b"),
        ("GEMINI_API_KEY_2", "c"),
    ]);
    let mut rotator = CredentialRotator::new(discover_credentials(None, &[], env).unwrap());

    let mut seen = vec![rotator.current().unwrap().expose().to_string()];
    while rotator.advance() {
        seen.push(rotator.current().unwrap().expose().to_string());
    }
    assert_eq!(seen, vec!["a", "b", "c"]);
    assert!(rotator.current().is_none());
    assert!(!rotator.has_more());
    assert_eq!(rotator.exhausted_count(), 3);
    assert!(!rotator.advance(), "exhaustion is final");
}
