use std::collections::HashMap;
use std::env::VarError;
use std::path::PathBuf;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "TREON_ENV"));
}

#[test]
fn build_app_config_defaults_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("defaults should be valid");
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.ratings_path, PathBuf::from("./data/ratings.json"));
    assert_eq!(cfg.sessions_path, PathBuf::from("./data/sessions.json"));
    assert!(cfg.daily_sessions_path.is_none());
    assert!(cfg.catalog_path.is_none());
    assert_eq!(cfg.recent_sessions_limit, 8);
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = HashMap::new();
    map.insert("TREON_ENV", "production");
    map.insert("TREON_BIND_ADDR", "127.0.0.1:8080");
    map.insert("TREON_LOG_LEVEL", "debug");
    map.insert("TREON_RATINGS_PATH", "/srv/treon/ratings.json");
    map.insert("TREON_SESSIONS_PATH", "/srv/treon/sessions.json");
    map.insert("TREON_DAILY_SESSIONS_PATH", "/srv/treon/daily.json");
    map.insert("TREON_CATALOG_PATH", "/srv/treon/catalog.yaml");
    map.insert("TREON_RECENT_SESSIONS_LIMIT", "20");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(cfg.bind_addr.to_string(), "127.0.0.1:8080");
    assert_eq!(cfg.log_level, "debug");
    assert_eq!(cfg.ratings_path, PathBuf::from("/srv/treon/ratings.json"));
    assert_eq!(cfg.sessions_path, PathBuf::from("/srv/treon/sessions.json"));
    assert_eq!(
        cfg.daily_sessions_path,
        Some(PathBuf::from("/srv/treon/daily.json"))
    );
    assert_eq!(cfg.catalog_path, Some(PathBuf::from("/srv/treon/catalog.yaml")));
    assert_eq!(cfg.recent_sessions_limit, 20);
}

#[test]
fn build_app_config_blank_optional_path_is_unset() {
    let mut map = HashMap::new();
    map.insert("TREON_CATALOG_PATH", "  ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.catalog_path.is_none());
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = HashMap::new();
    map.insert("TREON_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TREON_BIND_ADDR"),
        "expected InvalidEnvVar(TREON_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_with_invalid_recent_limit() {
    let mut map = HashMap::new();
    map.insert("TREON_RECENT_SESSIONS_LIMIT", "lots");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TREON_RECENT_SESSIONS_LIMIT"),
        "expected InvalidEnvVar(TREON_RECENT_SESSIONS_LIMIT), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_with_unknown_env() {
    let mut map = HashMap::new();
    map.insert("TREON_ENV", "staging");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TREON_ENV"),
        "expected InvalidEnvVar(TREON_ENV), got: {result:?}"
    );
}
