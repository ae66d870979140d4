//! Settings loading from files and environment overrides
#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::{fs, path::PathBuf, time::Duration};

use chaos_config::{AppSettings, ConfigError, LogFormat};
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn env(pairs: &[(&str, &str)]) -> Option<config::Map<String, String>> {
    Some(
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect(),
    )
}

#[test]
fn empty_environment_yields_defaults() {
    let settings = AppSettings::load_with_env(None, env(&[])).unwrap();
    assert_eq!(settings, AppSettings::default());
}

#[test]
fn toml_file_is_loaded() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "faultline.toml",
        r#"
[chaos]
enabled = true
trigger_header = "x-chaos"
latency_ms = 150
failure_rate = 0.25

[server]
http_port = 8080
log_format = "json"
"#,
    );

    let settings = AppSettings::load_with_env(Some(&path), env(&[])).unwrap();
    assert!(settings.chaos.enabled);
    assert_eq!(settings.chaos.trigger_header.as_deref(), Some("x-chaos"));
    assert_eq!(settings.server.http_port, 8080);
    assert_eq!(settings.server.grpc_port, 50051);
    assert_eq!(settings.server.log_format, LogFormat::Json);

    let policy = settings.policy().unwrap();
    assert_eq!(policy.latency, Duration::from_millis(150));
    assert_eq!(policy.trigger(), Some("x-chaos"));
}

#[test]
fn json_file_is_loaded() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "faultline.json",
        r#"{"chaos": {"enabled": true, "failure_rate": 1.0}}"#,
    );

    let settings = AppSettings::load_with_env(Some(&path), env(&[])).unwrap();
    assert!(settings.chaos.enabled);
    assert!((settings.chaos.failure_rate - 1.0).abs() < f64::EPSILON);
}

#[test]
fn environment_overrides_file() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "faultline.toml",
        "[chaos]\nenabled = false\nfailure_rate = 0.1\n",
    );

    let settings = AppSettings::load_with_env(
        Some(&path),
        env(&[
            ("FAULTLINE_CHAOS__ENABLED", "true"),
            ("FAULTLINE_CHAOS__FAILURE_RATE", "0.3"),
            ("FAULTLINE_CHAOS__LATENCY_MS", "200"),
            ("FAULTLINE_SERVER__HOST", "0.0.0.0"),
        ]),
    )
    .unwrap();

    assert!(settings.chaos.enabled);
    assert!((settings.chaos.failure_rate - 0.3).abs() < f64::EPSILON);
    assert_eq!(settings.chaos.latency_ms, 200);
    assert_eq!(settings.server.host, "0.0.0.0");
}

#[test]
fn unrelated_variables_are_ignored() {
    let settings =
        AppSettings::load_with_env(None, env(&[("OTHER_CHAOS__ENABLED", "true")])).unwrap();
    assert!(!settings.chaos.enabled);
}

#[test]
fn missing_explicit_file_is_a_load_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");

    let result = AppSettings::load_with_env(Some(&path), env(&[]));
    assert!(matches!(result, Err(ConfigError::Load(_))));
}

#[test]
fn out_of_range_rate_is_invalid() {
    let result =
        AppSettings::load_with_env(None, env(&[("FAULTLINE_CHAOS__FAILURE_RATE", "1.5")]));
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn negative_latency_is_rejected() {
    let result = AppSettings::load_with_env(None, env(&[("FAULTLINE_CHAOS__LATENCY_MS", "-5")]));
    assert!(matches!(result, Err(ConfigError::Load(_))));
}

#[test]
fn malformed_file_is_a_load_error() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "faultline.toml", "[chaos\nenabled = ");

    let result = AppSettings::load_with_env(Some(&path), env(&[]));
    assert!(matches!(result, Err(ConfigError::Load(_))));
}
