//! Integration tests for `logsync check` with real config files.

use std::fs;

use tempfile::TempDir;

use logsync_cli::commands::{check, load_config};

const VALID: &str = r#"{
  "syslog": { "address": "siem.example.com:514", "proto": "udp", "tag": "lms" },
  "oauth2": {
    "client_id": "logsync",
    "secret": "s3cret",
    "token_url": "https://auth.example.com/token",
    "context_url": "https://hub.example.com/events"
  },
  "filter": { "type": ["LOGIN_ERROR"], "days": 2 },
  "detections": [
    {
      "class_id": "101",
      "name": "Failed login",
      "severity": 7,
      "loglevel": 4,
      "reporters": [
        { "type": "type", "config": { "type": "LOGIN_ERROR" } },
        { "type": "detail_exists", "config": { "details": "username" } }
      ]
    }
  ]
}"#;

#[tokio::test]
async fn test_check_valid_config() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("logsync.json");
    fs::write(&config_path, VALID).expect("should write config");

    let (found, config) = load_config(Some(&config_path)).await.expect("valid config");
    assert_eq!(found, config_path);

    let report = check::build_report(&found, &config).expect("detections compile");
    assert_eq!(report.collector, "udp://siem.example.com:514");
    assert_eq!(report.days, 2);
    assert_eq!(report.detections.len(), 1);
    assert_eq!(report.detections[0].reporters.len(), 2);

    let json = serde_json::to_value(&report).expect("json");
    assert_eq!(json["detections"][0]["class_id"], "101");
    assert_eq!(json["event_types"][0], "LOGIN_ERROR");
}

#[tokio::test]
async fn test_check_rejects_invalid_values() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("logsync.json");
    fs::write(&config_path, VALID.replace("\"days\": 2", "\"days\": 30")).expect("write");

    let err = load_config(Some(&config_path)).await.unwrap_err();
    assert_eq!(err.exit_code(), 2);
    assert!(err.to_string().contains("filter.days"), "{err}");
}

#[tokio::test]
async fn test_check_malformed_json() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("logsync.json");
    fs::write(&config_path, "{ \"syslog\": ").expect("write");

    let err = load_config(Some(&config_path)).await.unwrap_err();
    assert_eq!(err.exit_code(), 2);
}
