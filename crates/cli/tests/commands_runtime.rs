use std::env;
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use parley_cli::commands::{config, doctor, migrate};
use serde_json::Value;

#[test]
fn migrate_creates_and_migrates_sqlite_store() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("submissions.db");
    let url = sqlite_url(&db_path);

    with_env(&[("PARLEY_DATABASE_URL", url.as_str())], || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 0, "expected successful migrate: {}", result.output);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "migrate");
        assert_eq!(payload["status"], "ok");
        assert!(db_path.exists(), "sqlite file should be created");

        let rerun = migrate::run();
        assert_eq!(rerun.exit_code, 0, "migrations should be idempotent");
    });
}

#[test]
fn migrate_rejects_non_sqlite_url() {
    with_env(&[("PARLEY_DATABASE_URL", "postgres://localhost/chatbot")], || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn config_redacts_api_key_and_names_source() {
    with_env(&[("PARLEY_LLM_API_KEY", "sk-live-0123456789abcdef")], || {
        let output = config::run();

        assert!(output.contains("- llm.api_key = ***cdef (source: env (PARLEY_LLM_API_KEY))"));
        assert!(!output.contains("0123456789"));
        assert!(output.contains("- server.port = 5055 (source: default)"));
    });
}

#[test]
fn config_attributes_legacy_env_names() {
    with_env(
        &[("OPENAI_API_KEY", "legacy-key-abcdefgh"), ("PROFILE_DB_NAME", "accounts")],
        || {
            let output = config::run();

            assert!(output.contains("(source: env (OPENAI_API_KEY))"));
            assert!(output
                .contains("- profile.url = sqlite://accounts.db (source: env (PROFILE_DB_NAME))"));
        },
    );
}

#[test]
fn config_reports_validation_failure() {
    with_env(&[("PARLEY_SERVER_PORT", "0")], || {
        let output = config::run();
        assert!(output.starts_with("config validation failed"));
    });
}

#[test]
fn doctor_json_passes_with_reachable_stores() {
    let dir = tempfile::tempdir().expect("tempdir");
    let submissions = sqlite_url(&dir.path().join("submissions.db"));
    let profile = sqlite_url(&dir.path().join("profile.db"));

    with_env(
        &[("PARLEY_DATABASE_URL", submissions.as_str()), ("PARLEY_PROFILE_DB_URL", profile.as_str())],
        || {
            let result = doctor::run(true);
            assert_eq!(result.exit_code, 0, "doctor output: {}", result.output);

            let report = parse_payload(&result.output);
            assert_eq!(report["overall_status"], "pass");

            let statuses = check_statuses(&report);
            assert_eq!(
                statuses,
                vec![
                    ("config_validation".to_string(), "pass".to_string()),
                    ("llm_configuration".to_string(), "skipped".to_string()),
                    ("submission_store".to_string(), "pass".to_string()),
                    ("profile_store".to_string(), "pass".to_string()),
                ]
            );
        },
    );
}

#[test]
fn doctor_skips_dependent_checks_when_config_invalid() {
    with_env(&[("PARLEY_LOGGING_LEVEL", "loud")], || {
        let result = doctor::run(false);
        assert_eq!(result.exit_code, 1);

        let lines: Vec<&str> = result.output.lines().collect();
        assert_eq!(lines[0], "doctor: one or more readiness checks failed");
        assert!(lines[1].starts_with("- [fail] config_validation:"));
        assert!(lines[2..].iter().all(|line| line.starts_with("- [skip]")));
    });
}

fn check_statuses(report: &Value) -> Vec<(String, String)> {
    report["checks"]
        .as_array()
        .expect("checks should be an array")
        .iter()
        .map(|check| {
            (
                check["name"].as_str().unwrap_or_default().to_string(),
                check["status"].as_str().unwrap_or_default().to_string(),
            )
        })
        .collect()
}

fn sqlite_url(path: &Path) -> String {
    format!("sqlite://{}", path.display())
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "PARLEY_DATABASE_URL",
        "PARLEY_DATABASE_TIMEOUT_SECS",
        "PARLEY_PROFILE_DB_URL",
        "PARLEY_PROFILE_MAX_CONNECTIONS",
        "PROFILE_DB_URL",
        "PROFILE_DB_NAME",
        "PARLEY_LLM_API_KEY",
        "OPENAI_API_KEY",
        "PARLEY_LLM_ENDPOINT",
        "OPENAI_ENDPOINT",
        "PARLEY_LLM_API_VERSION",
        "PARLEY_LLM_DEPLOYMENT",
        "PARLEY_LLM_TIMEOUT_SECS",
        "PARLEY_CONTENT_PAGES_PATH",
        "PARLEY_CONTENT_HELP_PATH",
        "PARLEY_SERVER_BIND_ADDRESS",
        "PARLEY_SERVER_PORT",
        "PARLEY_SERVER_GRACEFUL_SHUTDOWN_SECS",
        "PARLEY_LOGGING_LEVEL",
        "PARLEY_LOGGING_FORMAT",
        "PARLEY_LOG_LEVEL",
        "PARLEY_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
