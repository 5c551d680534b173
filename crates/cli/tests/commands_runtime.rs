use std::env;
use std::sync::{Mutex, OnceLock};

use paysys_cli::commands::{config, doctor, migrate};
use serde_json::Value;
use tempfile::TempDir;

#[test]
fn migrate_returns_success_with_valid_env() {
    with_env(&[("PAYSYS_DATABASE_URL", "sqlite::memory:")], || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 0, "expected successful migrate run");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "migrate");
        assert_eq!(payload["status"], "ok");
    });
}

#[test]
fn migrate_returns_config_failure_without_database_url() {
    with_env(&[], || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn migrate_is_idempotent_against_a_file_database() {
    let dir = TempDir::new().expect("tempdir");
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("paysys.db").display());

    with_env(&[("PAYSYS_DATABASE_URL", url.as_str())], || {
        let first = parse_payload(&migrate::run().output);
        assert_eq!(first["status"], "ok");
        assert_eq!(first["message"], "applied 1 pending migration(s)");

        let second = parse_payload(&migrate::run().output);
        assert_eq!(second["status"], "ok");
        assert_eq!(second["message"], "schema already up to date");
    });
}

#[test]
fn migrate_reports_connectivity_failure_for_unreachable_database() {
    let dir = TempDir::new().expect("tempdir");
    let url = format!("sqlite://{}?mode=ro", dir.path().join("missing.db").display());

    with_env(&[("PAYSYS_DATABASE_URL", url.as_str()), ("PAYSYS_DATABASE_TIMEOUT_SECS", "2")], || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 4);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "db_connectivity");
    });
}

#[test]
fn doctor_flags_pending_migrations_then_passes() {
    let dir = TempDir::new().expect("tempdir");
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("paysys.db").display());

    with_env(&[("PAYSYS_DATABASE_URL", url.as_str())], || {
        let before = doctor::run(true);
        assert_eq!(before.exit_code, 5, "fresh database has pending migrations");
        let report = parse_payload(&before.output);
        assert_eq!(report["overall_status"], "fail");
        assert_eq!(report["checks"][1]["name"], "database_connectivity");
        assert_eq!(report["checks"][1]["status"], "pass");
        assert_eq!(report["checks"][2]["status"], "fail");

        assert_eq!(migrate::run().exit_code, 0);

        let after = doctor::run(true);
        assert_eq!(after.exit_code, 0);
        assert_eq!(parse_payload(&after.output)["overall_status"], "pass");
    });
}

#[test]
fn doctor_skips_database_checks_when_config_is_invalid() {
    with_env(&[("PAYSYS_DATABASE_URL", "postgres://localhost/paysys")], || {
        let result = doctor::run(false);

        assert_eq!(result.exit_code, 2);
        assert!(result.output.contains("- [fail] config_validation"));
        assert!(result.output.contains("- [skip] database_connectivity"));
        assert!(result.output.contains("- [skip] schema_migrations"));
    });
}

#[test]
fn config_redacts_database_url_and_attributes_sources() {
    with_env(
        &[("PAYSYS_DATABASE_URL", "sqlite://secret/location.db"), ("PAYSYS_LOG_LEVEL", "debug")],
        || {
            let result = config::run();
            assert_eq!(result.exit_code, 0);

            assert!(!result.output.contains("secret/location.db"));
            assert!(result
                .output
                .contains("- database.url = sqlite:*** (source: env (PAYSYS_DATABASE_URL))"));
            assert!(result
                .output
                .contains("- logging.level = debug (source: env (PAYSYS_LOG_LEVEL))"));
            assert!(result.output.contains("- server.port = 8080 (source: default)"));
        },
    );
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "PAYSYS_DATABASE_URL",
        "PAYSYS_DATABASE_MAX_CONNECTIONS",
        "PAYSYS_DATABASE_TIMEOUT_SECS",
        "PAYSYS_SERVER_BIND_ADDRESS",
        "PAYSYS_SERVER_PORT",
        "PAYSYS_LOGGING_LEVEL",
        "PAYSYS_LOGGING_FORMAT",
        "PAYSYS_LOG_LEVEL",
        "PAYSYS_LOG_FORMAT",
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
