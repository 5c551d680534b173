pub mod config;
pub mod doctor;
pub mod migrate;

use serde::Serialize;

pub const EXIT_OK: u8 = 0;
pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_RUNTIME_INIT: u8 = 3;
pub const EXIT_DB_CONNECTIVITY: u8 = 4;
pub const EXIT_MIGRATION: u8 = 5;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
        };
        Self { exit_code: EXIT_OK, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    /// Plain text output that is not wrapped in the JSON outcome payload.
    pub fn text(exit_code: u8, output: String) -> Self {
        Self { exit_code, output }
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            escape_json(&error.to_string())
        )
    })
}

pub(crate) fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Keeps the URL scheme and hides everything after it.
pub(crate) fn redact_database_url(url: &str) -> String {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    match trimmed.split_once(':') {
        Some((scheme, _)) if !scheme.is_empty() => format!("{scheme}:***"),
        _ => "<redacted>".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{redact_database_url, CommandResult, EXIT_MIGRATION};

    #[test]
    fn database_url_keeps_only_scheme() {
        assert_eq!(redact_database_url("sqlite://var/lib/paysys.db"), "sqlite:***");
        assert_eq!(redact_database_url("sqlite::memory:"), "sqlite:***");
        assert_eq!(redact_database_url("  "), "<empty>");
        assert_eq!(redact_database_url("no-scheme"), "<redacted>");
    }

    #[test]
    fn failure_payload_carries_error_class() {
        let result = CommandResult::failure("migrate", "migration", "boom \"quoted\"", EXIT_MIGRATION);
        let payload: serde_json::Value =
            serde_json::from_str(&result.output).expect("payload should be valid JSON");

        assert_eq!(result.exit_code, EXIT_MIGRATION);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "migration");
        assert_eq!(payload["message"], "boom \"quoted\"");
    }
}
