use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use paysys_core::config::{AppConfig, LoadOptions, DEFAULT_CONFIG_FILES};
use secrecy::ExposeSecret;
use toml::Value;

use crate::commands::{redact_database_url, CommandResult, EXIT_CONFIG, EXIT_OK};

struct Field {
    key_path: &'static str,
    env_keys: &'static [&'static str],
}

const DATABASE_URL: Field = Field { key_path: "database.url", env_keys: &["PAYSYS_DATABASE_URL"] };
const DATABASE_MAX_CONNECTIONS: Field = Field {
    key_path: "database.max_connections",
    env_keys: &["PAYSYS_DATABASE_MAX_CONNECTIONS"],
};
const DATABASE_TIMEOUT_SECS: Field =
    Field { key_path: "database.timeout_secs", env_keys: &["PAYSYS_DATABASE_TIMEOUT_SECS"] };
const SERVER_BIND_ADDRESS: Field =
    Field { key_path: "server.bind_address", env_keys: &["PAYSYS_SERVER_BIND_ADDRESS"] };
const SERVER_PORT: Field = Field { key_path: "server.port", env_keys: &["PAYSYS_SERVER_PORT"] };
const LOGGING_LEVEL: Field = Field {
    key_path: "logging.level",
    env_keys: &["PAYSYS_LOGGING_LEVEL", "PAYSYS_LOG_LEVEL"],
};
const LOGGING_FORMAT: Field = Field {
    key_path: "logging.format",
    env_keys: &["PAYSYS_LOGGING_FORMAT", "PAYSYS_LOG_FORMAT"],
};

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::text(EXIT_CONFIG, format!("config validation failed: {error}"))
        }
    };

    CommandResult::text(EXIT_OK, render(&config))
}

fn render(config: &AppConfig) -> String {
    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |field: &Field| {
        field_source(field, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    lines.push(render_line(
        DATABASE_URL.key_path,
        &redact_database_url(config.database.url.expose_secret()),
        source(&DATABASE_URL),
    ));
    lines.push(render_line(
        DATABASE_MAX_CONNECTIONS.key_path,
        &config.database.max_connections.to_string(),
        source(&DATABASE_MAX_CONNECTIONS),
    ));
    lines.push(render_line(
        DATABASE_TIMEOUT_SECS.key_path,
        &config.database.timeout_secs.to_string(),
        source(&DATABASE_TIMEOUT_SECS),
    ));
    lines.push(render_line(
        SERVER_BIND_ADDRESS.key_path,
        &config.server.bind_address,
        source(&SERVER_BIND_ADDRESS),
    ));
    lines.push(render_line(
        SERVER_PORT.key_path,
        &config.server.port.to_string(),
        source(&SERVER_PORT),
    ));
    lines.push(render_line(LOGGING_LEVEL.key_path, &config.logging.level, source(&LOGGING_LEVEL)));
    lines.push(render_line(
        LOGGING_FORMAT.key_path,
        &format!("{:?}", config.logging.format).to_ascii_lowercase(),
        source(&LOGGING_FORMAT),
    ));

    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    DEFAULT_CONFIG_FILES.iter().map(PathBuf::from).find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    field: &Field,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = field.env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, field.key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use toml::Value;

    use super::{contains_path, field_source, SERVER_PORT};

    #[test]
    fn contains_path_walks_nested_tables() {
        let doc: Value = "[server]\nport = 9000\n".parse().expect("toml");

        assert!(contains_path(&doc, "server.port"));
        assert!(!contains_path(&doc, "server.bind_address"));
        assert!(!contains_path(&doc, "database.url"));
    }

    #[test]
    fn file_source_names_the_file() {
        let doc: Value = "[server]\nport = 9000\n".parse().expect("toml");

        let source = field_source(&SERVER_PORT, Some(&doc), Some(Path::new("paysys.toml")));

        // PAYSYS_SERVER_PORT is not touched by any test in this crate.
        assert_eq!(source, "file (paysys.toml)");
    }
}
