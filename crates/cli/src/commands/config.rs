use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use parley_core::config::{AppConfig, LoadOptions, DEFAULT_CONFIG_FILES};
use secrecy::ExposeSecret;
use toml::Value;

/// One reported setting and the environment variables that can override it,
/// highest priority first.
struct Field {
    key: &'static str,
    value: String,
    env_keys: &'static [&'static str],
}

impl Field {
    fn new(key: &'static str, value: impl Into<String>, env_keys: &'static [&'static str]) -> Self {
        Self { key, value: value.into(), env_keys }
    }
}

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for field in fields(&config) {
        let source = field_source(
            field.key,
            field.env_keys,
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        );
        lines.push(render_line(field.key, &field.value, source));
    }

    lines.join("\n")
}

fn fields(config: &AppConfig) -> Vec<Field> {
    let api_key = match config.llm.api_key.as_ref() {
        Some(key) => redact_key(key.expose_secret()),
        None => "<unset>".to_string(),
    };

    vec![
        Field::new("database.url", config.database.url.as_str(), &["PARLEY_DATABASE_URL"]),
        Field::new(
            "database.timeout_secs",
            config.database.timeout_secs.to_string(),
            &["PARLEY_DATABASE_TIMEOUT_SECS"],
        ),
        Field::new(
            "profile.url",
            config.profile.url.as_str(),
            &["PARLEY_PROFILE_DB_URL", "PROFILE_DB_URL", "PROFILE_DB_NAME"],
        ),
        Field::new(
            "profile.max_connections",
            config.profile.max_connections.to_string(),
            &["PARLEY_PROFILE_MAX_CONNECTIONS"],
        ),
        Field::new(
            "llm.endpoint",
            config.llm.endpoint.as_deref().unwrap_or("<unset>"),
            &["PARLEY_LLM_ENDPOINT", "OPENAI_ENDPOINT"],
        ),
        Field::new("llm.api_key", api_key, &["PARLEY_LLM_API_KEY", "OPENAI_API_KEY"]),
        Field::new(
            "llm.api_version",
            config.llm.api_version.as_str(),
            &["PARLEY_LLM_API_VERSION"],
        ),
        Field::new("llm.deployment", config.llm.deployment.as_str(), &["PARLEY_LLM_DEPLOYMENT"]),
        Field::new(
            "llm.timeout_secs",
            config.llm.timeout_secs.to_string(),
            &["PARLEY_LLM_TIMEOUT_SECS"],
        ),
        Field::new(
            "content.pages_path",
            config.content.pages_path.display().to_string(),
            &["PARLEY_CONTENT_PAGES_PATH"],
        ),
        Field::new(
            "content.help_path",
            config.content.help_path.display().to_string(),
            &["PARLEY_CONTENT_HELP_PATH"],
        ),
        Field::new(
            "server.bind_address",
            config.server.bind_address.as_str(),
            &["PARLEY_SERVER_BIND_ADDRESS"],
        ),
        Field::new("server.port", config.server.port.to_string(), &["PARLEY_SERVER_PORT"]),
        Field::new(
            "server.graceful_shutdown_secs",
            config.server.graceful_shutdown_secs.to_string(),
            &["PARLEY_SERVER_GRACEFUL_SHUTDOWN_SECS"],
        ),
        Field::new(
            "logging.level",
            config.logging.level.as_str(),
            &["PARLEY_LOGGING_LEVEL", "PARLEY_LOG_LEVEL"],
        ),
        Field::new(
            "logging.format",
            format!("{:?}", config.logging.format),
            &["PARLEY_LOGGING_FORMAT", "PARLEY_LOG_FORMAT"],
        ),
    ]
}

fn detect_config_path() -> Option<PathBuf> {
    DEFAULT_CONFIG_FILES.iter().map(|path| PathBuf::from(*path)).find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    let set_env = env_keys.iter().find(|key| {
        env::var(key).map(|value| !value.trim().is_empty()).unwrap_or(false)
    });
    if let Some(env_key) = set_env {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
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

/// Shows only the last four characters of keys long enough to keep the rest
/// hidden.
fn redact_key(key: &str) -> String {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    let chars = trimmed.chars().count();
    if chars < 12 {
        return "<redacted>".to_string();
    }

    let tail: String = trimmed.chars().skip(chars - 4).collect();
    format!("***{tail}")
}
