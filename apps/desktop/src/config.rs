use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use client_core::DEFAULT_GREETING;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub service_url: String,
    pub username: String,
    pub greeting: String,
    pub export_dir: PathBuf,
    pub request_timeout_secs: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            service_url: "http://localhost:8000".into(),
            username: "User".into(),
            greeting: DEFAULT_GREETING.into(),
            export_dir: PathBuf::from("."),
            request_timeout_secs: 30,
        }
    }
}

/// Defaults, then `config_path` if it exists, then environment overrides.
pub fn load_settings(config_path: &Path) -> ClientSettings {
    load_settings_with_env(config_path, |key| std::env::var(key).ok())
}

fn load_settings_with_env(
    config_path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> ClientSettings {
    let mut settings = ClientSettings::default();

    match fs::read_to_string(config_path) {
        Ok(raw) => match parse_config_file(&raw) {
            Ok(file_cfg) => apply_overrides(&mut settings, |key| file_cfg.get(key).cloned()),
            Err(err) => warn!(
                path = %config_path.display(),
                error = %err,
                "ignoring unreadable client config"
            ),
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => warn!(
            path = %config_path.display(),
            error = %err,
            "failed to read client config"
        ),
    }

    apply_env_overrides(&mut settings, env);
    settings
}

/// Flattens a top-level TOML table into strings so that numbers and strings
/// are accepted interchangeably.
fn parse_config_file(raw: &str) -> Result<HashMap<String, String>, toml::de::Error> {
    let table = toml::from_str::<HashMap<String, toml::Value>>(raw)?;
    Ok(table
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                toml::Value::String(text) => text,
                other => other.to_string(),
            };
            (key, value)
        })
        .collect())
}

fn apply_overrides(settings: &mut ClientSettings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("service_url") {
        settings.service_url = v;
    }
    if let Some(v) = lookup("username") {
        settings.username = v;
    }
    if let Some(v) = lookup("greeting") {
        settings.greeting = v;
    }
    if let Some(v) = lookup("export_dir") {
        settings.export_dir = PathBuf::from(v);
    }
    if let Some(v) = lookup("request_timeout_secs") {
        match v.trim().parse::<u64>() {
            Ok(parsed) if parsed > 0 => settings.request_timeout_secs = parsed,
            _ => warn!(value = %v, "ignoring invalid request_timeout_secs"),
        }
    }
}

fn apply_env_overrides(settings: &mut ClientSettings, env: impl Fn(&str) -> Option<String>) {
    apply_overrides(settings, |key| match key {
        "service_url" => env("APP__SERVICE_URL").or_else(|| env("CHAT_SERVICE_URL")),
        "username" => env("APP__USERNAME").or_else(|| env("CHAT_USERNAME")),
        "greeting" => env("APP__GREETING"),
        "export_dir" => env("APP__EXPORT_DIR"),
        "request_timeout_secs" => env("APP__REQUEST_TIMEOUT_SECS"),
        _ => None,
    });
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
