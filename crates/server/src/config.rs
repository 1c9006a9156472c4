use std::{collections::HashMap, fs, path::Path, time::Duration};

use serde::Deserialize;

pub const SETTINGS_FILE: &str = "server.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub server_bind: String,
    /// Kept as the raw string; a missing or bad value is reported per request.
    pub webhook_url: Option<String>,
    pub webhook_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8787".into(),
            webhook_url: None,
            webhook_timeout_secs: 5,
        }
    }
}

impl Settings {
    pub fn webhook_timeout(&self) -> Duration {
        Duration::from_secs(self.webhook_timeout_secs.max(1))
    }
}

pub fn load_settings() -> Settings {
    let env: HashMap<String, String> = std::env::vars().collect();
    load_settings_from(Path::new(SETTINGS_FILE), &env)
}

/// Defaults, then `server.toml`, then the environment.
pub fn load_settings_from(path: &Path, env: &HashMap<String, String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            apply_file_overrides(&mut settings, &file_cfg);
        }
    }

    if let Some(v) = env.get("SERVER_BIND") {
        settings.server_bind = v.clone();
    }
    if let Some(v) = env.get("APP__BIND_ADDR") {
        settings.server_bind = v.clone();
    }

    if let Some(v) = env.get("SLACK_WEBHOOK_URL") {
        settings.webhook_url = Some(v.clone());
    }
    if let Some(v) = env.get("APP__WEBHOOK_URL") {
        settings.webhook_url = Some(v.clone());
    }

    if let Some(v) = env.get("APP__WEBHOOK_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.webhook_timeout_secs = parsed;
        }
    }

    settings
}

fn apply_file_overrides(settings: &mut Settings, file_cfg: &HashMap<String, String>) {
    if let Some(v) = file_cfg.get("bind_addr") {
        settings.server_bind = v.clone();
    }
    if let Some(v) = file_cfg.get("webhook_url") {
        settings.webhook_url = Some(v.clone());
    }
    if let Some(v) = file_cfg.get("webhook_timeout_secs") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.webhook_timeout_secs = parsed;
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
