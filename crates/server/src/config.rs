use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_bind: String,
    pub account_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8080".into(),
            account_file: PathBuf::from("./data/account.json"),
        }
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new("server.toml"), |key| std::env::var(key).ok())
}

/// Defaults, then `config_path` (when readable), then environment overrides.
pub fn load_settings_from(
    config_path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(config_path) {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            if let Some(v) = file_cfg.get("bind_addr") {
                settings.server_bind = v.clone();
            }
            if let Some(v) = file_cfg.get("account_file") {
                settings.account_file = PathBuf::from(v);
            }
        }
    }

    if let Some(v) = env("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = env("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = env("ACCOUNT_FILE") {
        settings.account_file = PathBuf::from(v);
    }
    if let Some(v) = env("APP__ACCOUNT_FILE") {
        settings.account_file = PathBuf::from(v);
    }

    settings
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
