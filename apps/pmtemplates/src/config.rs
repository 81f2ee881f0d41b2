use std::{collections::HashMap, fs, path::Path, path::PathBuf, time::Duration};

use client_core::ApiOptions;
use tracing::warn;

pub const CONFIG_FILE: &str = "pmtemplates.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub download_dir: PathBuf,
    pub timeout_seconds: u64,
    pub page_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:8080".into(),
            username: None,
            password: None,
            download_dir: PathBuf::from("."),
            timeout_seconds: 30,
            page_name: "templates".into(),
        }
    }
}

impl Settings {
    pub fn api_options(&self) -> ApiOptions {
        ApiOptions {
            timeout: (self.timeout_seconds > 0).then(|| Duration::from_secs(self.timeout_seconds)),
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(CONFIG_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then the flat `key = "value"` file, then environment
/// variables; the `APP__` spelling wins over the short one.
pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<HashMap<String, String>>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.get("api_url") {
                    settings.api_url = v.clone();
                }
                if let Some(v) = file_cfg.get("username") {
                    settings.username = Some(v.clone());
                }
                if let Some(v) = file_cfg.get("password") {
                    settings.password = Some(v.clone());
                }
                if let Some(v) = file_cfg.get("download_dir") {
                    settings.download_dir = PathBuf::from(v);
                }
                if let Some(v) = file_cfg.get("timeout_seconds") {
                    apply_timeout(&mut settings, v);
                }
                if let Some(v) = file_cfg.get("page_name") {
                    settings.page_name = v.clone();
                }
            }
            Err(err) => warn!(path = %path.display(), "ignoring unreadable config: {err}"),
        }
    }

    if let Some(v) = env("PM_API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = env("APP__API_URL") {
        settings.api_url = v;
    }

    if let Some(v) = env("PM_USERNAME") {
        settings.username = Some(v);
    }
    if let Some(v) = env("APP__USERNAME") {
        settings.username = Some(v);
    }

    if let Some(v) = env("PM_PASSWORD") {
        settings.password = Some(v);
    }
    if let Some(v) = env("APP__PASSWORD") {
        settings.password = Some(v);
    }

    if let Some(v) = env("PM_DOWNLOAD_DIR") {
        settings.download_dir = PathBuf::from(v);
    }
    if let Some(v) = env("APP__DOWNLOAD_DIR") {
        settings.download_dir = PathBuf::from(v);
    }

    if let Some(v) = env("APP__TIMEOUT_SECONDS") {
        apply_timeout(&mut settings, &v);
    }

    settings
}

fn apply_timeout(settings: &mut Settings, raw: &str) {
    match raw.trim().parse::<u64>() {
        Ok(parsed) => settings.timeout_seconds = parsed,
        Err(_) => warn!(value = raw, "ignoring invalid timeout_seconds"),
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
