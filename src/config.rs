use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::api::ClientOptions;

pub const CONFIG_FILE: &str = "predictor.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_base_url: String,
    pub session_file: PathBuf,
    pub request_timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:5000".into(),
            session_file: PathBuf::from(".session/session.json"),
            request_timeout_secs: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_base_url: Option<String>,
    session_file: Option<PathBuf>,
    request_timeout_secs: Option<u64>,
}

impl Settings {
    /// Overlay values from a TOML document
    pub fn apply_toml(&mut self, raw: &str) -> Result<()> {
        let file: FileSettings = toml::from_str(raw).context("Invalid predictor config")?;
        if let Some(v) = file.api_base_url {
            self.api_base_url = v;
        }
        if let Some(v) = file.session_file {
            self.session_file = v;
        }
        if file.request_timeout_secs.is_some() {
            self.request_timeout_secs = file.request_timeout_secs;
        }
        Ok(())
    }

    /// Overlay values from environment-style lookups
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("PREDICTOR_API_URL") {
            self.api_base_url = v;
        }
        if let Some(v) = lookup("PREDICTOR_SESSION_FILE") {
            self.session_file = PathBuf::from(v);
        }
        if let Some(v) = lookup("PREDICTOR_TIMEOUT_SECS") {
            let secs = v
                .trim()
                .parse::<u64>()
                .with_context(|| format!("PREDICTOR_TIMEOUT_SECS must be whole seconds, got '{v}'"))?;
            self.request_timeout_secs = Some(secs);
        }
        Ok(())
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            base_url: self.api_base_url.clone(),
            timeout: self.request_timeout_secs.map(Duration::from_secs),
            ..ClientOptions::default()
        }
    }
}

/// Defaults, then `predictor.toml` in `dir` if present, then the process environment
pub fn load_settings(dir: &Path) -> Result<Settings> {
    let mut settings = Settings::default();

    let path = dir.join(CONFIG_FILE);
    if path.exists() {
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        settings.apply_toml(&raw)?;
    }

    settings.apply_env(|key| std::env::var(key).ok())?;
    Ok(settings)
}
