use std::path::PathBuf;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::error::{AppError, Result};

/// Runtime settings, merged from defaults, an optional `port-monitor.toml`
/// next to the working directory, and `PORT_MONITOR_*` environment variables
/// (highest precedence).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Address the dashboard API binds to.
    pub listen_host: String,
    pub listen_port: u16,
    /// Base URL of the external port-listing backend.
    pub backend_url: String,
    /// Directory holding the preference store.
    pub data_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            listen_host: "127.0.0.1".to_string(),
            listen_port: 3001,
            backend_url: "http://127.0.0.1:9595".to_string(),
            data_dir: PathBuf::from("data"),
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        let settings: Settings = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file("port-monitor.toml"))
            .merge(Env::prefixed("PORT_MONITOR_"))
            .extract()
            .map_err(|e| AppError::ValidationError(format!("Invalid configuration: {}", e)))?;

        Url::parse(&settings.backend_url).map_err(|e| {
            AppError::ValidationError(format!(
                "Invalid backend_url '{}': {}",
                settings.backend_url, e
            ))
        })?;

        Ok(settings)
    }
}
