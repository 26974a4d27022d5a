use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::platform;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub radio: RadioConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Settings for the download-progress monitor (the streamrip admin backend).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Base URL of the admin backend serving /events and /api/spotify.
    #[serde(default = "default_admin_url")]
    pub admin_url: String,
}

/// Settings for the radio player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadioConfig {
    /// Base URL of the Icecast server.
    #[serde(default = "default_icecast_url")]
    pub icecast_url: String,
    /// Mount path of the stream we care about, e.g. "/radio.ogg".
    /// Used to pick the right source out of the status document.
    #[serde(default = "default_stream_mount")]
    pub stream_mount: String,
    /// Base URL of the cover art lookup service.
    #[serde(default = "default_cover_api_url")]
    pub cover_api_url: String,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

/// Embedded HTTP server exposing the progress snapshot and health check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_enabled")]
    pub enabled: bool,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            admin_url: default_admin_url(),
        }
    }
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self {
            icecast_url: default_icecast_url(),
            stream_mount: default_stream_mount(),
            cover_api_url: default_cover_api_url(),
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enabled: default_server_enabled(),
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

fn default_admin_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_icecast_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_stream_mount() -> String {
    "/radio.ogg".to_string()
}

fn default_cover_api_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_poll_interval_secs() -> u64 {
    5
}

fn default_server_enabled() -> bool {
    true
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8987
}

impl MonitorConfig {
    pub fn events_url(&self) -> String {
        format!("{}/events", self.admin_url.trim_end_matches('/'))
    }

    pub fn submit_url(&self) -> String {
        format!("{}/api/spotify", self.admin_url.trim_end_matches('/'))
    }
}

impl RadioConfig {
    pub fn status_url(&self) -> String {
        format!(
            "{}/status-json.xsl",
            self.icecast_url.trim_end_matches('/')
        )
    }

    /// Playable stream URL: icecast base + mount path.
    pub fn stream_url(&self) -> String {
        let mount = if self.stream_mount.starts_with('/') {
            self.stream_mount.clone()
        } else {
            format!("/{}", self.stream_mount)
        };
        format!("{}{}", self.icecast_url.trim_end_matches('/'), mount)
    }

    pub fn poll_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            monitor: MonitorConfig::default(),
            radio: RadioConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.monitor.admin_url, "http://localhost:8000");
        assert_eq!(config.monitor.events_url(), "http://localhost:8000/events");
        assert_eq!(
            config.monitor.submit_url(),
            "http://localhost:8000/api/spotify"
        );
        assert_eq!(
            config.radio.status_url(),
            "http://localhost:8000/status-json.xsl"
        );
        assert_eq!(config.radio.stream_url(), "http://localhost:8000/radio.ogg");
        assert_eq!(config.radio.poll_interval_secs, 5);
        assert!(config.server.enabled);
        assert_eq!(config.server.port, 8987);
    }

    #[test]
    fn test_stream_url_without_leading_slash() {
        let radio = RadioConfig {
            stream_mount: "radio.ogg".to_string(),
            ..RadioConfig::default()
        };
        assert_eq!(radio.stream_url(), "http://localhost:8000/radio.ogg");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [radio]
            icecast_url = "http://stream.example.org:8000"
            "#,
        )
        .unwrap();
        assert_eq!(config.radio.icecast_url, "http://stream.example.org:8000");
        assert_eq!(config.radio.stream_mount, "/radio.ogg");
        assert_eq!(config.monitor.admin_url, "http://localhost:8000");
    }
}
