//! Majlis Configuration
//!
//! TOML configuration loading with environment variable support

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_ACCESS_TOKEN: &str = "LINE_CHANNEL_ACCESS_TOKEN";
pub const ENV_CHANNEL_SECRET: &str = "LINE_CHANNEL_SECRET";
pub const ENV_PORT: &str = "PORT";
pub const ENV_HOST: &str = "HOST";
pub const ENV_CONTENT_DIR: &str = "MAJLIS_CONTENT_DIR";
pub const ENV_LOG_LEVEL: &str = "MAJLIS_LOG_LEVEL";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub core: CoreConfig,
    #[serde(default)]
    pub line: LineConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CoreConfig {
    pub data_dir: Option<String>,
    pub log_level: Option<String>,
    /// Directory holding the content resource files. Built-in content is used when unset.
    pub content_dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineConfig {
    #[serde(default)]
    pub channel_access_token: String,
    #[serde(default)]
    pub channel_secret: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            channel_access_token: String::new(),
            channel_secret: String::new(),
            api_base_url: default_api_base_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_webhook_path")]
    pub webhook_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            webhook_path: default_webhook_path(),
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_api_base_url() -> String {
    "https://api.line.me".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_webhook_path() -> String {
    "/callback".to_string()
}

impl Config {
    /// Parse a TOML file without validating it.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the file when it exists, apply environment overrides, then validate.
    ///
    /// A missing file is not an error: a deployment may configure everything
    /// through the environment.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let mut config = if path.as_ref().exists() {
            Self::from_file(path.as_ref())?
        } else {
            Config::default()
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("majlis").join("config.toml"))
    }

    pub fn apply_env_overrides(&mut self) -> anyhow::Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Blank values are ignored. A set but unparseable `PORT` is an error.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(token) = read(ENV_ACCESS_TOKEN) {
            self.line.channel_access_token = token;
        }
        if let Some(secret) = read(ENV_CHANNEL_SECRET) {
            self.line.channel_secret = secret;
        }
        if let Some(port) = read(ENV_PORT) {
            self.server.port = port
                .parse::<u16>()
                .map_err(|_| anyhow::anyhow!("{} must be a port number, got '{}'", ENV_PORT, port))?;
        }
        if let Some(host) = read(ENV_HOST) {
            self.server.host = host;
        }
        if let Some(dir) = read(ENV_CONTENT_DIR) {
            self.core.content_dir = Some(dir);
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            self.core.log_level = Some(level);
        }
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.line.channel_access_token.trim().is_empty() {
            anyhow::bail!(
                "LINE channel access token is not configured (set [line].channel_access_token or {})",
                ENV_ACCESS_TOKEN
            );
        }
        if self.line.channel_secret.trim().is_empty() {
            anyhow::bail!(
                "LINE channel secret is not configured (set [line].channel_secret or {})",
                ENV_CHANNEL_SECRET
            );
        }
        if self.line.api_base_url.trim().is_empty() {
            anyhow::bail!("line.api_base_url cannot be empty");
        }
        if self.server.port == 0 {
            anyhow::bail!("server.port must be greater than 0");
        }
        if self.server.host.trim().is_empty() {
            anyhow::bail!("server.host cannot be empty");
        }
        if !self.server.webhook_path.starts_with('/') {
            anyhow::bail!(
                "server.webhook_path '{}' must start with '/'",
                self.server.webhook_path
            );
        }
        if matches!(self.server.webhook_path.as_str(), "/" | "/health") {
            anyhow::bail!(
                "server.webhook_path '{}' collides with the health routes",
                self.server.webhook_path
            );
        }
        Ok(())
    }

    /// Data directory with `~` expanded, defaulting to `~/.majlis`.
    pub fn data_dir(&self) -> PathBuf {
        match &self.core.data_dir {
            Some(data_dir) => expand_home(data_dir),
            None => dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".majlis"),
        }
    }

    pub fn content_dir(&self) -> Option<PathBuf> {
        self.core
            .content_dir
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(expand_home)
    }

    pub fn log_level(&self) -> &str {
        self.core.log_level.as_deref().unwrap_or("info")
    }
}

fn expand_home(path: &str) -> PathBuf {
    if path == "~" || path.starts_with("~/") {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        if path == "~" {
            home
        } else {
            home.join(path.trim_start_matches("~/"))
        }
    } else {
        PathBuf::from(path)
    }
}
