use crate::transport::HttpOptions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Global configuration loaded from `~/.config/batchfetch/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Seconds allowed for establishing a connection.
    pub connect_timeout_secs: u64,
    /// Seconds allowed for a whole transfer (HEAD or GET).
    pub timeout_secs: u64,
    /// Maximum number of redirects followed per request.
    pub max_redirections: u32,
    /// Abort a transfer slower than this many bytes per second...
    pub low_speed_limit: u32,
    /// ...for this many seconds.
    pub low_speed_time_secs: u64,
    /// Optional bandwidth cap in bytes per second (None = no cap).
    #[serde(default)]
    pub max_bytes_per_sec: Option<u64>,
    /// Optional curl receive buffer size in bytes (None = library default).
    #[serde(default)]
    pub buffer_size: Option<usize>,
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Extra request headers sent with every request.
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            timeout_secs: 3600,
            max_redirections: 10,
            low_speed_limit: 1024,
            low_speed_time_secs: 60,
            max_bytes_per_sec: None,
            buffer_size: None,
            user_agent: None,
            headers: HashMap::new(),
        }
    }
}

impl FetchConfig {
    /// Transport options for the curl HTTP transport.
    pub fn http_options(&self) -> HttpOptions {
        HttpOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            timeout: Duration::from_secs(self.timeout_secs),
            max_redirections: self.max_redirections,
            low_speed_limit: self.low_speed_limit,
            low_speed_time: Duration::from_secs(self.low_speed_time_secs),
            max_recv_speed: self.max_bytes_per_sec,
            buffer_size: self.buffer_size,
            user_agent: self.user_agent.clone(),
            headers: self.headers.clone(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("batchfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<FetchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = FetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: FetchConfig =
        toml::from_str(&data).with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}
