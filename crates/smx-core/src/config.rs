use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Global configuration loaded from `~/.config/smx/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmxConfig {
    /// Maximum number of remote fetches in flight at once.
    pub max_concurrent_fetches: usize,
    /// Connect timeout per fetch, in seconds.
    pub connect_timeout_secs: u64,
    /// Total timeout per fetch (connect + transfer), in seconds.
    pub request_timeout_secs: u64,
    /// Append a short hash of the source identity to output names so that
    /// same-named files from different sources do not overwrite each other.
    pub disambiguate_names: bool,
    /// Keep the temporary directory a zip export was extracted into.
    pub keep_extracted: bool,
}

impl Default for SmxConfig {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: 4,
            connect_timeout_secs: 30,
            request_timeout_secs: 300,
            disambiguate_names: false,
            keep_extracted: false,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("smx")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<SmxConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = SmxConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: SmxConfig = toml::from_str(&data)?;
    Ok(cfg)
}
