use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default host prefix joined with the relative track hrefs of an album page.
pub const DEFAULT_BASE_HOST: &str = "https://downloads.khinsider.com";

/// HTTP transfer settings shared by every fetch in a run (optional `[http]` section).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Value of the `User-Agent` header.
    pub user_agent: String,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Overall per-transfer timeout in seconds (None = no limit).
    pub timeout_secs: Option<u64>,
    /// Abort a transfer slower than this many bytes/sec for `low_speed_time_secs`.
    pub low_speed_limit_bytes: u32,
    pub low_speed_time_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            user_agent: concat!("khdl/", env!("CARGO_PKG_VERSION")).to_string(),
            connect_timeout_secs: 30,
            timeout_secs: None,
            low_speed_limit_bytes: 1024,
            low_speed_time_secs: 60,
        }
    }
}

/// Global configuration loaded from `~/.config/khdl/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KhdlConfig {
    /// Root under which one directory per album is created.
    pub download_root: PathBuf,
    /// Host prefix for track page links found on album pages.
    pub base_host: String,
    /// Extension used when the CLI is not given `--ext`.
    pub default_extension: String,
    /// Maximum track tasks in flight per album (None = one task per track, unbounded).
    #[serde(default)]
    pub max_concurrent_downloads: Option<usize>,
    #[serde(default)]
    pub http: HttpSettings,
}

impl Default for KhdlConfig {
    fn default() -> Self {
        Self {
            download_root: PathBuf::from("downloads"),
            base_host: DEFAULT_BASE_HOST.to_string(),
            default_extension: "mp3".to_string(),
            max_concurrent_downloads: None,
            http: HttpSettings::default(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("khdl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<KhdlConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = KhdlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from_path(&path)
}

/// Load configuration from an explicit file.
pub fn load_from_path(path: &Path) -> Result<KhdlConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config: {}", path.display()))?;
    let cfg: KhdlConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}
