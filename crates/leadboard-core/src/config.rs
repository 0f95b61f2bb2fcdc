use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "defaults::api_base_url")]
    pub api_base_url: String,
    /// Counter poll interval while values keep changing.
    #[serde(default = "defaults::fast_poll_secs")]
    pub fast_poll_secs: u64,
    /// Counter poll interval once values have gone quiet.
    #[serde(default = "defaults::slow_poll_secs")]
    pub slow_poll_secs: u64,
    #[serde(default = "defaults::reconcile_secs")]
    pub reconcile_secs: u64,
    #[serde(default = "defaults::banner_ttl_secs")]
    pub banner_ttl_secs: u64,
    #[serde(default = "defaults::page_size")]
    pub page_size: u32,
}

mod defaults {
    pub fn api_base_url() -> String {
        "http://localhost:8000/api".to_string()
    }
    pub fn fast_poll_secs() -> u64 {
        15
    }
    pub fn slow_poll_secs() -> u64 {
        30
    }
    pub fn reconcile_secs() -> u64 {
        20
    }
    pub fn banner_ttl_secs() -> u64 {
        5
    }
    pub fn page_size() -> u32 {
        50
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: defaults::api_base_url(),
            fast_poll_secs: defaults::fast_poll_secs(),
            slow_poll_secs: defaults::slow_poll_secs(),
            reconcile_secs: defaults::reconcile_secs(),
            banner_ttl_secs: defaults::banner_ttl_secs(),
            page_size: defaults::page_size(),
        }
    }
}

impl AppConfig {
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::home_dir().map(|home| home.join(".config/leadboard/config.toml"))
        }
        #[cfg(target_os = "linux")]
        {
            dirs::config_dir().map(|config| config.join("leadboard/config.toml"))
        }
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir().map(|config| config.join("leadboard\\config.toml"))
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            None
        }
    }

    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Load from an explicit path, falling back to defaults on any
    /// read or parse failure.
    pub fn load_from(path: &std::path::Path) -> Self {
        if path.exists() {
            if let Ok(content) = std::fs::read_to_string(path) {
                if let Ok(config) = toml::from_str(&content) {
                    return config;
                }
            }
        }
        Self::default()
    }

    pub fn fast_poll(&self) -> Duration {
        Duration::from_secs(self.fast_poll_secs)
    }

    pub fn slow_poll(&self) -> Duration {
        Duration::from_secs(self.slow_poll_secs)
    }

    pub fn reconcile_interval(&self) -> Duration {
        Duration::from_secs(self.reconcile_secs)
    }

    pub fn banner_ttl(&self) -> Duration {
        Duration::from_secs(self.banner_ttl_secs)
    }
}
