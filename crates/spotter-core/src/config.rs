use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::autocomplete::AutocompleteProps;
use crate::error::{Result, SpotterError};

/// Root application configuration, loaded from `~/.config/spotter/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub autocomplete: AutocompleteConfig,
    pub ui: UiConfig,
}

/// Where the logbook lookup API lives and how politely to call it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    pub user_agent: String,
    pub min_interval_ms: u64,
    pub max_retries: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AutocompleteConfig {
    pub airport: AutocompleteFieldConfig,
    pub aircraft: AutocompleteFieldConfig,
}

/// Timing knobs for a single autocomplete field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutocompleteFieldConfig {
    pub debounce_ms: u64,
    pub min_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub tick_rate_ms: u64,
}

// ─── Defaults ──────────────────────────────────────────────

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            user_agent: format!("spotter/{}", env!("CARGO_PKG_VERSION")),
            min_interval_ms: 100,
            max_retries: 2,
        }
    }
}

impl Default for AutocompleteConfig {
    fn default() -> Self {
        Self {
            airport: AutocompleteFieldConfig {
                debounce_ms: 500,
                min_chars: 2,
            },
            aircraft: AutocompleteFieldConfig {
                debounce_ms: 800,
                min_chars: 3,
            },
        }
    }
}

impl Default for AutocompleteFieldConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            min_chars: 2,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { tick_rate_ms: 50 }
    }
}

impl AutocompleteFieldConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Apply these timings on top of `props`.
    pub fn apply(&self, props: AutocompleteProps) -> AutocompleteProps {
        props.debounce(self.debounce()).min_chars(self.min_chars)
    }
}

// ─── Load / Save ───────────────────────────────────────────

impl AppConfig {
    /// Standard config file path: `~/.config/spotter/config.toml`
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("SPOTTER_CONFIG") {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("spotter")
            .join("config.toml")
    }

    /// Load config from disk, falling back to defaults if file doesn't exist.
    ///
    /// `SPOTTER_BACKEND_URL` overrides `backend.base_url`.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path())?;
        if let Ok(url) = std::env::var("SPOTTER_BACKEND_URL") {
            config.backend.base_url = url;
        }
        config.validate()?;
        Ok(config)
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save config to the standard path.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save config to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.backend.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(SpotterError::ConfigError(format!(
                "backend.base_url must be an http(s) URL, got {url:?}"
            )));
        }
        if self.autocomplete.airport.min_chars == 0 || self.autocomplete.aircraft.min_chars == 0 {
            return Err(SpotterError::ConfigError(
                "autocomplete min_chars must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.backend.min_interval_ms)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.ui.tick_rate_ms.max(1))
    }

    /// Directory for the TUI log file.
    pub fn log_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join("spotter")
    }
}
