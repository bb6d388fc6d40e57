use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub pull: PullConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub demo: DemoConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Gesture and banner geometry for a pull controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullConfig {
    /// Banner height at rest
    #[serde(default = "default_banner_height")]
    pub banner_height: f64,
    /// Banner height at which a refresh fires
    #[serde(default = "default_banner_max_height")]
    pub banner_max_height: f64,
    /// Damping applied to finger travel before it moves the banner
    #[serde(default = "default_pull_factor")]
    pub pull_factor: f64,
    /// Duration of the return-to-rest transition
    #[serde(default = "default_recovery_duration")]
    pub recovery_duration_ms: u64,
    /// Easing curve backends use for the recovery transition
    #[serde(default)]
    pub easing: EasingType,
    /// Give up waiting on a refresh after this long (0 = wait forever)
    #[serde(default)]
    pub refresh_timeout_ms: u64,
}

impl Default for PullConfig {
    fn default() -> Self {
        Self {
            banner_height: default_banner_height(),
            banner_max_height: default_banner_max_height(),
            pull_factor: default_pull_factor(),
            recovery_duration_ms: default_recovery_duration(),
            easing: EasingType::default(),
            refresh_timeout_ms: 0,
        }
    }
}

impl PullConfig {
    /// Maximum banner expansion; reaching it triggers a refresh
    pub fn max_offset(&self) -> f64 {
        self.banner_max_height - self.banner_height
    }

    pub fn recovery_duration(&self) -> Duration {
        Duration::from_millis(self.recovery_duration_ms)
    }

    pub fn refresh_timeout(&self) -> Option<Duration> {
        (self.refresh_timeout_ms > 0).then(|| Duration::from_millis(self.refresh_timeout_ms))
    }

    /// Reject geometry the controller cannot work with
    pub fn validate(&self) -> crate::Result<()> {
        if !self.banner_height.is_finite() || self.banner_height <= 0.0 {
            return Err(crate::Error::Config(format!(
                "banner_height must be positive, got {}",
                self.banner_height
            )));
        }
        if !self.banner_max_height.is_finite() || self.banner_max_height < self.banner_height {
            return Err(crate::Error::Config(format!(
                "banner_max_height ({}) must not be below banner_height ({})",
                self.banner_max_height, self.banner_height
            )));
        }
        if !self.pull_factor.is_finite() || self.pull_factor <= 0.0 {
            return Err(crate::Error::Config(format!(
                "pull_factor must be positive, got {}",
                self.pull_factor
            )));
        }
        Ok(())
    }
}

/// Easing curve for animated transitions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingType {
    /// Jump at the end of the transition
    None,
    Linear,
    #[default]
    Cubic,
    Quintic,
    /// Exponential ease-out
    EaseOut,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Tick rate in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Frame rate while a transition is running
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
    /// Touch units per terminal row
    #[serde(default = "default_pixels_per_row")]
    pub pixels_per_row: f64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            animation_fps: default_animation_fps(),
            pixels_per_row: default_pixels_per_row(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Simulated duration of the demo refresh
    #[serde(default = "default_refresh_delay")]
    pub refresh_delay_ms: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            refresh_delay_ms: default_refresh_delay(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_banner_height() -> f64 {
    50.0
}

fn default_banner_max_height() -> f64 {
    200.0
}

fn default_pull_factor() -> f64 {
    0.3
}

fn default_recovery_duration() -> u64 {
    350
}

fn default_tick_rate() -> u64 {
    100
}

fn default_animation_fps() -> u32 {
    60
}

fn default_pixels_per_row() -> f64 {
    16.0
}

fn default_refresh_delay() -> u64 {
    1000
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate a TOML document
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.pull.validate()?;
        if !config.ui.pixels_per_row.is_finite() || config.ui.pixels_per_row <= 0.0 {
            return Err(crate::Error::Config(format!(
                "pixels_per_row must be positive, got {}",
                config.ui.pixels_per_row
            )));
        }
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(&config_path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/pulldown/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("pulldown")
            .join("config.toml")
    }
}
