//! Runtime configuration parsed from environment variables.

use canvas::consts::{DEFAULT_GRID_SIZE_PT, MIN_GRID_SIZE_PT};
use canvas::grid::GridConfig;

pub const DEFAULT_DETECT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid FORMMAP_SNAP value '{0}' (expected 'on' or 'off')")]
    InvalidSnap(String),
}

impl ConfigError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidSnap(_) => "E_CONFIG_SNAP",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_DETECT_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Detection service base URL, without a trailing slash. `None` disables detection.
    pub detect_url: Option<String>,
    pub timeouts: Timeouts,
    pub grid_size: f64,
    pub snap_enabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { detect_url: None, timeouts: Timeouts::default(), grid_size: DEFAULT_GRID_SIZE_PT, snap_enabled: true }
    }
}

impl AppConfig {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `FORMMAP_DETECT_URL`: detection service base URL
    /// - `FORMMAP_DETECT_TIMEOUT_SECS`: default 120
    /// - `FORMMAP_CONNECT_TIMEOUT_SECS`: default 10
    /// - `FORMMAP_GRID_SIZE`: grid pitch in points, default 7.5
    /// - `FORMMAP_SNAP`: `on` (default) or `off`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidSnap` for an unrecognized `FORMMAP_SNAP`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let detect_url = std::env::var("FORMMAP_DETECT_URL")
            .into_iter()
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .find(|url| !url.is_empty());
        let timeouts = Timeouts {
            request_secs: env_parse("FORMMAP_DETECT_TIMEOUT_SECS", DEFAULT_DETECT_TIMEOUT_SECS),
            connect_secs: env_parse("FORMMAP_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        let grid_size = Some(env_parse("FORMMAP_GRID_SIZE", DEFAULT_GRID_SIZE_PT))
            .filter(|g| g.is_finite() && *g >= MIN_GRID_SIZE_PT)
            .unwrap_or(DEFAULT_GRID_SIZE_PT);
        let snap_enabled = match std::env::var("FORMMAP_SNAP") {
            Ok(raw) => parse_snap(&raw)?,
            Err(_) => true,
        };

        Ok(Self { detect_url, timeouts, grid_size, snap_enabled })
    }

    /// Grid settings for the editor core.
    #[must_use]
    pub fn grid(&self) -> GridConfig {
        let mut grid = GridConfig { snap_enabled: self.snap_enabled, ..GridConfig::default() };
        grid.set_size(self.grid_size);
        grid
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    match std::env::var(key).map(|v| v.trim().parse::<T>()) {
        Ok(Ok(value)) => value,
        _ => default,
    }
}

fn parse_snap(raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "1" => Ok(true),
        "off" | "false" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidSnap(raw.to_string())),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
