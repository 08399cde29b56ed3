//! Controller configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_AUTO_PLAY_INTERVAL_MS: u64 = 5000;
pub const DEFAULT_TRANSITION_DURATION_MS: u64 = 500;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
}

/// Configuration for one controller; fixed for its lifetime
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct CarouselConfig {
    pub auto_play: bool,
    pub auto_play_interval_ms: u64,
    pub transition_duration_ms: u64,
    pub keyboard_navigation: bool,
    /// Suspend auto-advance while the pointer is over the carousel
    pub pause_on_hover: bool,
    /// Wheel down/up navigates next/prev
    pub mouse_wheel: bool,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            auto_play: true,
            auto_play_interval_ms: DEFAULT_AUTO_PLAY_INTERVAL_MS,
            transition_duration_ms: DEFAULT_TRANSITION_DURATION_MS,
            keyboard_navigation: true,
            pause_on_hover: true,
            mouse_wheel: false,
        }
    }
}

impl CarouselConfig {
    /// Load from `CAROUSEL_*` environment variables, keeping defaults for
    /// anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub(crate) fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(v) = read_bool(&lookup, "CAROUSEL_AUTOPLAY")? {
            config.auto_play = v;
        }
        if let Some(v) = read_millis(&lookup, "CAROUSEL_INTERVAL_MS")? {
            config.auto_play_interval_ms = v;
        }
        if let Some(v) = read_millis(&lookup, "CAROUSEL_TRANSITION_MS")? {
            config.transition_duration_ms = v;
        }
        if let Some(v) = read_bool(&lookup, "CAROUSEL_KEYBOARD")? {
            config.keyboard_navigation = v;
        }
        if let Some(v) = read_bool(&lookup, "CAROUSEL_PAUSE_ON_HOVER")? {
            config.pause_on_hover = v;
        }
        if let Some(v) = read_bool(&lookup, "CAROUSEL_MOUSE_WHEEL")? {
            config.mouse_wheel = v;
        }

        Ok(config)
    }

    pub fn auto_play_interval(&self) -> Duration {
        Duration::from_millis(self.auto_play_interval_ms)
    }

    pub fn transition_duration(&self) -> Duration {
        Duration::from_millis(self.transition_duration_ms)
    }
}

fn read_bool(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<bool>, ConfigError> {
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        _ => Err(ConfigError::InvalidValue { var, value: raw }),
    }
}

fn read_millis(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<u64>, ConfigError> {
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    raw.trim()
        .parse()
        .map(Some)
        .map_err(|_| ConfigError::InvalidValue { var, value: raw })
}
