#![forbid(unsafe_code)]

//! Aggregate configuration for a [`ViewHost`](crate::host::ViewHost).
//!
//! Every field defaults to the values the site ships with. With the `serde`
//! feature a host can load a partial JSON override; absent fields keep
//! their defaults.

use std::fmt;
use std::time::Duration;

use folio_core::pointer::PointerTrackerConfig;
use folio_layout::reveal::RevealConfig;

use crate::live::LiveCounterConfig;
use crate::ornament::OrnamentConfig;

/// Wall-clock display settings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClockConfig {
    /// Default: 1s
    pub interval: Duration,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
        }
    }
}

/// Everything a host needs to mount the page's motion components.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HostConfig {
    pub pointer: PointerTrackerConfig,
    pub ornament: OrnamentConfig,
    pub live: LiveCounterConfig,
    pub clock: ClockConfig,
    /// Policy for scroll-revealed sections.
    pub reveal: RevealConfig,
    /// Policy for starting the live counter; fires at 20% visibility.
    pub live_reveal: RevealConfig,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            pointer: PointerTrackerConfig::default(),
            ornament: OrnamentConfig::default(),
            live: LiveCounterConfig::default(),
            clock: ClockConfig::default(),
            reveal: RevealConfig::default(),
            live_reveal: RevealConfig {
                margin: 0.0,
                amount: 0.2,
                ..RevealConfig::default()
            },
        }
    }
}

/// Configuration could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The document is not valid JSON for [`HostConfig`].
    Parse(String),
    /// A value is outside its meaningful range.
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "config parse error: {msg}"),
            Self::Invalid(what) => write!(f, "invalid config: {what}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl HostConfig {
    /// Reject values no component can work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.pointer.trail_ease) {
            return Err(ConfigError::Invalid("pointer.trail_ease must be in [0, 1]"));
        }
        if self.live.interval.is_zero() {
            return Err(ConfigError::Invalid("live.interval must be positive"));
        }
        if self.clock.interval.is_zero() {
            return Err(ConfigError::Invalid("clock.interval must be positive"));
        }
        if !(0.0..=1.0).contains(&self.live.increment_probability) {
            return Err(ConfigError::Invalid(
                "live.increment_probability must be in [0, 1]",
            ));
        }
        if !self.live.target.is_finite() || !self.live.start.is_finite() {
            return Err(ConfigError::Invalid("live.start and live.target must be finite"));
        }
        if !(self.ornament.fov_deg > 0.0 && self.ornament.fov_deg < 180.0) {
            return Err(ConfigError::Invalid("ornament.fov_deg must be in (0, 180)"));
        }
        if self.ornament.parallax_limit < 0.0 {
            return Err(ConfigError::Invalid("ornament.parallax_limit must be >= 0"));
        }
        Ok(())
    }

    /// Parse a JSON override document and validate it.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
