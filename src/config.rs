use crate::constants::{DEFAULT_NOTIFY_HANDLE, DEFAULT_PROVIDER_URL};
use crate::errors::ScanError;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Configuration settings for a scan session
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Pause in milliseconds after each revealed item
    pub reveal_delay_ms: u64,

    /// Pause in milliseconds between run completion and the final notification
    pub completion_delay_ms: u64,

    /// Deadline in milliseconds for the whole device collection step
    pub collect_timeout_ms: u64,

    /// Geolocation endpoint returning the visitor's public address details
    pub provider_url: String,

    /// User-Agent header sent to the geolocation endpoint
    pub provider_user_agent: String,

    /// Replaces the synthesized host user-agent string
    pub user_agent: Option<String>,

    /// Handle shown by the final injection dialog
    pub notify_handle: String,

    /// Interval in milliseconds between scan dialog progress ticks
    pub progress_tick_ms: u64,

    /// Pause in milliseconds between reaching 100% and closing the scan dialog
    pub progress_close_delay_ms: u64,

    /// Number of ambient rain frames drawn before the scan dialog
    pub rain_frames: usize,

    /// Interval in milliseconds between rain frames
    pub rain_frame_ms: u64,

    /// Skip rain, typing and progress animations
    pub reduced_motion: bool,

    /// Ask for consent before the scan dialog opens
    pub require_consent: bool,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            reveal_delay_ms: 280,
            completion_delay_ms: 900,
            collect_timeout_ms: 5000,
            provider_url: DEFAULT_PROVIDER_URL.to_string(),
            provider_user_agent: format!("ghostscan/{}", env!("CARGO_PKG_VERSION")),
            user_agent: None,
            notify_handle: DEFAULT_NOTIFY_HANDLE.to_string(),
            progress_tick_ms: 150,
            progress_close_delay_ms: 400,
            rain_frames: 24,
            rain_frame_ms: 50,
            reduced_motion: false,
            require_consent: false,
        }
    }
}

impl RevealConfig {
    /// Load a configuration file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self, ScanError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ScanError> {
        let config: RevealConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ScanError> {
        if self.provider_url.trim().is_empty() {
            return Err(ScanError::Config("provider_url must not be empty".to_string()));
        }
        if self.progress_tick_ms == 0 {
            return Err(ScanError::Config("progress_tick_ms must be positive".to_string()));
        }
        Ok(())
    }

    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }

    pub fn completion_delay(&self) -> Duration {
        Duration::from_millis(self.completion_delay_ms)
    }

    pub fn collect_timeout(&self) -> Duration {
        Duration::from_millis(self.collect_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = RevealConfig::from_toml("reveal_delay_ms = 10\nreduced_motion = true\n").unwrap();
        assert_eq!(config.reveal_delay_ms, 10);
        assert!(config.reduced_motion);
        assert_eq!(config.completion_delay_ms, 900);
        assert_eq!(config.provider_url, DEFAULT_PROVIDER_URL);
    }

    #[test]
    fn empty_provider_is_rejected() {
        let err = RevealConfig::from_toml("provider_url = \"  \"").unwrap_err();
        assert!(matches!(err, ScanError::Config(_)));
    }
}
