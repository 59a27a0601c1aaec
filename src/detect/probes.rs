//! Synchronous platform probes: screen, input, locale, privacy, hardware
//! and connection hints.

use super::{Platform, SignalProbe, StorageKind};
use crate::constants::{DEFAULT_LANGUAGE, DEFAULT_TIMEZONE, STORAGE_PROBE_KEY};
use crate::errors::ScanError;
use crate::model::{ConnectionInfo, DeviceSnapshot, HardwareInfo, LocaleInfo, PrivacyInfo};
use async_trait::async_trait;
use std::sync::Arc;

/// Round to one decimal place
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

macro_rules! platform_probe {
    ($name:ident) => {
        pub struct $name {
            platform: Arc<dyn Platform>,
        }

        impl $name {
            pub fn new(platform: Arc<dyn Platform>) -> Self {
                Self { platform }
            }
        }
    };
}

platform_probe!(ScreenProbe);
platform_probe!(InputProbe);
platform_probe!(LocaleProbe);
platform_probe!(PrivacyProbe);
platform_probe!(HardwareProbe);
platform_probe!(ConnectionProbe);

#[async_trait]
impl SignalProbe for ScreenProbe {
    fn name(&self) -> &'static str {
        "screen geometry"
    }

    async fn detect(&self, snapshot: &mut DeviceSnapshot) -> Result<(), ScanError> {
        snapshot.screen = self.platform.screen();
        Ok(())
    }
}

#[async_trait]
impl SignalProbe for InputProbe {
    fn name(&self) -> &'static str {
        "touch capability"
    }

    async fn detect(&self, snapshot: &mut DeviceSnapshot) -> Result<(), ScanError> {
        snapshot.input.touch = Some(self.platform.max_touch_points().unwrap_or(0) > 0);
        Ok(())
    }
}

#[async_trait]
impl SignalProbe for LocaleProbe {
    fn name(&self) -> &'static str {
        "locale"
    }

    async fn detect(&self, snapshot: &mut DeviceSnapshot) -> Result<(), ScanError> {
        let language = self
            .platform
            .languages()
            .into_iter()
            .find(|l| !l.is_empty())
            .or_else(|| self.platform.language())
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
        let timezone = self
            .platform
            .timezone()
            .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());
        snapshot.locale = LocaleInfo {
            language: Some(language),
            timezone: Some(timezone),
        };
        Ok(())
    }
}

#[async_trait]
impl SignalProbe for PrivacyProbe {
    fn name(&self) -> &'static str {
        "privacy and storage"
    }

    async fn detect(&self, snapshot: &mut DeviceSnapshot) -> Result<(), ScanError> {
        let storage_ok = |kind| self.platform.probe_storage(kind, STORAGE_PROBE_KEY).is_ok();
        snapshot.privacy = PrivacyInfo {
            do_not_track: Some(self.platform.do_not_track().as_deref() == Some("1")),
            cookies_enabled: Some(self.platform.cookie_enabled().unwrap_or(false)),
            local_storage: Some(storage_ok(StorageKind::Local)),
            session_storage: Some(storage_ok(StorageKind::Session)),
        };
        Ok(())
    }
}

#[async_trait]
impl SignalProbe for HardwareProbe {
    fn name(&self) -> &'static str {
        "hardware hints"
    }

    async fn detect(&self, snapshot: &mut DeviceSnapshot) -> Result<(), ScanError> {
        snapshot.hardware = HardwareInfo {
            cores: self.platform.hardware_concurrency(),
            memory_gb: self
                .platform
                .device_memory()
                .filter(|gb| *gb > 0.0)
                .map(round_tenth),
        };
        Ok(())
    }
}

#[async_trait]
impl SignalProbe for ConnectionProbe {
    fn name(&self) -> &'static str {
        "connection hints"
    }

    async fn detect(&self, snapshot: &mut DeviceSnapshot) -> Result<(), ScanError> {
        let hints = self.platform.connection();
        snapshot.connection = ConnectionInfo {
            effective_type: hints.as_ref().and_then(|h| h.effective_type.clone()),
            downlink_mbps: hints.as_ref().and_then(|h| h.downlink).map(round_tenth),
            rtt_ms: hints.as_ref().and_then(|h| h.rtt),
            // absent connection interface reads as "not saving data"
            save_data: Some(hints.map(|h| h.save_data).unwrap_or(false)),
        };
        Ok(())
    }
}
