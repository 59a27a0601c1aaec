use super::{Platform, SignalProbe};
use crate::errors::ScanError;
use crate::model::{BatteryInfo, DeviceSnapshot};
use async_trait::async_trait;
use std::sync::Arc;

/// Battery level and charging state
///
/// The only probe that suspends. Any failure of the battery interface
/// leaves both fields absent.
pub struct BatteryProbe {
    platform: Arc<dyn Platform>,
}

impl BatteryProbe {
    pub fn new(platform: Arc<dyn Platform>) -> Self {
        Self { platform }
    }
}

#[async_trait]
impl SignalProbe for BatteryProbe {
    fn name(&self) -> &'static str {
        "battery status"
    }

    async fn detect(&self, snapshot: &mut DeviceSnapshot) -> Result<(), ScanError> {
        snapshot.battery = BatteryInfo::default();
        if let Some(status) = self.platform.battery().await? {
            snapshot.battery = BatteryInfo {
                level: status.level.filter(|l| l.is_finite()),
                charging: Some(status.charging),
            };
        }
        Ok(())
    }
}
