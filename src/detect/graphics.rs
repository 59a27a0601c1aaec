use super::{GpuProbe, Platform, SignalProbe};
use crate::constants::{HIDDEN, NOT_AVAILABLE};
use crate::errors::ScanError;
use crate::model::{DeviceSnapshot, GraphicsInfo};
use async_trait::async_trait;
use std::sync::Arc;

/// Graphics renderer string, or the `N/A` / `Hidden` sentinel
pub struct GraphicsProbe {
    platform: Arc<dyn Platform>,
}

impl GraphicsProbe {
    pub fn new(platform: Arc<dyn Platform>) -> Self {
        Self { platform }
    }
}

pub fn renderer_label(probe: Result<GpuProbe, ScanError>) -> String {
    match probe {
        Ok(GpuProbe::Renderer(name)) => name,
        Ok(GpuProbe::Masked) => HIDDEN.to_string(),
        Ok(GpuProbe::Unavailable) | Err(_) => NOT_AVAILABLE.to_string(),
    }
}

#[async_trait]
impl SignalProbe for GraphicsProbe {
    fn name(&self) -> &'static str {
        "graphics renderer"
    }

    async fn detect(&self, snapshot: &mut DeviceSnapshot) -> Result<(), ScanError> {
        snapshot.graphics = GraphicsInfo {
            renderer: Some(renderer_label(self.platform.gpu())),
        };
        Ok(())
    }
}
