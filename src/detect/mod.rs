use crate::errors::ScanError;
use crate::model::{DeviceSnapshot, ScreenInfo};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

// Submodule declarations
pub mod graphics;
pub mod host;
pub mod os;
pub mod power;
pub mod probes;

pub use host::HostPlatform;

/// Raw platform signals, each independently optional
///
/// Implementations report what the platform exposes and nothing more;
/// fallbacks and sentinels are applied by the probes.
#[async_trait]
pub trait Platform: Send + Sync {
    fn user_agent(&self) -> Option<String>;
    fn screen(&self) -> Option<ScreenInfo>;
    fn max_touch_points(&self) -> Option<u32>;
    /// Preferred languages, most preferred first
    fn languages(&self) -> Vec<String>;
    fn language(&self) -> Option<String>;
    fn timezone(&self) -> Option<String>;
    /// Raw Do-Not-Track signal (`"1"` means on)
    fn do_not_track(&self) -> Option<String>;
    fn cookie_enabled(&self) -> Option<bool>;
    /// Write then remove `key` in the given storage area
    fn probe_storage(&self, kind: StorageKind, key: &str) -> Result<(), ScanError>;
    fn hardware_concurrency(&self) -> Option<u32>;
    /// Approximate installed memory in gigabytes
    fn device_memory(&self) -> Option<f64>;
    fn connection(&self) -> Option<ConnectionHints>;
    /// May suspend; `Ok(None)` when the platform has no battery interface
    async fn battery(&self) -> Result<Option<BatteryStatus>, ScanError>;
    fn gpu(&self) -> Result<GpuProbe, ScanError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    /// Survives the session
    Local,
    /// Scoped to the session
    Session,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectionHints {
    pub effective_type: Option<String>,
    pub downlink: Option<f64>,
    pub rtt: Option<u32>,
    pub save_data: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatteryStatus {
    pub level: Option<f64>,
    pub charging: bool,
}

/// Outcome of asking the graphics stack for its renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GpuProbe {
    /// No graphics context could be obtained
    Unavailable,
    /// A context exists but the renderer string is not disclosed
    Masked,
    Renderer(String),
}

/// Signal probe trait
///
/// Each probe fills one category of the snapshot. A failing probe leaves
/// its category at the sentinel it wrote before failing; it never aborts
/// the collection.
#[async_trait]
pub trait SignalProbe: Send + Sync {
    async fn detect(&self, snapshot: &mut DeviceSnapshot) -> Result<(), ScanError>;

    /// Return a human-readable name for this probe
    fn name(&self) -> &'static str;
}

/// Anything that can produce a device snapshot for a run
#[async_trait]
pub trait DeviceSource: Send + Sync {
    async fn collect(&self) -> Result<DeviceSnapshot, ScanError>;
}

/// Runs every probe against a platform and assembles the snapshot
pub struct DeviceCollector {
    probes: Vec<Box<dyn SignalProbe>>,
    deadline: Duration,
}

impl DeviceCollector {
    /// Collector with the full probe set for `platform`
    pub fn new(platform: Arc<dyn Platform>, deadline: Duration) -> Self {
        let probes: Vec<Box<dyn SignalProbe>> = vec![
            Box::new(os::UserAgentProbe::new(platform.clone())),
            Box::new(probes::ScreenProbe::new(platform.clone())),
            Box::new(probes::InputProbe::new(platform.clone())),
            Box::new(probes::LocaleProbe::new(platform.clone())),
            Box::new(probes::PrivacyProbe::new(platform.clone())),
            Box::new(probes::HardwareProbe::new(platform.clone())),
            Box::new(probes::ConnectionProbe::new(platform.clone())),
            Box::new(power::BatteryProbe::new(platform.clone())),
            Box::new(graphics::GraphicsProbe::new(platform)),
        ];
        Self::with_probes(probes, deadline)
    }

    pub fn with_probes(probes: Vec<Box<dyn SignalProbe>>, deadline: Duration) -> Self {
        Self { probes, deadline }
    }

    pub fn probe_names(&self) -> Vec<&'static str> {
        self.probes.iter().map(|p| p.name()).collect()
    }

    async fn run_probes(&self) -> DeviceSnapshot {
        let mut snapshot = DeviceSnapshot::default();
        for probe in &self.probes {
            if let Err(err) = probe.detect(&mut snapshot).await {
                debug!(probe = probe.name(), error = %err, "probe fell back to sentinel");
            }
        }
        snapshot
    }
}

#[async_trait]
impl DeviceSource for DeviceCollector {
    async fn collect(&self) -> Result<DeviceSnapshot, ScanError> {
        timeout(self.deadline, self.run_probes())
            .await
            .map_err(|_| {
                ScanError::Collection(format!(
                    "device collection exceeded {} ms",
                    self.deadline.as_millis()
                ))
            })
    }
}
