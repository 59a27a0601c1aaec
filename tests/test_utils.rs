use async_trait::async_trait;
use ghostscan::detect::{BatteryStatus, ConnectionHints, DeviceSource, GpuProbe, Platform, StorageKind};
use ghostscan::model::{
    BatteryInfo, ConnectionInfo, DeviceSnapshot, GraphicsInfo, HardwareInfo, InputInfo, LocaleInfo,
    NamedVersion, NetworkSnapshot, PrivacyInfo, ScreenInfo,
};
use ghostscan::{LookupError, NetworkSource, RunController, ScanError};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Platform with every signal fixed up front
#[derive(Clone, Default)]
#[allow(dead_code)]
pub struct StaticPlatform {
    pub user_agent: Option<String>,
    pub screen: Option<ScreenInfo>,
    pub touch_points: Option<u32>,
    pub languages: Vec<String>,
    pub language: Option<String>,
    pub timezone: Option<String>,
    pub dnt: Option<String>,
    pub cookies: Option<bool>,
    pub local_storage: bool,
    pub session_storage: bool,
    pub cores: Option<u32>,
    pub memory: Option<f64>,
    pub connection: Option<ConnectionHints>,
    pub battery: Option<BatteryStatus>,
    pub battery_fails: bool,
    pub battery_delay: Option<Duration>,
    pub gpu: Option<GpuProbe>,
}

#[async_trait]
impl Platform for StaticPlatform {
    fn user_agent(&self) -> Option<String> {
        self.user_agent.clone()
    }
    fn screen(&self) -> Option<ScreenInfo> {
        self.screen
    }
    fn max_touch_points(&self) -> Option<u32> {
        self.touch_points
    }
    fn languages(&self) -> Vec<String> {
        self.languages.clone()
    }
    fn language(&self) -> Option<String> {
        self.language.clone()
    }
    fn timezone(&self) -> Option<String> {
        self.timezone.clone()
    }
    fn do_not_track(&self) -> Option<String> {
        self.dnt.clone()
    }
    fn cookie_enabled(&self) -> Option<bool> {
        self.cookies
    }
    fn probe_storage(&self, kind: StorageKind, _key: &str) -> Result<(), ScanError> {
        let ok = match kind {
            StorageKind::Local => self.local_storage,
            StorageKind::Session => self.session_storage,
        };
        if ok {
            Ok(())
        } else {
            Err(ScanError::Other("storage blocked".to_string()))
        }
    }
    fn hardware_concurrency(&self) -> Option<u32> {
        self.cores
    }
    fn device_memory(&self) -> Option<f64> {
        self.memory
    }
    fn connection(&self) -> Option<ConnectionHints> {
        self.connection.clone()
    }
    async fn battery(&self) -> Result<Option<BatteryStatus>, ScanError> {
        if let Some(delay) = self.battery_delay {
            tokio::time::sleep(delay).await;
        }
        if self.battery_fails {
            return Err(ScanError::Other("battery permission denied".to_string()));
        }
        Ok(self.battery.clone())
    }
    fn gpu(&self) -> Result<GpuProbe, ScanError> {
        self.gpu
            .clone()
            .ok_or_else(|| ScanError::Other("context creation failed".to_string()))
    }
}

/// A fully populated snapshot tagged with `tag` in its user agent
#[allow(dead_code)]
pub fn sample_device(tag: &str) -> DeviceSnapshot {
    DeviceSnapshot {
        user_agent: format!("Mozilla/5.0 ({})", tag),
        os: NamedVersion::new("macOS", Some("14.2".to_string())),
        browser: NamedVersion::new("Firefox", Some("121.0".to_string())),
        screen: Some(ScreenInfo {
            width: 1920,
            height: 1080,
            color_depth: 24,
            pixel_ratio: 2.0,
        }),
        input: InputInfo { touch: Some(false) },
        locale: LocaleInfo {
            language: Some("en-US".to_string()),
            timezone: Some("Europe/Lisbon".to_string()),
        },
        privacy: PrivacyInfo {
            do_not_track: Some(true),
            cookies_enabled: Some(true),
            local_storage: Some(true),
            session_storage: Some(false),
        },
        hardware: HardwareInfo {
            cores: Some(8),
            memory_gb: Some(16.0),
        },
        connection: ConnectionInfo {
            effective_type: Some("4g".to_string()),
            downlink_mbps: Some(9.5),
            rtt_ms: Some(50),
            save_data: Some(false),
        },
        battery: BatteryInfo {
            level: Some(0.42),
            charging: Some(true),
        },
        graphics: GraphicsInfo {
            renderer: Some("Apple M2".to_string()),
        },
    }
}

#[allow(dead_code)]
pub fn sample_visitor() -> NetworkSnapshot {
    serde_json::from_str(
        r#"{
            "ip": "203.0.113.42",
            "city": "Lisbon",
            "region": "Lisbon",
            "country_name": "Portugal",
            "country_code": "PT",
            "latitude": 38.7223,
            "longitude": -9.1393,
            "org": "Example Telecom",
            "asn": "AS64500",
            "timezone": "Europe/Lisbon",
            "postal": "1000-001",
            "network": "203.0.113.0/24"
        }"#,
    )
    .unwrap()
}

/// Device source returning a distinct snapshot per call
///
/// Call `n` (1-based) yields `sample_device("run-n")` after the matching
/// scripted delay.
#[allow(dead_code)]
pub struct ScriptedDevice {
    calls: AtomicUsize,
    delays: Mutex<VecDeque<Duration>>,
    fail: bool,
}

#[allow(dead_code)]
impl ScriptedDevice {
    pub fn new() -> Self {
        Self::with_delays(Vec::new())
    }

    pub fn with_delays(delays: Vec<Duration>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            delays: Mutex::new(delays.into()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DeviceSource for ScriptedDevice {
    async fn collect(&self) -> Result<DeviceSnapshot, ScanError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let delay = self.delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(ScanError::Collection("navigator unavailable".to_string()));
        }
        Ok(sample_device(&format!("run-{}", n)))
    }
}

/// Network source replaying a fixed answer
#[allow(dead_code)]
pub struct ScriptedNetwork {
    answer: Result<NetworkSnapshot, LookupError>,
    delay: Duration,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl ScriptedNetwork {
    pub fn ok(snapshot: NetworkSnapshot) -> Self {
        Self::answer(Ok(snapshot))
    }

    pub fn err(err: LookupError) -> Self {
        Self::answer(Err(err))
    }

    pub fn answer(answer: Result<NetworkSnapshot, LookupError>) -> Self {
        Self {
            answer,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NetworkSource for ScriptedNetwork {
    async fn lookup(&self) -> Result<NetworkSnapshot, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.answer.clone()
    }
}

pub const REVEAL_DELAY: Duration = Duration::from_millis(280);
pub const COMPLETION_DELAY: Duration = Duration::from_millis(900);

#[allow(dead_code)]
pub fn controller(device: Arc<dyn DeviceSource>, network: Arc<dyn NetworkSource>) -> Arc<RunController> {
    Arc::new(RunController::with_timing(
        device,
        network,
        REVEAL_DELAY,
        COMPLETION_DELAY,
    ))
}
