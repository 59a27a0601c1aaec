use super::{BatteryStatus, ConnectionHints, GpuProbe, Platform, StorageKind};
use crate::errors::ScanError;
use crate::model::ScreenInfo;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

const POWER_SUPPLY_DIR: &str = "/sys/class/power_supply";
const DRM_DIR: &str = "/sys/class/drm";
const MEMINFO: &str = "/proc/meminfo";

/// Platform signals read from the machine running the scan
///
/// Terminal geometry stands in for the screen, locale variables for the
/// navigator languages, data directories for web storage, and sysfs for
/// the battery and graphics interfaces.
pub struct HostPlatform {
    user_agent: Option<String>,
}

impl HostPlatform {
    pub fn new(user_agent: Option<String>) -> Self {
        Self { user_agent }
    }

    /// A user-agent shaped string describing this host
    pub fn synthesized_user_agent() -> String {
        let platform = match std::env::consts::OS {
            "windows" => "Windows NT 10.0; Win64; x64".to_string(),
            "macos" => "Macintosh; Intel Mac OS X 10_15_7".to_string(),
            "android" => "Linux; Android 14".to_string(),
            "ios" => "iPhone; CPU iPhone OS 17_0 like Mac OS X".to_string(),
            "linux" => format!("X11; Linux {}", std::env::consts::ARCH),
            other => other.to_string(),
        };
        format!("Mozilla/5.0 ({}) ghostscan/{}", platform, env!("CARGO_PKG_VERSION"))
    }

    fn env(key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.trim().is_empty())
    }

    /// Session storage lives in a per-process directory so concurrent
    /// scans never remove each other's probe key
    fn storage_dir(kind: StorageKind) -> Option<PathBuf> {
        match kind {
            StorageKind::Local => dirs::cache_dir().map(|d| d.join("ghostscan")),
            StorageKind::Session => Some(session_dir()),
        }
    }
}

impl Default for HostPlatform {
    fn default() -> Self {
        Self::new(None)
    }
}

fn session_dir() -> PathBuf {
    std::env::temp_dir().join(format!("ghostscan-{}", std::process::id()))
}

/// `en_US.UTF-8` -> `en-US`; `C` and `POSIX` carry no language
pub fn locale_to_language(raw: &str) -> Option<String> {
    let base = raw.split(['.', '@']).next().unwrap_or("").trim();
    if base.is_empty() || base == "C" || base == "POSIX" {
        return None;
    }
    Some(base.replace('_', "-"))
}

/// Columns and rows of the controlling terminal
///
/// Asks the tty first; `COLUMNS`/`LINES` only cover a redirected stdout.
pub fn terminal_dimensions() -> Option<(u32, u32)> {
    pick_dimensions(
        crossterm::terminal::size().ok(),
        HostPlatform::env("COLUMNS").as_deref(),
        HostPlatform::env("LINES").as_deref(),
    )
}

fn pick_dimensions(
    tty: Option<(u16, u16)>,
    columns: Option<&str>,
    lines: Option<&str>,
) -> Option<(u32, u32)> {
    if let Some((cols, rows)) = tty.filter(|(c, r)| *c > 0 && *r > 0) {
        return Some((cols.into(), rows.into()));
    }
    let cols = columns?.trim().parse().ok().filter(|c: &u32| *c > 0)?;
    let rows = lines?.trim().parse().ok().filter(|r: &u32| *r > 0)?;
    Some((cols, rows))
}

/// Colour depth in bits advertised by the terminal
pub fn color_depth(colorterm: Option<&str>, term: Option<&str>) -> u32 {
    match (colorterm, term) {
        (Some(ct), _) if ct.eq_ignore_ascii_case("truecolor") || ct.eq_ignore_ascii_case("24bit") => 24,
        (_, Some(t)) if t.contains("256color") => 8,
        (_, Some(_)) => 4,
        _ => 1,
    }
}

/// `MemTotal` from a meminfo listing, in gigabytes
pub fn parse_meminfo_gb(meminfo: &str) -> Option<f64> {
    meminfo
        .lines()
        .find(|line| line.starts_with("MemTotal:"))
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|kb| kb.parse::<f64>().ok())
        .map(|kb| kb / (1024.0 * 1024.0))
}

/// Renderer name from a DRM device uevent listing
pub fn parse_drm_driver(uevent: &str) -> Option<String> {
    uevent
        .lines()
        .find_map(|line| line.strip_prefix("DRIVER="))
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

async fn read_trimmed(path: &Path) -> Option<String> {
    tokio::fs::read_to_string(path)
        .await
        .ok()
        .map(|s| s.trim().to_string())
}

#[async_trait]
impl Platform for HostPlatform {
    fn user_agent(&self) -> Option<String> {
        self.user_agent
            .clone()
            .or_else(|| Self::env("GHOSTSCAN_USER_AGENT"))
            .or_else(|| Some(Self::synthesized_user_agent()))
    }

    fn screen(&self) -> Option<ScreenInfo> {
        let (width, height) = terminal_dimensions()?;
        Some(ScreenInfo {
            width,
            height,
            color_depth: color_depth(
                Self::env("COLORTERM").as_deref(),
                Self::env("TERM").as_deref(),
            ),
            pixel_ratio: 1.0,
        })
    }

    fn max_touch_points(&self) -> Option<u32> {
        Some(0)
    }

    fn languages(&self) -> Vec<String> {
        Self::env("LANGUAGE")
            .map(|list| list.split(':').filter_map(locale_to_language).collect())
            .unwrap_or_default()
    }

    fn language(&self) -> Option<String> {
        Self::env("LC_ALL")
            .or_else(|| Self::env("LANG"))
            .and_then(|raw| locale_to_language(&raw))
    }

    fn timezone(&self) -> Option<String> {
        Self::env("TZ")
            .map(|tz| tz.trim_start_matches(':').to_string())
            .or_else(|| {
                std::fs::read_to_string("/etc/timezone")
                    .ok()
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
            })
    }

    fn do_not_track(&self) -> Option<String> {
        Self::env("DO_NOT_TRACK")
    }

    fn cookie_enabled(&self) -> Option<bool> {
        Some(dirs::home_dir().is_some())
    }

    fn probe_storage(&self, kind: StorageKind, key: &str) -> Result<(), ScanError> {
        let dir = Self::storage_dir(kind)
            .ok_or_else(|| ScanError::Other("no storage directory".to_string()))?;
        std::fs::create_dir_all(&dir)?;
        // the local area is shared, so the key carries the process id there too
        let path = dir.join(format!("{}.{}", key, std::process::id()));
        std::fs::write(&path, b"1")?;
        std::fs::remove_file(&path)?;
        if kind == StorageKind::Session {
            let _ = std::fs::remove_dir(&dir);
        }
        Ok(())
    }

    fn hardware_concurrency(&self) -> Option<u32> {
        std::thread::available_parallelism()
            .ok()
            .and_then(|n| u32::try_from(n.get()).ok())
    }

    fn device_memory(&self) -> Option<f64> {
        std::fs::read_to_string(MEMINFO)
            .ok()
            .and_then(|raw| parse_meminfo_gb(&raw))
    }

    fn connection(&self) -> Option<ConnectionHints> {
        None
    }

    async fn battery(&self) -> Result<Option<BatteryStatus>, ScanError> {
        let mut entries = match tokio::fs::read_dir(POWER_SUPPLY_DIR).await {
            Ok(entries) => entries,
            Err(_) => return Ok(None),
        };
        while let Some(entry) = entries.next_entry().await? {
            let dir = entry.path();
            if read_trimmed(&dir.join("type")).await.as_deref() != Some("Battery") {
                continue;
            }
            let level = read_trimmed(&dir.join("capacity"))
                .await
                .and_then(|c| c.parse::<f64>().ok())
                .map(|pct| pct / 100.0);
            let charging = read_trimmed(&dir.join("status")).await.as_deref() == Some("Charging");
            return Ok(Some(BatteryStatus { level, charging }));
        }
        Ok(None)
    }

    fn gpu(&self) -> Result<GpuProbe, ScanError> {
        let entries = match std::fs::read_dir(DRM_DIR) {
            Ok(entries) => entries,
            Err(_) => return Ok(GpuProbe::Unavailable),
        };
        let mut saw_card = false;
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            // card0, card1 ... but not connector nodes like card0-HDMI-A-1
            if !name.starts_with("card") || name.contains('-') {
                continue;
            }
            saw_card = true;
            if let Ok(uevent) = std::fs::read_to_string(entry.path().join("device/uevent")) {
                if let Some(driver) = parse_drm_driver(&uevent) {
                    return Ok(GpuProbe::Renderer(driver));
                }
            }
        }
        Ok(if saw_card { GpuProbe::Masked } else { GpuProbe::Unavailable })
    }
}
