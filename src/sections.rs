//! Turns snapshots into ordered reveal items.
//!
//! Every row builder goes through [`RevealItem::kv`], so a field that is
//! absent or formats to an empty string never produces a row.

use crate::constants::NOT_AVAILABLE;
use crate::model::{DeviceSnapshot, NetworkSnapshot, RevealItem};

pub const DEVICE_HEADING: &str = "Device";
pub const CONNECTION_HEADING: &str = "Connection & Power";
pub const NETWORK_HEADING: &str = "Network";

fn yes_no(flag: Option<bool>, yes: &str, no: &str) -> String {
    flag.map(|f| (if f { yes } else { no }).to_string())
        .unwrap_or_default()
}

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn with_unit<T: ToString>(value: Option<T>, unit: &str) -> String {
    value.map(|v| format!("{} {}", v.to_string(), unit)).unwrap_or_default()
}

/// `N% (Charging)`, `N%`, or `N/A` when the level is unknown
pub fn battery_label(level: Option<f64>, charging: Option<bool>) -> String {
    match level {
        Some(level) => {
            let pct = (level * 100.0).round();
            if charging.unwrap_or(false) {
                format!("{}% (Charging)", pct)
            } else {
                format!("{}%", pct)
            }
        }
        None => NOT_AVAILABLE.to_string(),
    }
}

/// `"{lat}, {lon}"` only when both halves are present
pub fn coords_label(latitude: Option<f64>, longitude: Option<f64>) -> String {
    match (latitude, longitude) {
        (Some(lat), Some(lon)) => format!("{}, {}", lat, lon),
        _ => String::new(),
    }
}

/// `"Name / CODE"`, dropping whichever half is missing
pub fn country_label(name: Option<&str>, code: Option<&str>) -> String {
    [name, code]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" / ")
}

pub fn device_items(d: &DeviceSnapshot) -> Vec<RevealItem> {
    let screen = d.screen.as_ref();
    [
        Some(RevealItem::heading(DEVICE_HEADING)),
        RevealItem::kv("OS", d.os.display()),
        RevealItem::kv("Browser", d.browser.display()),
        RevealItem::kv_mono("User Agent", d.user_agent.clone()),
        Some(RevealItem::divider()),
        RevealItem::kv(
            "Screen",
            opt(screen.map(|s| format!("{}x{} @{}x", s.width, s.height, s.pixel_ratio))),
        ),
        RevealItem::kv("Color Depth", opt(screen.map(|s| format!("{}-bit", s.color_depth)))),
        RevealItem::kv("Touch", yes_no(d.input.touch, "Yes", "No")),
        RevealItem::kv("Language", opt(d.locale.language.as_deref())),
        RevealItem::kv("Timezone", opt(d.locale.timezone.as_deref())),
        RevealItem::kv("Do Not Track", yes_no(d.privacy.do_not_track, "On", "Off")),
        Some(RevealItem::divider()),
        RevealItem::kv("Cores", opt(d.hardware.cores)),
        RevealItem::kv("Memory", with_unit(d.hardware.memory_gb, "GB")),
        RevealItem::kv("GPU", opt(d.graphics.renderer.as_deref())),
    ]
    .into_iter()
    .flatten()
    .collect()
}

pub fn connection_power_items(d: &DeviceSnapshot) -> Vec<RevealItem> {
    let c = &d.connection;
    [
        Some(RevealItem::heading(CONNECTION_HEADING)),
        RevealItem::kv("Type", opt(c.effective_type.as_deref())),
        RevealItem::kv("Downlink", with_unit(c.downlink_mbps, "Mbps")),
        RevealItem::kv("RTT", with_unit(c.rtt_ms, "ms")),
        RevealItem::kv("Save Data", yes_no(c.save_data, "Yes", "No")),
        Some(RevealItem::divider()),
        RevealItem::kv("Battery", battery_label(d.battery.level, d.battery.charging)),
        Some(RevealItem::divider()),
        RevealItem::kv("Cookies", yes_no(d.privacy.cookies_enabled, "Enabled", "Disabled")),
        RevealItem::kv(
            "LocalStorage",
            yes_no(d.privacy.local_storage, "Available", "Unavailable"),
        ),
        RevealItem::kv(
            "SessionStorage",
            yes_no(d.privacy.session_storage, "Available", "Unavailable"),
        ),
    ]
    .into_iter()
    .flatten()
    .collect()
}

pub fn network_items(v: &NetworkSnapshot) -> Vec<RevealItem> {
    let heading = RevealItem::heading(NETWORK_HEADING);
    if let Some(error) = &v.error {
        return vec![
            heading,
            RevealItem::Kv {
                label: "Status".to_string(),
                value: format!("Error: {}", error),
                mono: false,
            },
        ];
    }
    [
        Some(heading),
        RevealItem::kv("IP", opt(v.ip.as_deref())),
        RevealItem::kv("ISP/Org", opt(v.org.as_deref())),
        RevealItem::kv("ASN", opt(v.asn.as_ref())),
        RevealItem::kv("City", opt(v.city.as_deref())),
        RevealItem::kv("Region", opt(v.region.as_deref())),
        RevealItem::kv(
            "Country",
            country_label(v.country_name.as_deref(), v.country_code.as_deref()),
        ),
        RevealItem::kv("Coords", coords_label(v.latitude, v.longitude)),
        RevealItem::kv("Timezone", opt(v.timezone.as_deref())),
        RevealItem::kv("Postal", opt(v.postal.as_deref())),
        RevealItem::kv("Network", opt(v.network.as_deref())),
    ]
    .into_iter()
    .flatten()
    .collect()
}
