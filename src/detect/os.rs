use super::{Platform, SignalProbe};
use crate::constants::UNKNOWN;
use crate::errors::ScanError;
use crate::model::{DeviceSnapshot, NamedVersion};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

macro_rules! pattern {
    ($re:expr) => {
        Lazy::new(|| Regex::new($re).expect("static pattern is valid"))
    };
}

static WINDOWS_10: Lazy<Regex> = pattern!(r"Windows NT 10");
static WINDOWS_11: Lazy<Regex> = pattern!(r"Windows NT 11");
static WINDOWS_8_1: Lazy<Regex> = pattern!(r"Windows NT 6\.3");
static WINDOWS_8: Lazy<Regex> = pattern!(r"Windows NT 6\.2");
static MAC_OS: Lazy<Regex> = pattern!(r"Mac OS X (\d+[_.]\d+([_.]\d+)?)");
static ANDROID: Lazy<Regex> = pattern!(r"Android (\d+(\.\d+)?)");
static IOS_DEVICE: Lazy<Regex> = pattern!(r"(iPhone|iPad|iPod).*OS (\d+[_.]\d+)");
static IOS_VERSION: Lazy<Regex> = pattern!(r"OS (\d+[_.]\d+)");
static LINUX: Lazy<Regex> = pattern!(r"Linux");

/// Browser fingerprints in priority order; the first match wins
static BROWSERS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    [
        ("Edge", r"Edg/([\d.]+)"),
        ("Chrome", r"Chrome/([\d.]+)"),
        ("Firefox", r"Firefox/([\d.]+)"),
        ("Safari", r"Version/([\d.]+).*Safari"),
    ]
    .into_iter()
    .map(|(name, re)| (name, Regex::new(re).expect("static pattern is valid")))
    .collect()
});

fn capture(re: &Regex, ua: &str, group: usize) -> Option<String> {
    re.captures(ua)
        .and_then(|caps| caps.get(group))
        .map(|m| m.as_str().to_string())
}

/// Classify the operating system from a user-agent string
///
/// Ordered heuristic match; anything unmatched is `Unknown`.
pub fn parse_os(ua: &str) -> NamedVersion {
    if WINDOWS_10.is_match(ua) {
        return NamedVersion::new("Windows", Some("10".to_string()));
    }
    if WINDOWS_11.is_match(ua) {
        return NamedVersion::new("Windows", Some("11".to_string()));
    }
    if WINDOWS_8_1.is_match(ua) {
        return NamedVersion::new("Windows", Some("8.1".to_string()));
    }
    if WINDOWS_8.is_match(ua) {
        return NamedVersion::new("Windows", Some("8".to_string()));
    }
    if MAC_OS.is_match(ua) {
        let version = capture(&MAC_OS, ua, 1).map(|v| v.replace('_', "."));
        return NamedVersion::new("macOS", version);
    }
    if ANDROID.is_match(ua) {
        return NamedVersion::new("Android", capture(&ANDROID, ua, 1));
    }
    if IOS_DEVICE.is_match(ua) {
        let version = capture(&IOS_VERSION, ua, 1).map(|v| v.replace('_', "."));
        return NamedVersion::new("iOS", version);
    }
    if LINUX.is_match(ua) {
        return NamedVersion::new("Linux", None);
    }
    NamedVersion::new(UNKNOWN, None)
}

/// Classify the browser from a user-agent string
pub fn parse_browser(ua: &str) -> NamedVersion {
    for (name, re) in BROWSERS.iter() {
        if let Some(version) = capture(re, ua, 1) {
            return NamedVersion::new(name, Some(version));
        }
    }
    NamedVersion::new(UNKNOWN, None)
}

/// Fills the raw user agent plus its OS and browser classification
pub struct UserAgentProbe {
    platform: Arc<dyn Platform>,
}

impl UserAgentProbe {
    pub fn new(platform: Arc<dyn Platform>) -> Self {
        Self { platform }
    }
}

#[async_trait]
impl SignalProbe for UserAgentProbe {
    fn name(&self) -> &'static str {
        "user-agent fingerprint"
    }

    async fn detect(&self, snapshot: &mut DeviceSnapshot) -> Result<(), ScanError> {
        let ua = self.platform.user_agent().unwrap_or_default();
        snapshot.os = parse_os(&ua);
        snapshot.browser = parse_browser(&ua);
        snapshot.user_agent = ua;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_nt_10_wins_over_chrome_token() {
        let ua = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
        assert_eq!(parse_os(ua).display(), "Windows 10");
        assert_eq!(parse_browser(ua).display(), "Chrome 120.0.0.0");
    }

    #[test]
    fn edge_takes_priority_over_chrome() {
        let ua = "Mozilla/5.0 (Windows NT 10.0) AppleWebKit/537.36 Chrome/120.0.0.0 Safari/537.36 Edg/120.0.2210.91";
        assert_eq!(parse_browser(ua), NamedVersion::new("Edge", Some("120.0.2210.91".to_string())));
    }

    #[test]
    fn empty_agent_is_unknown() {
        assert_eq!(parse_os("").name, "Unknown");
        assert_eq!(parse_browser("").name, "Unknown");
    }
}
