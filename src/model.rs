use crate::constants::TRANSPORT_FALLBACK_MESSAGE;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Device facts captured once per run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSnapshot {
    pub user_agent: String,
    pub os: NamedVersion,
    pub browser: NamedVersion,
    pub screen: Option<ScreenInfo>,
    pub input: InputInfo,
    pub locale: LocaleInfo,
    pub privacy: PrivacyInfo,
    pub hardware: HardwareInfo,
    pub connection: ConnectionInfo,
    pub battery: BatteryInfo,
    pub graphics: GraphicsInfo,
}

/// Classifier output for an operating system or browser
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedVersion {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl NamedVersion {
    pub fn new(name: &str, version: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            version,
        }
    }

    /// `"{name} {version}"`, or just the name when the version is unknown
    pub fn display(&self) -> String {
        if self.name.is_empty() {
            return String::new();
        }
        format!("{} {}", self.name, self.version.as_deref().unwrap_or(""))
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenInfo {
    pub width: u32,
    pub height: u32,
    pub color_depth: u32,
    pub pixel_ratio: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputInfo {
    pub touch: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleInfo {
    pub language: Option<String>,
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivacyInfo {
    pub do_not_track: Option<bool>,
    pub cookies_enabled: Option<bool>,
    pub local_storage: Option<bool>,
    pub session_storage: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HardwareInfo {
    pub cores: Option<u32>,
    #[serde(rename = "memoryGB")]
    pub memory_gb: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionInfo {
    pub effective_type: Option<String>,
    pub downlink_mbps: Option<f64>,
    pub rtt_ms: Option<u32>,
    pub save_data: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatteryInfo {
    /// Charge between 0.0 and 1.0
    pub level: Option<f64>,
    pub charging: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphicsInfo {
    pub renderer: Option<String>,
}

/// Visitor network facts, or the reason they could not be fetched
///
/// Decoding is lenient: providers disagree on field types, so numbers may
/// arrive as strings and `error` may be a flag paired with `reason`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "ProviderPayload")]
pub struct NetworkSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asn: Option<Asn>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NetworkSnapshot {
    /// A snapshot carrying only an error message
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Raw provider body before normalisation
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProviderPayload {
    ip: Option<Value>,
    city: Option<Value>,
    region: Option<Value>,
    country_name: Option<Value>,
    country_code: Option<Value>,
    latitude: Option<Value>,
    longitude: Option<Value>,
    org: Option<Value>,
    asn: Option<Value>,
    timezone: Option<Value>,
    postal: Option<Value>,
    version: Option<Value>,
    network: Option<Value>,
    error: Option<Value>,
    reason: Option<Value>,
}

fn loose_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn loose_number(value: Option<Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn loose_asn(value: Option<Value>) -> Option<Asn> {
    match value? {
        Value::Number(n) => n.as_u64().map(Asn::Number),
        Value::String(s) if !s.is_empty() => Some(Asn::Text(s)),
        _ => None,
    }
}

/// `error` is either a message or a `true` flag explained by `reason`;
/// an empty message or `false` means no error
fn loose_error(error: Option<Value>, reason: Option<Value>) -> Option<String> {
    match error? {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Bool(true) => Some(
            loose_text(reason)
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| TRANSPORT_FALLBACK_MESSAGE.to_string()),
        ),
        _ => None,
    }
}

impl From<ProviderPayload> for NetworkSnapshot {
    fn from(raw: ProviderPayload) -> Self {
        Self {
            ip: loose_text(raw.ip),
            city: loose_text(raw.city),
            region: loose_text(raw.region),
            country_name: loose_text(raw.country_name),
            country_code: loose_text(raw.country_code),
            latitude: loose_number(raw.latitude),
            longitude: loose_number(raw.longitude),
            org: loose_text(raw.org),
            asn: loose_asn(raw.asn),
            timezone: loose_text(raw.timezone),
            postal: loose_text(raw.postal),
            version: loose_text(raw.version),
            network: loose_text(raw.network),
            error: loose_error(raw.error, raw.reason),
        }
    }
}

/// Autonomous-system number; providers send either `"AS15169"` or `15169`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Asn {
    Number(u64),
    Text(String),
}

impl fmt::Display for Asn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Asn::Number(n) => write!(f, "{}", n),
            Asn::Text(s) => f.write_str(s),
        }
    }
}

/// One unit of staged output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RevealItem {
    Heading { text: String },
    Kv { label: String, value: String, mono: bool },
}

impl RevealItem {
    pub fn heading(text: &str) -> Self {
        RevealItem::Heading {
            text: text.to_string(),
        }
    }

    pub fn divider() -> Self {
        Self::heading(crate::constants::DIVIDER)
    }

    /// A key/value row, or `None` when the value is empty
    pub fn kv(label: &str, value: impl Into<String>) -> Option<Self> {
        Self::row(label, value.into(), false)
    }

    /// A key/value row rendered in monospace, or `None` when the value is empty
    pub fn kv_mono(label: &str, value: impl Into<String>) -> Option<Self> {
        Self::row(label, value.into(), true)
    }

    fn row(label: &str, value: String, mono: bool) -> Option<Self> {
        if value.is_empty() {
            return None;
        }
        Some(RevealItem::Kv {
            label: label.to_string(),
            value,
            mono,
        })
    }

    pub fn is_divider(&self) -> bool {
        matches!(self, RevealItem::Heading { text } if text == crate::constants::DIVIDER)
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            RevealItem::Kv { label, .. } => Some(label),
            RevealItem::Heading { .. } => None,
        }
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            RevealItem::Kv { value, .. } => Some(value),
            RevealItem::Heading { .. } => None,
        }
    }
}

/// Identifier minted once per run; later runs compare greater
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunId(pub u64);

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run#{}", self.0)
    }
}

/// Lifecycle notifications published by the sequencer
#[derive(Debug, Clone, PartialEq)]
pub enum RevealEvent {
    /// A new run became current and the visible sequence was cleared
    Started(RunId),
    /// An item was appended at `index` of the visible sequence
    Revealed {
        run: RunId,
        index: usize,
        item: RevealItem,
    },
    /// Every section of the run has been revealed
    Completed(RunId),
    /// The delayed follow-up after completion fired
    Notified(RunId),
}

impl RevealEvent {
    pub fn run(&self) -> RunId {
        match self {
            RevealEvent::Started(run)
            | RevealEvent::Completed(run)
            | RevealEvent::Notified(run) => *run,
            RevealEvent::Revealed { run, .. } => *run,
        }
    }
}
