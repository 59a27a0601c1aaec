/// Default geolocation endpoint (no API key required for the basic fields)
pub const DEFAULT_PROVIDER_URL: &str = "https://ipapi.co/json/";

/// Display handle carried by the final injection dialog
pub const DEFAULT_NOTIFY_HANDLE: &str = "teluguscripter";

/// Heading text used as a divider sentinel between row groups
pub const DIVIDER: &str = "—";

/// Capability present but unreadable, or absent altogether
pub const NOT_AVAILABLE: &str = "N/A";

/// Graphics context exists but refuses to disclose its renderer
pub const HIDDEN: &str = "Hidden";

/// Unmatched user-agent classification
pub const UNKNOWN: &str = "Unknown";

/// Shown when the transport failed without a usable message
pub const TRANSPORT_FALLBACK_MESSAGE: &str = "Failed to fetch IP";

/// Shown when the whole collection step failed before the lookup ran
pub const COLLECTION_FALLBACK_MESSAGE: &str = "Failed to fetch IP information";

/// Fallback language when the platform reports none
pub const DEFAULT_LANGUAGE: &str = "en";

/// Fallback timezone when the platform reports none
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Key written and removed to test storage availability
pub const STORAGE_PROBE_KEY: &str = "__t";

/// Labels rendered as alarming once a run has completed
pub const CRITICAL_LABELS: &[&str] = &[
    "IP",
    "Coords",
    "Do Not Track",
    "Cookies",
    "LocalStorage",
    "SessionStorage",
    "Battery",
];

/// Glyphs used by the ambient rain animation
pub const RAIN_GLYPHS: &str = "01#@$%&*+-/\\|<>[]{}";
