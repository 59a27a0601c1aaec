use thiserror::Error;

use crate::constants::TRANSPORT_FALLBACK_MESSAGE;

/// Comprehensive error types for scan operations
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Collection Error: {0}")]
    Collection(String),

    #[error("Config Error: {0}")]
    Config(String),

    #[error("Config Parse Error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O Error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP Error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Clipboard Error: {0}")]
    Clipboard(String),

    #[error("Error: {0}")]
    Other(String),
}

/// Failure of a single geolocation lookup.
///
/// Provider failures keep the HTTP status; transport failures keep the
/// message text. Both end up as a visible status row, never as a panic or
/// an error returned past the sequencer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("Provider error: {status}")]
    Provider { status: u16 },

    #[error("{}", transport_message(.0))]
    Transport(String),

    #[error("Invalid provider payload: {0}")]
    Decode(String),
}

fn transport_message(message: &str) -> &str {
    if message.trim().is_empty() {
        TRANSPORT_FALLBACK_MESSAGE
    } else {
        message
    }
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            LookupError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            LookupError::Provider {
                status: status.as_u16(),
            }
        } else {
            LookupError::Transport(err.to_string())
        }
    }
}
