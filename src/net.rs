use crate::config::RevealConfig;
use crate::errors::{LookupError, ScanError};
use crate::model::NetworkSnapshot;
use async_trait::async_trait;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use tracing::{debug, warn};

/// Source of the visitor's public network details
#[async_trait]
pub trait NetworkSource: Send + Sync {
    /// One lookup attempt; no retry
    async fn lookup(&self) -> Result<NetworkSnapshot, LookupError>;
}

/// Fold a lookup result into a snapshot, keeping the failure as its message
pub fn snapshot_from_lookup(result: Result<NetworkSnapshot, LookupError>) -> NetworkSnapshot {
    match result {
        Ok(snapshot) => snapshot,
        Err(err) => {
            warn!(error = %err, "geolocation lookup failed");
            NetworkSnapshot::failure(err.to_string())
        }
    }
}

/// Geolocation lookup against an ipapi-compatible JSON endpoint
pub struct GeoLookupProvider {
    client: reqwest::Client,
    url: String,
}

impl GeoLookupProvider {
    pub fn new(url: impl Into<String>, user_agent: &str) -> Result<Self, ScanError> {
        let client = reqwest::Client::builder().user_agent(user_agent).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn from_config(config: &RevealConfig) -> Result<Self, ScanError> {
        Self::new(config.provider_url.clone(), &config.provider_user_agent)
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl NetworkSource for GeoLookupProvider {
    async fn lookup(&self) -> Result<NetworkSnapshot, LookupError> {
        debug!(url = %self.url, "querying geolocation provider");
        let response = self
            .client
            .get(&self.url)
            // always reflect the live visitor address
            .header(CACHE_CONTROL, "no-store")
            .header(PRAGMA, "no-cache")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Provider {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let snapshot: NetworkSnapshot =
            serde_json::from_str(&body).map_err(|e| LookupError::Decode(e.to_string()))?;
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_failure_keeps_status() {
        let snapshot = snapshot_from_lookup(Err(LookupError::Provider { status: 503 }));
        assert_eq!(snapshot.error.as_deref(), Some("Provider error: 503"));
        assert!(snapshot.ip.is_none());
    }

    #[test]
    fn blank_transport_message_uses_fallback() {
        let snapshot = snapshot_from_lookup(Err(LookupError::Transport(String::new())));
        assert_eq!(snapshot.error.as_deref(), Some("Failed to fetch IP"));
    }

    #[test]
    fn provider_payload_with_numeric_asn() {
        let raw = r#"{"ip":"203.0.113.9","asn":64500,"latitude":10,"longitude":20.5,"extra":true}"#;
        let snapshot: NetworkSnapshot = serde_json::from_str(raw).unwrap();
        assert_eq!(snapshot.ip.as_deref(), Some("203.0.113.9"));
        assert_eq!(snapshot.asn.map(|a| a.to_string()).as_deref(), Some("64500"));
        assert_eq!(snapshot.latitude, Some(10.0));
    }
}
