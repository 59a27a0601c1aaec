use crate::errors::ScanError;
use crate::model::{DeviceSnapshot, NetworkSnapshot};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// The `{ visitor, device }` pair offered for copy and download
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportPayload {
    pub visitor: Option<NetworkSnapshot>,
    pub device: Option<DeviceSnapshot>,
}

impl ExportPayload {
    /// Pretty-printed JSON, two-space indented
    pub fn to_json(&self) -> Result<String, ScanError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(raw: &str) -> Result<Self, ScanError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// `diagnostics-{ip}.json` with colons replaced, or `diagnostics-visitor.json`
    pub fn file_name(&self) -> String {
        let name_part = self
            .visitor
            .as_ref()
            .and_then(|v| v.ip.as_deref())
            .filter(|ip| !ip.is_empty())
            .map(|ip| ip.replace(':', "-"))
            .unwrap_or_else(|| "visitor".to_string());
        format!("diagnostics-{}.json", name_part)
    }

    /// Write the payload into `dir` under [`Self::file_name`]
    pub fn download_to(&self, dir: &Path) -> Result<PathBuf, ScanError> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name());
        std::fs::write(&path, self.to_json()?)?;
        info!(path = %path.display(), "diagnostics written");
        Ok(path)
    }

    /// Put the payload on the system clipboard
    pub fn copy_to_clipboard(&self) -> Result<(), ScanError> {
        let payload = self.to_json()?;
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| ScanError::Clipboard(e.to_string()))?;
        clipboard
            .set_text(payload)
            .map_err(|e| ScanError::Clipboard(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ipv6_colons_become_hyphens() {
        let payload = ExportPayload {
            visitor: Some(NetworkSnapshot {
                ip: Some("2001:db8::1".to_string()),
                ..NetworkSnapshot::default()
            }),
            device: None,
        };
        assert_eq!(payload.file_name(), "diagnostics-2001-db8--1.json");
    }

    #[test]
    fn missing_ip_uses_generic_name() {
        assert_eq!(ExportPayload::default().file_name(), "diagnostics-visitor.json");
        let failed = ExportPayload {
            visitor: Some(NetworkSnapshot::failure("Provider error: 503")),
            device: None,
        };
        assert_eq!(failed.file_name(), "diagnostics-visitor.json");
    }
}
