//! ghostscan - a theatrical terminal "device scan"
//!
//! This library provides:
//! - Best-effort device signal collection behind a `Platform` abstraction
//! - A single-shot geolocation lookup with typed failures
//! - A cancellable reveal sequencer that stages the results on screen
//! - Export of the collected snapshots as JSON
//!
//! Nothing here performs any real security function.

pub mod app;
pub mod config;
pub mod constants;
pub mod detect;
pub mod engine;
pub mod errors;
pub mod export;
pub mod model;
pub mod net;
pub mod sections;
pub mod table;
pub mod ui;

// Re-export commonly used types for convenience
pub use app::{ExportOptions, Experience};
pub use config::RevealConfig;
pub use detect::{DeviceCollector, DeviceSource, HostPlatform, Platform, SignalProbe};
pub use engine::{RunController, RunOutcome, RunView};
pub use errors::{LookupError, ScanError};
pub use export::ExportPayload;
pub use model::{DeviceSnapshot, NetworkSnapshot, RevealEvent, RevealItem, RunId};
pub use net::{GeoLookupProvider, NetworkSource};
