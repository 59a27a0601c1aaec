use crate::config::RevealConfig;
use crate::detect::host::terminal_dimensions;
use crate::detect::{DeviceCollector, HostPlatform};
use crate::engine::{RunController, RunOutcome};
use crate::errors::ScanError;
use crate::export::ExportPayload;
use crate::net::GeoLookupProvider;
use crate::table::diagnostics_table;
use crate::ui::console::ConsoleRenderer;
use crate::ui::dialogs::injection_dialog;
use crate::ui::progress::run_scan_dialog;
use crate::ui::rain::play_rain;
use crate::ui::{emit_line, stdout_is_terminal};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// What to do with the diagnostics once the show is over
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Print the JSON payload after the summary table
    pub print_json: bool,
    /// Directory receiving `diagnostics-*.json`
    pub download_dir: Option<PathBuf>,
    /// Put the JSON payload on the clipboard
    pub copy: bool,
}

/// One complete session: rain, scan dialog, staged reveal, injection
/// dialog, summary and export
pub struct Experience {
    config: RevealConfig,
    controller: Arc<RunController>,
    cancel: CancellationToken,
}

impl Experience {
    /// Session against the real host and the configured provider
    pub fn new(config: RevealConfig) -> Result<Self, ScanError> {
        let platform = Arc::new(HostPlatform::new(config.user_agent.clone()));
        let collector = Arc::new(DeviceCollector::new(platform, config.collect_timeout()));
        let provider = Arc::new(GeoLookupProvider::from_config(&config)?);
        let controller = Arc::new(RunController::new(collector, provider, &config));
        Ok(Self::with_controller(config, controller))
    }

    pub fn with_controller(config: RevealConfig, controller: Arc<RunController>) -> Self {
        Self {
            config,
            controller,
            cancel: CancellationToken::new(),
        }
    }

    pub fn controller(&self) -> &Arc<RunController> {
        &self.controller
    }

    /// Token that tears down running animations
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    fn animate(&self) -> bool {
        !self.config.reduced_motion
    }

    pub async fn run<W: Write>(
        &self,
        out: &mut W,
        export: &ExportOptions,
    ) -> Result<ExportPayload, ScanError> {
        let mut rng = StdRng::from_entropy();

        if self.animate() {
            let (width, height) = terminal_size();
            play_rain(
                out,
                &mut rng,
                width,
                height,
                self.config.rain_frames,
                Duration::from_millis(self.config.rain_frame_ms),
            )
            .await;
        }

        run_scan_dialog(
            out,
            &mut rng,
            Duration::from_millis(self.config.progress_tick_ms),
            Duration::from_millis(self.config.progress_close_delay_ms),
            self.config.reduced_motion,
        )
        .await;

        // subscribe before the run exists so no event is missed
        let events = self.controller.subscribe();
        let (run, handle) = self.controller.spawn_run();
        let mut renderer = ConsoleRenderer::new(self.animate(), self.cancel.clone())
            .with_completion_delay(self.config.completion_delay());
        let shown = renderer.run(out, events).await;

        let outcome = handle
            .await
            .map_err(|e| ScanError::Other(format!("scan task failed: {}", e)))?;
        info!(%run, %shown, ?outcome, "reveal finished");
        if outcome == RunOutcome::Completed {
            injection_dialog(out, &self.config.notify_handle, !self.animate(), &self.cancel).await;
        }

        emit_line(out, "");
        emit_line(out, &diagnostics_table(&self.controller.view()).to_string());

        let payload = self.controller.export_payload();
        self.export(out, &payload, export)?;
        Ok(payload)
    }

    fn export<W: Write>(
        &self,
        out: &mut W,
        payload: &ExportPayload,
        options: &ExportOptions,
    ) -> Result<(), ScanError> {
        if options.print_json {
            emit_line(out, &payload.to_json()?);
        }
        if let Some(dir) = &options.download_dir {
            let path = payload.download_to(dir)?;
            emit_line(out, &format!("Saved {}", path.display()));
        }
        if options.copy {
            // clipboard access is best effort on headless hosts
            match payload.copy_to_clipboard() {
                Ok(()) => emit_line(out, "Copied diagnostics to clipboard"),
                Err(err) => warn!(error = %err, "copy failed"),
            }
        }
        Ok(())
    }
}

/// Terminal columns and rows, falling back to 80x24
pub fn terminal_size() -> (usize, usize) {
    terminal_dimensions()
        .map(|(cols, rows)| (cols as usize, rows as usize))
        .unwrap_or((80, 24))
}

/// Animations only make sense on an interactive terminal
pub fn motion_allowed() -> bool {
    stdout_is_terminal() && std::env::var_os("NO_MOTION").is_none()
}
