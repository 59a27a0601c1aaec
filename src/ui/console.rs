use super::typing::{char_prefix, IncrementalRenderer};
use super::{emit, emit_line};
use crate::model::{RevealEvent, RevealItem, RunId};
use colored::Colorize;
use std::io::Write;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::warn;

const LABEL_WIDTH: usize = 16;
const DIVIDER_WIDTH: usize = 48;

/// Uncoloured text of an item as it appears on screen
pub fn plain_line(item: &RevealItem) -> String {
    match item {
        RevealItem::Heading { .. } if item.is_divider() => format!("  {}", "─".repeat(DIVIDER_WIDTH)),
        RevealItem::Heading { text } => format!("\n  {}", text.to_uppercase()),
        RevealItem::Kv { label, value, .. } => row_prefix(label) + value,
    }
}

fn row_prefix(label: &str) -> String {
    format!("  {:<width$} ", label, width = LABEL_WIDTH)
}

/// Prints reveal events as they arrive
///
/// Follows the newest run it has seen: items from any older run are
/// dropped, and a new run starts a fresh block. Typed rows can fall behind
/// the sequencer, so the completion pause is measured from when the
/// completion line is drawn, not from when the event was sent.
pub struct ConsoleRenderer {
    animate: bool,
    cancel: CancellationToken,
    completion_delay: Duration,
    latest: RunId,
    shown: usize,
    completed_at: Option<Instant>,
}

impl ConsoleRenderer {
    pub fn new(animate: bool, cancel: CancellationToken) -> Self {
        Self {
            animate,
            cancel,
            completion_delay: Duration::ZERO,
            latest: RunId::default(),
            shown: 0,
            completed_at: None,
        }
    }

    /// Minimum on-screen pause between the completion line and returning
    pub fn with_completion_delay(mut self, delay: Duration) -> Self {
        self.completion_delay = delay;
        self
    }

    /// Rows printed for the latest run
    pub fn shown(&self) -> usize {
        self.shown
    }

    /// Consume events until the latest run's notification fires or the
    /// channel closes; returns that run
    pub async fn run<W: Write>(
        &mut self,
        out: &mut W,
        mut events: broadcast::Receiver<RevealEvent>,
    ) -> RunId {
        loop {
            let event = match events.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "renderer fell behind the sequencer");
                    continue;
                }
                Err(RecvError::Closed) => return self.latest,
            };
            if event.run() < self.latest {
                continue;
            }
            match event {
                RevealEvent::Started(run) => {
                    if self.latest != RunId::default() {
                        emit_line(out, &format!("\n{}", "[~] rescan requested, restarting...".yellow()));
                    }
                    self.latest = run;
                    self.shown = 0;
                    self.completed_at = None;
                    emit_line(out, &format!("{}", "Initializing scanner...".green().dimmed()));
                }
                RevealEvent::Revealed { item, .. } => {
                    self.render(out, &item).await;
                    self.shown += 1;
                }
                RevealEvent::Completed(_) => {
                    emit_line(out, &format!("\n{}", "[+] scan complete".green().bold()));
                    self.completed_at = Some(Instant::now());
                }
                RevealEvent::Notified(run) => {
                    if let Some(at) = self.completed_at {
                        tokio::select! {
                            _ = self.cancel.cancelled() => {}
                            _ = tokio::time::sleep_until(at + self.completion_delay) => {}
                        }
                    }
                    return run;
                }
            }
        }
    }

    async fn render<W: Write>(&self, out: &mut W, item: &RevealItem) {
        match item {
            RevealItem::Heading { .. } if item.is_divider() => {
                emit_line(out, &format!("{}", plain_line(item).green().dimmed()));
            }
            RevealItem::Heading { .. } => {
                emit_line(out, &format!("{}", plain_line(item).green().bold()));
            }
            RevealItem::Kv { label, value, mono } => {
                let prefix = format!("{}", row_prefix(label).green());
                let paint = |text: &str| {
                    if *mono {
                        text.bright_green().dimmed().to_string()
                    } else {
                        text.bright_green().to_string()
                    }
                };
                if !self.animate {
                    emit_line(out, &format!("{}{}", prefix, paint(value)));
                    return;
                }
                let renderer = IncrementalRenderer::typing(value.chars().count());
                renderer
                    .run(&self.cancel, |step| {
                        emit(out, &format!("\r{}{}", prefix, paint(char_prefix(value, step))));
                    })
                    .await;
                // a cancelled row still ends up complete on screen
                emit(out, &format!("\r{}{}\n", prefix, paint(value)));
            }
        }
    }
}
