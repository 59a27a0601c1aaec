use super::emit;
use super::typing::{char_prefix, IncrementalRenderer};
use colored::Colorize;
use std::io::Write;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const START_DELAY: Duration = Duration::from_millis(300);

/// Pause after a finished line: `max(100, 5 * speed)` ms
pub fn line_pause(speed: Duration) -> Duration {
    (speed * 5).max(Duration::from_millis(100))
}

/// Typewriter that prints lines one character at a time
pub struct HackerTerminal {
    lines: Vec<String>,
    speed: Duration,
}

impl HackerTerminal {
    pub fn new(lines: Vec<String>) -> Self {
        Self::with_speed(lines, Duration::from_millis(20))
    }

    pub fn with_speed(lines: Vec<String>, speed: Duration) -> Self {
        Self { lines, speed }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Type every line; returns `false` if cancelled part way
    pub async fn play<W: Write>(&self, out: &mut W, cancel: &CancellationToken) -> bool {
        tokio::select! {
            _ = cancel.cancelled() => return false,
            _ = tokio::time::sleep(START_DELAY) => {}
        }
        for line in &self.lines {
            let len = line.chars().count();
            let renderer = IncrementalRenderer::new(len, self.speed, Duration::ZERO);
            let typed = renderer
                .run(cancel, |step| {
                    emit(out, &format!("\r{}", char_prefix(line, step).green()));
                })
                .await;
            if !typed {
                emit(out, "\n");
                return false;
            }
            emit(out, "\n");
            tokio::select! {
                _ = cancel.cancelled() => return false,
                _ = tokio::time::sleep(line_pause(self.speed)) => {}
            }
        }
        true
    }

    /// Print every line at once
    pub fn print_all<W: Write>(&self, out: &mut W) {
        for line in &self.lines {
            emit(out, &format!("{}\n", line.green()));
        }
    }
}
