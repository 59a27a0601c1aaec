use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Delay before the first character of a typed row appears
pub const TYPING_STAGGER: Duration = Duration::from_millis(120);

/// Per-character delay for a typed value: long values type faster
///
/// `clamp(320 / max(10, len), 14, 36)` milliseconds.
pub fn typing_delay(len: usize) -> Duration {
    let per_char = 320 / len.max(10) as u64;
    Duration::from_millis(per_char.clamp(14, 36))
}

/// Scheduled incremental renderer
///
/// Calls back with a monotonically increasing step from `0` to `units`
/// inclusive, spaced by a fixed interval. Cancelling the token stops it
/// between steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncrementalRenderer {
    units: usize,
    interval: Duration,
    initial_delay: Duration,
}

impl IncrementalRenderer {
    pub fn new(units: usize, interval: Duration, initial_delay: Duration) -> Self {
        Self {
            units,
            interval,
            initial_delay,
        }
    }

    /// Spread `units` steps evenly over `target`
    pub fn over(units: usize, target: Duration) -> Self {
        let interval = target / (units.max(1) as u32);
        Self::new(units, interval, Duration::ZERO)
    }

    /// Typing effect for a value of `len` characters
    pub fn typing(len: usize) -> Self {
        Self::new(len, typing_delay(len), TYPING_STAGGER)
    }

    pub fn units(&self) -> usize {
        self.units
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Drive the callback; returns `false` when cancelled before the end
    pub async fn run<F>(&self, cancel: &CancellationToken, mut on_step: F) -> bool
    where
        F: FnMut(usize),
    {
        if !self.pause(cancel, self.initial_delay).await {
            return false;
        }
        for step in 0..=self.units {
            if cancel.is_cancelled() {
                return false;
            }
            on_step(step);
            if step < self.units && !self.pause(cancel, self.interval).await {
                return false;
            }
        }
        true
    }

    async fn pause(&self, cancel: &CancellationToken, duration: Duration) -> bool {
        if duration.is_zero() {
            return !cancel.is_cancelled();
        }
        tokio::select! {
            _ = cancel.cancelled() => false,
            _ = tokio::time::sleep(duration) => true,
        }
    }
}

/// Prefix of `text` holding its first `chars` characters
pub fn char_prefix(text: &str, chars: usize) -> &str {
    match text.char_indices().nth(chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
