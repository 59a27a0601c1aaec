use super::{emit, emit_line};
use colored::Colorize;
use rand::Rng;
use std::io::Write;
use std::time::Duration;
use tracing::debug;

const BAR_WIDTH: usize = 32;

/// Progress step for a uniform sample in `[0, 1)`
///
/// `min(100 - p, max(3, round(sample * 10)))`
pub fn increment(progress: u32, sample: f64) -> u32 {
    let jump = (sample * 10.0).round() as u32;
    jump.max(3).min(100 - progress.min(100))
}

/// Random walk from 0 to 100 driving the scan dialog
pub struct ProgressSimulator<R: Rng> {
    progress: u32,
    rng: R,
}

impl<R: Rng> ProgressSimulator<R> {
    pub fn new(rng: R) -> Self {
        Self { progress: 0, rng }
    }

    pub fn progress(&self) -> u32 {
        self.progress
    }

    pub fn is_done(&self) -> bool {
        self.progress >= 100
    }

    /// Advance one tick and return the new progress
    pub fn tick(&mut self) -> u32 {
        let sample: f64 = self.rng.gen();
        self.progress += increment(self.progress, sample);
        self.progress
    }
}

/// `[#########---------]  42%`
pub fn render_bar(progress: u32, width: usize) -> String {
    let progress = progress.min(100) as usize;
    let filled = progress * width / 100;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        "-".repeat(width - filled),
        progress
    )
}

/// "Scanning Your Device" dialog
///
/// Ticks until 100%, lingers for `close_delay`, then returns; its return is
/// what starts the scan run.
pub async fn run_scan_dialog<W: Write, R: Rng>(
    out: &mut W,
    rng: R,
    tick: Duration,
    close_delay: Duration,
    reduced_motion: bool,
) {
    emit_line(out, &format!("{}", "[!] Scanning Your Device".green().bold()));
    emit_line(
        out,
        &format!(
            "{}",
            "Initializing diagnostics. This is a visual simulation for stylistic purposes.".green().dimmed()
        ),
    );

    if reduced_motion {
        emit_line(out, &format!("{}  Collecting metadata...", render_bar(100, BAR_WIDTH)));
        return;
    }

    let mut sim = ProgressSimulator::new(rng);
    let mut ticker = tokio::time::interval(tick);
    // the first tick of an interval completes immediately
    ticker.tick().await;
    while !sim.is_done() {
        ticker.tick().await;
        let p = sim.tick();
        emit(out, &format!("\r{}  Collecting metadata...", render_bar(p, BAR_WIDTH).green()));
    }
    emit(out, "\n");
    debug!("scan dialog reached 100%");
    tokio::time::sleep(close_delay).await;
    emit_line(
        out,
        &format!("{}", "Data is displayed locally. No harmful actions are performed.".dimmed()),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn increment_bounds() {
        assert_eq!(increment(0, 0.0), 3);
        assert_eq!(increment(0, 0.99), 10);
        assert_eq!(increment(0, 0.54), 5);
        assert_eq!(increment(98, 0.9), 2);
        assert_eq!(increment(100, 0.9), 0);
    }

    #[test]
    fn simulator_reaches_exactly_100() {
        let mut sim = ProgressSimulator::new(StdRng::seed_from_u64(7));
        let mut last = 0;
        let mut ticks = 0;
        while !sim.is_done() {
            let p = sim.tick();
            assert!(p > last);
            last = p;
            ticks += 1;
        }
        assert_eq!(sim.progress(), 100);
        assert!((10..=34).contains(&ticks));
    }

    #[test]
    fn bar_rendering() {
        assert_eq!(render_bar(0, 4), "[----]   0%");
        assert_eq!(render_bar(50, 4), "[##--]  50%");
        assert_eq!(render_bar(150, 4), "[####] 100%");
    }
}
