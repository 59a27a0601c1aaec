use crate::config::RevealConfig;
use crate::constants::COLLECTION_FALLBACK_MESSAGE;
use crate::detect::DeviceSource;
use crate::export::ExportPayload;
use crate::model::{DeviceSnapshot, NetworkSnapshot, RevealEvent, RevealItem, RunId};
use crate::net::{snapshot_from_lookup, NetworkSource};
use crate::sections;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const EVENT_CAPACITY: usize = 256;

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every section was revealed and the follow-up notification fired
    Completed,
    /// A newer run took over; everything after that point was discarded
    Superseded,
}

/// Copy of the visible state at one instant
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunView {
    pub run: RunId,
    pub items: Vec<RevealItem>,
    pub complete: bool,
}

#[derive(Default)]
struct RunState {
    last_minted: u64,
    current: RunId,
    items: Vec<RevealItem>,
    complete: bool,
    device: Option<DeviceSnapshot>,
    visitor: Option<NetworkSnapshot>,
}

/// Reveal sequencer
///
/// Owns the run counter and the visible item sequence. Every continuation
/// of a run carries its [`RunId`] and checks it against the current one,
/// under the state lock, before touching shared state. A stale run is never
/// cancelled directly; its next check fails and it stops.
pub struct RunController {
    device: Arc<dyn DeviceSource>,
    network: Arc<dyn NetworkSource>,
    reveal_delay: Duration,
    completion_delay: Duration,
    state: Mutex<RunState>,
    events: broadcast::Sender<RevealEvent>,
}

impl RunController {
    pub fn new(
        device: Arc<dyn DeviceSource>,
        network: Arc<dyn NetworkSource>,
        config: &RevealConfig,
    ) -> Self {
        Self::with_timing(device, network, config.reveal_delay(), config.completion_delay())
    }

    pub fn with_timing(
        device: Arc<dyn DeviceSource>,
        network: Arc<dyn NetworkSource>,
        reveal_delay: Duration,
        completion_delay: Duration,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            device,
            network,
            reveal_delay,
            completion_delay,
            state: Mutex::new(RunState::default()),
            events,
        }
    }

    /// Receive lifecycle events from now on
    pub fn subscribe(&self) -> broadcast::Receiver<RevealEvent> {
        self.events.subscribe()
    }

    pub fn current_run(&self) -> RunId {
        self.state.lock().current
    }

    pub fn is_current(&self, run: RunId) -> bool {
        self.state.lock().current == run
    }

    pub fn view(&self) -> RunView {
        let state = self.state.lock();
        RunView {
            run: state.current,
            items: state.items.clone(),
            complete: state.complete,
        }
    }

    /// Snapshots gathered so far by the current run
    pub fn export_payload(&self) -> ExportPayload {
        let state = self.state.lock();
        ExportPayload {
            visitor: state.visitor.clone(),
            device: state.device.clone(),
        }
    }

    fn publish(&self, event: RevealEvent) {
        // no subscribers is fine
        let _ = self.events.send(event);
    }

    /// Mint a new run, make it current and clear the visible sequence
    ///
    /// Any run in flight becomes stale at this point.
    pub fn begin_run(&self) -> RunId {
        let mut state = self.state.lock();
        state.last_minted += 1;
        let run = RunId(state.last_minted);
        let previous = state.current;
        state.current = run;
        state.items.clear();
        state.complete = false;
        state.device = None;
        state.visitor = None;
        self.publish(RevealEvent::Started(run));
        drop(state);

        if previous != RunId::default() {
            info!(%run, superseded = %previous, "run started");
        } else {
            info!(%run, "run started");
        }
        run
    }

    /// Start a run and drive it to its end on the current task
    pub async fn start_run(&self) -> (RunId, RunOutcome) {
        let run = self.begin_run();
        let outcome = self.drive_run(run).await;
        (run, outcome)
    }

    /// Start a run and drive it on a spawned task
    ///
    /// The run is current before this returns, so a later call always wins.
    pub fn spawn_run(self: &Arc<Self>) -> (RunId, JoinHandle<RunOutcome>) {
        let run = self.begin_run();
        let this = Arc::clone(self);
        let handle = tokio::spawn(async move { this.drive_run(run).await });
        (run, handle)
    }

    /// Collection, staged reveal and completion for an already minted run
    pub async fn drive_run(&self, run: RunId) -> RunOutcome {
        let visitor = match self.device.collect().await {
            Ok(device) => {
                if !self.store(run, |state| state.device = Some(device.clone())) {
                    debug!(%run, "discarding device snapshot of stale run");
                    return RunOutcome::Superseded;
                }
                if !self
                    .reveal_sequence(sections::device_items(&device), run, self.reveal_delay)
                    .await
                {
                    return RunOutcome::Superseded;
                }
                if !self
                    .reveal_sequence(
                        sections::connection_power_items(&device),
                        run,
                        self.reveal_delay,
                    )
                    .await
                {
                    return RunOutcome::Superseded;
                }
                snapshot_from_lookup(self.network.lookup().await)
            }
            Err(err) => {
                warn!(%run, error = %err, "device collection failed");
                NetworkSnapshot::failure(COLLECTION_FALLBACK_MESSAGE)
            }
        };

        if !self.store(run, |state| state.visitor = Some(visitor.clone())) {
            debug!(%run, "discarding network snapshot of stale run");
            return RunOutcome::Superseded;
        }
        if !self
            .reveal_sequence(sections::network_items(&visitor), run, self.reveal_delay)
            .await
        {
            return RunOutcome::Superseded;
        }

        if !self.mark_complete(run) {
            return RunOutcome::Superseded;
        }
        tokio::time::sleep(self.completion_delay).await;
        if !self.notify(run) {
            return RunOutcome::Superseded;
        }
        RunOutcome::Completed
    }

    /// Append `items` one at a time, pausing `delay` after each
    ///
    /// Stops at the first item whose run is no longer current and returns
    /// `false`; a stale run therefore leaves at most a prefix of its items.
    pub async fn reveal_sequence(&self, items: Vec<RevealItem>, run: RunId, delay: Duration) -> bool {
        for item in items {
            {
                let mut state = self.state.lock();
                if state.current != run {
                    debug!(%run, current = %state.current, "halting stale reveal");
                    return false;
                }
                let index = state.items.len();
                state.items.push(item.clone());
                self.publish(RevealEvent::Revealed { run, index, item });
            }
            tokio::time::sleep(delay).await;
        }
        true
    }

    /// Mark `run` complete; no-op returning `false` when it is stale
    pub fn mark_complete(&self, run: RunId) -> bool {
        let mut state = self.state.lock();
        if state.current != run {
            return false;
        }
        if !state.complete {
            state.complete = true;
            self.publish(RevealEvent::Completed(run));
            info!(%run, items = state.items.len(), "run complete");
        }
        true
    }

    fn notify(&self, run: RunId) -> bool {
        let state = self.state.lock();
        if state.current != run || !state.complete {
            return false;
        }
        self.publish(RevealEvent::Notified(run));
        true
    }

    fn store(&self, run: RunId, apply: impl FnOnce(&mut RunState)) -> bool {
        let mut state = self.state.lock();
        if state.current != run {
            return false;
        }
        apply(&mut state);
        true
    }
}
