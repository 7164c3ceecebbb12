// clock.rs - Play/pause/speed state and the background tick driver

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::simulation::Simulation;

/// Shortest accepted tick interval is anything above zero.
pub const MIN_INTERVAL: f64 = 0.0;
/// Longest accepted tick interval, inclusive.
pub const MAX_INTERVAL: f64 = 2.0;
pub const DEFAULT_INTERVAL: f64 = 1.0;

/// Whether `interval` (seconds) is one the clock will run at.
pub fn interval_in_range(interval: f64) -> bool {
    interval > MIN_INTERVAL && interval <= MAX_INTERVAL
}

pub(crate) fn round_centis(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Run state of the simulation clock.
///
/// `halted` is set only for the duration of a reset and blocks both ticking
/// and every state change.
#[derive(Debug, Clone, PartialEq)]
pub struct ClockState {
    paused: bool,
    halted: bool,
    interval: f64,
}

impl Default for ClockState {
    fn default() -> Self {
        Self { paused: true, halted: false, interval: DEFAULT_INTERVAL }
    }
}

impl ClockState {
    /// Callers range-check the rounded value first, see [`Settings::validate`](crate::Settings::validate).
    pub fn with_interval(interval: f64) -> Self {
        Self { interval: round_centis(interval), ..Self::default() }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// True when a scheduled tick should step the grid.
    pub fn is_running(&self) -> bool {
        !self.paused && !self.halted
    }

    /// Interval in seconds.
    pub fn interval(&self) -> f64 {
        self.interval
    }

    pub fn interval_duration(&self) -> Duration {
        Duration::from_secs_f64(self.interval)
    }

    /// Flips paused/running. Returns `false` (and changes nothing) while halted.
    pub fn toggle_pause(&mut self) -> bool {
        if self.halted {
            return false;
        }
        self.paused = !self.paused;
        true
    }

    /// Moves the interval by `delta` seconds, rounded to hundredths. Returns
    /// `false` when the result would leave (0, 2].
    pub fn change_speed(&mut self, delta: f64) -> bool {
        let next = round_centis(self.interval + delta);
        if !interval_in_range(next) {
            return false;
        }
        self.interval = next;
        true
    }

    pub(crate) fn halt(&mut self) {
        self.halted = true;
    }

    pub(crate) fn release(&mut self) {
        self.halted = false;
    }

    /// `"{interval}s | PAUSED"` while paused, `"{interval}s"` while running.
    pub fn title(&self) -> String {
        if self.paused {
            format!("{}s | PAUSED", self.interval)
        } else {
            format!("{}s", self.interval)
        }
    }
}

/// Background driver that ticks a [`Simulation`] on its own schedule.
///
/// Each iteration sleeps for the current interval and then asks the
/// simulation for a scheduled tick, which only steps while running. The task
/// stops as soon as [`stop`](Self::stop) is called or the clock is dropped.
pub struct SimulationClock {
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl SimulationClock {
    /// Spawns the tick loop on `runtime`.
    pub fn spawn(simulation: Simulation, runtime: &Handle) -> Self {
        simulation.attach_runtime(runtime.clone());
        let (shutdown, signal) = watch::channel(false);
        let task = runtime.spawn(run(simulation, signal));
        Self { shutdown, task: Some(task) }
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(|task| task.is_finished())
    }

    /// Signals shutdown and waits for the loop to exit.
    pub async fn stop(mut self) {
        let _ = self.shutdown.send(true);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for SimulationClock {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

async fn run(simulation: Simulation, mut shutdown: watch::Receiver<bool>) {
    info!("tick driver started");
    loop {
        let interval = simulation.interval();
        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = shutdown.changed() => {}
        }
        if *shutdown.borrow() {
            break;
        }
        if !simulation.scheduled_tick() {
            debug!("tick skipped, clock not running");
        }
    }
    info!("tick driver stopped");
}
