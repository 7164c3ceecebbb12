// simulation.rs - Shared handle over grid, clock state and render sink

use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tracing::{debug, info, trace};

use crate::clock::ClockState;
use crate::config::Settings;
use crate::error::SimulationError;
use crate::grid::{GridSnapshot, GridState};
use crate::render::{CellColor, RenderSink};

struct Core {
    grid: GridState,
    clock: ClockState,
    generation: u64,
    sink: Box<dyn RenderSink>,
}

impl Core {
    fn paint_all(&mut self, color: CellColor) {
        let Core { grid, sink, .. } = self;
        for c in grid.coords() {
            sink.set_cell_color(c.x, c.y, color);
        }
    }

    fn accepts_edits(&self) -> bool {
        self.clock.is_paused() && !self.clock.is_halted()
    }
}

struct Shared {
    core: Mutex<Core>,
    reset_flash: Duration,
    runtime: OnceLock<Handle>,
}

/// The simulation core. Clones are handles to the same state, so one can go
/// to the tick driver while another serves input.
///
/// Every operation that arrives in the wrong state (editing while running,
/// anything while halted, a speed change out of range, a click off the grid)
/// is ignored rather than reported.
#[derive(Clone)]
pub struct Simulation {
    shared: Arc<Shared>,
}

impl Simulation {
    /// Builds a paused, empty grid and paints the initial frame into `sink`.
    pub fn new(settings: &Settings, sink: Box<dyn RenderSink>) -> Result<Self, SimulationError> {
        settings.validate()?;
        let grid = GridState::new(settings.width, settings.height)?;
        let mut core = Core {
            grid,
            clock: ClockState::with_interval(settings.interval),
            generation: 0,
            sink,
        };

        let title = core.clock.title();
        core.sink.set_window_title(&title);
        {
            let Core { grid, sink, .. } = &mut core;
            for c in grid.coords() {
                sink.set_cell_hover_color(c.x, c.y, Some(CellColor::Highlight));
            }
        }
        core.sink.present_frame();

        info!(width = settings.width, height = settings.height, interval = settings.interval, "simulation created");
        Ok(Self {
            shared: Arc::new(Shared {
                core: Mutex::new(core),
                reset_flash: Duration::from_millis(settings.reset_flash_ms),
                runtime: OnceLock::new(),
            }),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Core> {
        self.shared.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn width(&self) -> usize {
        self.lock().grid.width()
    }

    pub fn height(&self) -> usize {
        self.lock().grid.height()
    }

    pub fn is_paused(&self) -> bool {
        self.lock().clock.is_paused()
    }

    pub fn is_halted(&self) -> bool {
        self.lock().clock.is_halted()
    }

    /// Interval in seconds, already rounded to hundredths.
    pub fn interval_secs(&self) -> f64 {
        self.lock().clock.interval()
    }

    pub fn interval(&self) -> Duration {
        self.lock().clock.interval_duration()
    }

    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    pub fn title(&self) -> String {
        self.lock().clock.title()
    }

    pub fn snapshot(&self) -> GridSnapshot {
        self.lock().grid.snapshot()
    }

    /// Flips `(x, y)` between empty and constant while paused.
    ///
    /// Emits a highlight fill when the cell becomes constant and a background
    /// fill when it is released.
    pub fn toggle_constant(&self, x: isize, y: isize) {
        let mut core = self.lock();
        if !core.accepts_edits() {
            debug!(x, y, "toggle ignored, simulation not paused");
            return;
        }
        let Some(value) = core.grid.toggle_constant(x, y) else {
            return;
        };
        let color = if value { CellColor::Highlight } else { CellColor::Background };
        // In bounds, so both are non-negative.
        core.sink.set_cell_color(x as usize, y as usize, color);
        core.sink.present_frame();
        trace!(x, y, value, "constant toggled");
    }

    /// Runtime used to time the reset flash. The first handle attached wins.
    pub fn attach_runtime(&self, runtime: Handle) {
        let _ = self.shared.runtime.set(runtime);
    }

    /// Clears every cell and constant. Only honoured while paused.
    ///
    /// The grid is halted for the whole reset, including the flash between
    /// the highlight and background repaints, so neither the tick driver nor
    /// input can observe it half cleared. With a runtime available (attached
    /// or current) the flash is timed there and this returns straight after
    /// the highlight repaint; otherwise the calling thread waits it out.
    pub fn reset(&self) {
        {
            let mut core = self.lock();
            if !core.accepts_edits() {
                debug!("reset ignored, simulation not paused");
                return;
            }
            core.clock.halt();
            core.grid.reset();
            core.generation = 0;
            core.paint_all(CellColor::Highlight);
            core.sink.present_frame();
        }

        let flash = self.shared.reset_flash;
        if flash.is_zero() {
            self.finish_reset();
            return;
        }

        let runtime = self.shared.runtime.get().cloned().or_else(|| Handle::try_current().ok());
        match runtime {
            Some(runtime) => {
                let simulation = self.clone();
                runtime.spawn(async move {
                    tokio::time::sleep(flash).await;
                    simulation.finish_reset();
                });
            }
            None => {
                std::thread::sleep(flash);
                self.finish_reset();
            }
        }
    }

    fn finish_reset(&self) {
        let mut core = self.lock();
        core.paint_all(CellColor::Background);
        core.sink.present_frame();
        core.clock.release();
        info!("grid reset");
    }

    /// Switches between paused and running and repaints the affordances that
    /// depend on it: constants are highlighted and every cell shows a hover
    /// colour only while paused.
    pub fn toggle_pause(&self) {
        let mut core = self.lock();
        if !core.clock.toggle_pause() {
            debug!("pause toggle ignored, simulation halted");
            return;
        }
        let paused = core.clock.is_paused();
        let title = core.clock.title();

        let Core { grid, sink, .. } = &mut *core;
        sink.set_window_title(&title);
        let constant_color = if paused { CellColor::Highlight } else { CellColor::Populated };
        for c in grid.constants() {
            sink.set_cell_color(c.x, c.y, constant_color);
        }
        let hover = paused.then_some(CellColor::Highlight);
        for c in grid.coords() {
            sink.set_cell_hover_color(c.x, c.y, hover);
        }
        sink.present_frame();
        info!(paused, "pause toggled");
    }

    /// Adjusts the tick interval by `delta` seconds; allowed in any state.
    pub fn change_speed(&self, delta: f64) {
        let mut core = self.lock();
        if !core.clock.change_speed(delta) {
            debug!(delta, interval = core.clock.interval(), "speed change rejected");
            return;
        }
        let title = core.clock.title();
        core.sink.set_window_title(&title);
        debug!(interval = core.clock.interval(), "interval changed");
    }

    /// Steps the grid once regardless of the pause state. Does nothing while
    /// halted.
    pub fn tick(&self) {
        let mut core = self.lock();
        if core.clock.is_halted() {
            return;
        }
        Self::step(&mut core);
    }

    /// Steps the grid only when running. Returns whether a step happened.
    pub fn scheduled_tick(&self) -> bool {
        let mut core = self.lock();
        if !core.clock.is_running() {
            return false;
        }
        Self::step(&mut core);
        true
    }

    fn step(core: &mut Core) {
        let Core { grid, sink, generation, .. } = core;
        let mut changed = 0usize;
        grid.advance(|x, y, value| {
            sink.set_cell_color(x, y, CellColor::for_value(value));
            changed += 1;
        });
        *generation += 1;
        sink.present_frame();
        trace!(generation = *generation, changed, "tick");
    }
}
