// input.rs - Turns pointer and key events into simulation operations

use tracing::trace;

use crate::config::Settings;
use crate::error::SimulationError;
use crate::simulation::Simulation;

/// Raw input, already stripped of any toolkit types. Pointer positions are in
/// pixels relative to the top-left corner of the grid surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { x: i32, y: i32 },
    PointerDrag { x: i32, y: i32 },
    PointerUp,
    Reset,
    TogglePause,
    /// Shorter interval.
    SpeedUp,
    /// Longer interval.
    SpeedDown,
}

/// Routes [`InputEvent`]s to a [`Simulation`].
///
/// A press toggles the cell under the pointer; while the button stays down,
/// every move into a different cell toggles that cell too. Coming back to a
/// cell later in the same gesture toggles it again.
pub struct InputController {
    simulation: Simulation,
    scale: i32,
    speed_step: f64,
    last_cell: Option<(isize, isize)>,
}

impl InputController {
    pub fn new(simulation: Simulation, settings: &Settings) -> Result<Self, SimulationError> {
        let scale = i32::try_from(settings.scale)
            .ok()
            .filter(|&s| s > 0)
            .ok_or(SimulationError::ZeroScale)?;
        Ok(Self { simulation, scale, speed_step: settings.speed_step, last_cell: None })
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    /// Cell under pixel `(x, y)`. Pixels left of or above the surface map to
    /// negative, out-of-bounds cells.
    pub fn cell_at(&self, x: i32, y: i32) -> (isize, isize) {
        (x.div_euclid(self.scale) as isize, y.div_euclid(self.scale) as isize)
    }

    pub fn handle(&mut self, event: InputEvent) {
        trace!(?event, "input");
        match event {
            InputEvent::PointerDown { x, y } => {
                let cell = self.cell_at(x, y);
                self.last_cell = Some(cell);
                self.simulation.toggle_constant(cell.0, cell.1);
            }
            InputEvent::PointerDrag { x, y } => {
                let cell = self.cell_at(x, y);
                if self.last_cell != Some(cell) {
                    self.last_cell = Some(cell);
                    self.simulation.toggle_constant(cell.0, cell.1);
                }
            }
            InputEvent::PointerUp => self.last_cell = None,
            InputEvent::Reset => self.simulation.reset(),
            InputEvent::TogglePause => self.simulation.toggle_pause(),
            InputEvent::SpeedUp => self.simulation.change_speed(-self.speed_step),
            InputEvent::SpeedDown => self.simulation.change_speed(self.speed_step),
        }
    }
}
