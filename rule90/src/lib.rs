//! Rule 90 on a 2D grid with user-placed constant cells.
//!
//! Each row evolves from the row above it: a cell becomes the XOR of its two
//! upper diagonal neighbours, and constant cells never change. A
//! [`Simulation`] owns the grid and is shared between a [`SimulationClock`]
//! that ticks it in the background and an [`InputController`] that applies
//! user edits. Everything visible goes out through a [`RenderSink`].

pub mod clock;
pub mod config;
pub mod error;
pub mod grid;
pub mod input;
pub mod render;
pub mod simulation;
pub mod step;

pub use clock::{ClockState, SimulationClock};
pub use config::Settings;
pub use error::{ConfigError, SimulationError};
pub use grid::{Coord, GridSnapshot, GridState};
pub use input::{InputController, InputEvent};
pub use render::{CellColor, RecordingSink, RenderEvent, RenderSink};
pub use simulation::Simulation;
pub use step::next_value;
