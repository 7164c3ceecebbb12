// render.rs - The rendering collaborator the simulation paints through

use std::sync::{Arc, Mutex, PoisonError};

/// Colour tokens handed to the renderer. RGB values are the renderer's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellColor {
    Background,
    Populated,
    Highlight,
}

impl CellColor {
    /// Fill used for a non-constant cell holding `alive`.
    pub fn for_value(alive: bool) -> Self {
        if alive { CellColor::Populated } else { CellColor::Background }
    }
}

/// Receives per-cell colour changes and frame presents.
///
/// The simulation never hands out its grid; a sink only ever sees
/// coordinates and colours.
pub trait RenderSink: Send {
    fn set_cell_color(&mut self, x: usize, y: usize, color: CellColor);

    /// `None` clears the hover affordance.
    fn set_cell_hover_color(&mut self, x: usize, y: usize, color: Option<CellColor>);

    fn present_frame(&mut self);

    fn set_window_title(&mut self, title: &str);
}

/// One call made on a [`RecordingSink`].
#[derive(Debug, Clone, PartialEq)]
pub enum RenderEvent {
    Fill { x: usize, y: usize, color: CellColor },
    Hover { x: usize, y: usize, color: Option<CellColor> },
    Present,
    Title(String),
}

/// Sink that keeps every call in order. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<RenderEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RenderEvent> {
        self.log().clone()
    }

    /// Returns the recorded events and empties the log.
    pub fn take(&self) -> Vec<RenderEvent> {
        std::mem::take(&mut *self.log())
    }

    pub fn clear(&self) {
        self.log().clear();
    }

    /// Only the fill events, as `(x, y, color)`.
    pub fn fills(&self) -> Vec<(usize, usize, CellColor)> {
        self.log()
            .iter()
            .filter_map(|event| match *event {
                RenderEvent::Fill { x, y, color } => Some((x, y, color)),
                _ => None,
            })
            .collect()
    }

    fn log(&self) -> std::sync::MutexGuard<'_, Vec<RenderEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RenderSink for RecordingSink {
    fn set_cell_color(&mut self, x: usize, y: usize, color: CellColor) {
        self.log().push(RenderEvent::Fill { x, y, color });
    }

    fn set_cell_hover_color(&mut self, x: usize, y: usize, color: Option<CellColor>) {
        self.log().push(RenderEvent::Hover { x, y, color });
    }

    fn present_frame(&mut self) {
        self.log().push(RenderEvent::Present);
    }

    fn set_window_title(&mut self, title: &str) {
        self.log().push(RenderEvent::Title(title.to_owned()));
    }
}
