// canvas.rs - In-memory render surface the egui frame is drawn from

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use egui::Color32;
use rule90::{CellColor, RenderSink};

pub const BACKGROUND_COLOUR: Color32 = Color32::BLACK;
pub const POPULATED_COLOUR: Color32 = Color32::WHITE;
pub const HIGHLIGHT_COLOUR: Color32 = Color32::from_rgb(255, 0, 255);

pub fn colour(color: CellColor) -> Color32 {
    match color {
        CellColor::Background => BACKGROUND_COLOUR,
        CellColor::Populated => POPULATED_COLOUR,
        CellColor::Highlight => HIGHLIGHT_COLOUR,
    }
}

pub struct Canvas {
    width: usize,
    fills: Vec<CellColor>,
    hover: Vec<Option<CellColor>>,
    title: Option<String>,
    repaint: Option<egui::Context>,
}

impl Canvas {
    pub fn fill(&self, x: usize, y: usize) -> CellColor {
        self.fills[y * self.width + x]
    }

    pub fn hover(&self, x: usize, y: usize) -> Option<CellColor> {
        self.hover[y * self.width + x]
    }

    fn wake(&self) {
        if let Some(ctx) = &self.repaint {
            ctx.request_repaint();
        }
    }
}

/// Render sink backed by a [`Canvas`] shared with the UI thread.
#[derive(Clone)]
pub struct CanvasSink {
    canvas: Arc<Mutex<Canvas>>,
}

impl CanvasSink {
    pub fn new(width: usize, height: usize) -> Self {
        let len = width * height;
        Self {
            canvas: Arc::new(Mutex::new(Canvas {
                width,
                fills: vec![CellColor::Background; len],
                hover: vec![None; len],
                title: None,
                repaint: None,
            })),
        }
    }

    /// Lets presents from the tick driver wake the egui event loop.
    pub fn attach(&self, ctx: egui::Context) {
        self.lock().repaint = Some(ctx);
    }

    pub fn lock(&self) -> MutexGuard<'_, Canvas> {
        self.canvas.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Title set since the last call, if any.
    pub fn take_title(&self) -> Option<String> {
        self.lock().title.take()
    }
}

impl RenderSink for CanvasSink {
    fn set_cell_color(&mut self, x: usize, y: usize, color: CellColor) {
        let mut canvas = self.lock();
        let i = y * canvas.width + x;
        canvas.fills[i] = color;
    }

    fn set_cell_hover_color(&mut self, x: usize, y: usize, color: Option<CellColor>) {
        let mut canvas = self.lock();
        let i = y * canvas.width + x;
        canvas.hover[i] = color;
    }

    fn present_frame(&mut self) {
        self.lock().wake();
    }

    fn set_window_title(&mut self, title: &str) {
        let mut canvas = self.lock();
        canvas.title = Some(title.to_owned());
        canvas.wake();
    }
}
