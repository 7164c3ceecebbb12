// ui.rs - egui front end: draws the canvas and forwards input

use eframe::egui;
use egui::{Rect, Sense, Vec2};
use rule90::{InputController, InputEvent, Simulation, SimulationClock};

use crate::canvas::{self, CanvasSink};

pub const BUTTON_ROW_HEIGHT: f32 = 40.0;

pub struct R90App {
    simulation: Simulation,
    input: InputController,
    canvas: CanvasSink,
    scale: f32,
    dragging: bool,
    // Dropped before the runtime so the tick driver is told to stop first.
    _clock: SimulationClock,
    _runtime: tokio::runtime::Runtime,
}

impl R90App {
    pub fn new(
        simulation: Simulation,
        input: InputController,
        canvas: CanvasSink,
        scale: usize,
        clock: SimulationClock,
        runtime: tokio::runtime::Runtime,
    ) -> Self {
        Self {
            simulation,
            input,
            canvas,
            scale: scale as f32,
            dragging: false,
            _clock: clock,
            _runtime: runtime,
        }
    }

    pub fn attach(&self, ctx: egui::Context) {
        self.canvas.attach(ctx);
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        let mut events = Vec::new();
        ctx.input(|i| {
            if i.key_pressed(egui::Key::Enter) {
                events.push(InputEvent::TogglePause);
            }
            if i.key_pressed(egui::Key::Backspace) {
                events.push(InputEvent::Reset);
            }
            for event in &i.events {
                // Keys move the delay, so "-" is faster and "+" slower.
                if let egui::Event::Text(text) = event {
                    match text.as_str() {
                        "-" => events.push(InputEvent::SpeedUp),
                        "+" => events.push(InputEvent::SpeedDown),
                        _ => {}
                    }
                }
            }
        });
        for event in events {
            self.input.handle(event);
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        let paused = self.simulation.is_paused();
        ui.horizontal(|ui| {
            let pause_text = if paused { "Play (Return)" } else { "Pause (Return)" };
            if ui.button(pause_text).clicked() {
                self.input.handle(InputEvent::TogglePause);
            }
            if ui.add_enabled(paused, egui::Button::new("Clear (Backspace)")).clicked() {
                self.input.handle(InputEvent::Reset);
            }
            if ui.button("Delay (-)").clicked() {
                self.input.handle(InputEvent::SpeedUp);
            }
            if ui.button("Delay (+)").clicked() {
                self.input.handle(InputEvent::SpeedDown);
            }
            ui.separator();
            ui.label(format!("Generation: {}", self.simulation.generation()));
        });
    }

    fn grid(&mut self, ui: &mut egui::Ui) {
        let width = self.simulation.width();
        let height = self.simulation.height();
        let size = Vec2::new(width as f32 * self.scale, height as f32 * self.scale);
        let (response, painter) = ui.allocate_painter(size, Sense::click_and_drag());
        let origin = response.rect.min;

        let hovered = response.hover_pos().map(|pos| {
            let offset = pos - origin;
            ((offset.x / self.scale).floor() as isize, (offset.y / self.scale).floor() as isize)
        });

        // Canvas lock is released before any input reaches the simulation.
        {
            let canvas = self.canvas.lock();
            for y in 0..height {
                for x in 0..width {
                    let mut fill = canvas.fill(x, y);
                    if hovered == Some((x as isize, y as isize)) {
                        if let Some(hover) = canvas.hover(x, y) {
                            fill = hover;
                        }
                    }
                    let rect = Rect::from_min_size(
                        origin + Vec2::new(x as f32 * self.scale, y as f32 * self.scale),
                        Vec2::splat(self.scale),
                    );
                    painter.rect_filled(rect, 0.0, canvas::colour(fill));
                }
            }
        }

        // Press and drag toggle cells; the controller skips repeats within a cell.
        if response.is_pointer_button_down_on() {
            if let Some(pos) = response.interact_pointer_pos() {
                let offset = pos - origin;
                let (x, y) = (offset.x.floor() as i32, offset.y.floor() as i32);
                let event = if self.dragging {
                    InputEvent::PointerDrag { x, y }
                } else {
                    InputEvent::PointerDown { x, y }
                };
                self.dragging = true;
                self.input.handle(event);
            }
        } else if self.dragging {
            self.dragging = false;
            self.input.handle(InputEvent::PointerUp);
        }
    }
}

impl eframe::App for R90App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_keys(ctx);

        if let Some(title) = self.canvas.take_title() {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title));
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                ui.spacing_mut().item_spacing = Vec2::ZERO;
                self.grid(ui);
                ui.add_space(6.0);
                self.controls(ui);
            });
    }
}
