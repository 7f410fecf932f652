//! Interactive force-packed cluster viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the packer state and
//! implements [`eframe::App`] to render the cluster and control the
//! layout through an egui UI.
//!
//! The viewer also plays the round-scheduler role from the core crate:
//! while a layout pass is relaxing, it calls [`Packer::step`] from the
//! frame loop, every frame in high resolution and throttled by a
//! configurable interval in low resolution.

use eframe::App;
use glam::Vec2;
use pack_core::{
    config::Resolution,
    packer::Packer,
    particle::Particle,
};
use rand::{Rng, rng};

/// Logical viewport the packer lays out into; the screen mapping scales
/// this into the actual panel.
const VIEW_SIZE: Vec2 = Vec2::new(800.0, 600.0);

/// Margin kept between spawned resting slots and the viewport edge.
const SPAWN_MARGIN: f32 = 40.0;

/// Main application state for the interactive viewer.
///
/// [`Viewer`] glues together:
/// - The layout core: a [`Packer`] full of weighted particles.
/// - UI configuration (pan/zoom, spawn settings, step timing).
/// - eframe/egui callbacks for drawing and user interaction.
///
/// The typical per-frame update is:
/// 1. Handle UI interactions / input.
/// 2. If the packer is relaxing and the cadence allows, run one round.
/// 3. Render every particle at its drawn position.
pub struct Viewer {
    packer: Packer,

    rng: rand::rngs::ThreadRng,

    spawn_count: usize,
    weight_max: f32,

    zoom: f32,
    pan: egui::Vec2,

    step_interval: f64,
    last_step_time: f64,
    last_step_dt: f64,
}

impl Viewer {
    /// Creates a new viewer with a freshly spawned particle crowd.
    ///
    /// Particles rest at random slots inside the logical viewport until
    /// the first Pack. The camera starts fitted to the viewport with no
    /// pan.
    pub fn new() -> Self {
        let mut viewer = Self {
            packer: Packer::new(),
            rng: rng(),
            spawn_count: 24,
            weight_max: 5.0,
            zoom: 1.0,
            pan: egui::vec2(0.0, 0.0),
            step_interval: 0.05,
            last_step_time: 0.0,
            last_step_dt: 0.0,
        };
        viewer.respawn();
        viewer
    }

    /// Replaces the collection with `spawn_count` random particles.
    ///
    /// Homes are spread across the logical viewport and weights drawn
    /// uniformly from `1..=weight_max`, so every particle passes the
    /// positive-weight boundary check.
    fn respawn(&mut self) {
        self.packer.clear();

        for _ in 0..self.spawn_count {
            let home = Vec2::new(
                self.rng.random_range(SPAWN_MARGIN..=VIEW_SIZE.x - SPAWN_MARGIN),
                self.rng.random_range(SPAWN_MARGIN..=VIEW_SIZE.y - SPAWN_MARGIN),
            );
            let weight = self.rng.random_range(1.0..=self.weight_max);

            if let Ok(p) = Particle::new(home, weight) {
                self.packer.insert(p);
            }
        }
    }

    /// Starts a layout pass over the current collection.
    fn pack(&mut self) {
        self.packer.centerize(VIEW_SIZE.x, VIEW_SIZE.y);
        if let Err(err) = self.packer.pack() {
            log::warn!("pack failed: {err}");
        }
        self.last_step_time = 0.0;
    }

    /// Converts a logical-viewport position to screen-space.
    ///
    /// Logical coordinates are centered on the panel, scaled by `zoom`
    /// and offset by `pan`.
    fn world_to_screen(&self, p: Vec2, rect: egui::Rect) -> egui::Pos2 {
        let center = rect.center();
        egui::pos2(
            center.x + (p.x - VIEW_SIZE.x * 0.5) * self.zoom + self.pan.x,
            center.y + (p.y - VIEW_SIZE.y * 0.5) * self.zoom + self.pan.y,
        )
    }

    /// Inverse of [`Viewer::world_to_screen`] up to floating point rounding.
    fn screen_to_world(&self, p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        let center = rect.center();
        Vec2::new(
            (p.x - center.x - self.pan.x) / self.zoom + VIEW_SIZE.x * 0.5,
            (p.y - center.y - self.pan.y) / self.zoom + VIEW_SIZE.y * 0.5,
        )
    }

    /// Color ramp from light to hot as the impact weight grows.
    fn weight_color(&self, weight: f32) -> egui::Color32 {
        let t = (weight / self.weight_max).clamp(0.0, 1.0);
        let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t) as u8;
        egui::Color32::from_rgb(lerp(0x7f, 0xff), lerp(0xb3, 0x6b), lerp(0xff, 0x5a))
    }

    /// Runs relaxation rounds from the frame loop while a pass is live.
    ///
    /// High resolution steps every frame; low resolution waits for the
    /// configured interval between rounds, so intermediate redraws are
    /// skipped until the final round flushes the settled layout.
    fn step_relaxation(&mut self, ctx: &egui::Context) {
        if !self.packer.is_relaxing() {
            return;
        }

        let now = ctx.input(|i| i.time);
        let due = match self.packer.resolution {
            Resolution::High => true,
            Resolution::Low => now - self.last_step_time >= self.step_interval,
        };

        if due {
            if self.last_step_time > 0.0 {
                self.last_step_dt = now - self.last_step_time;
            }
            self.packer.step();
            self.last_step_time = now;
        }

        ctx.request_repaint();
    }

    /// Helper to draw a labeled `usize` [`egui::DragValue`].
    fn labeled_drag_usize(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut usize,
        range: std::ops::RangeInclusive<usize>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Builds the top panel UI (layout controls, resolution, zoom).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("⚫ Pack").clicked() {
                    self.pack();
                }

                if ui.button("Reset").clicked() {
                    self.packer.reset();
                }

                if ui.button("Clear").clicked() {
                    self.packer.clear();
                }

                if ui.button("Respawn").clicked() {
                    self.respawn();
                }

                ui.separator();
                Self::labeled_drag_usize(ui, "spawn:", &mut self.spawn_count, 1..=200, 1.0);

                ui.separator();
                ui.label("Resolution");
                if ui
                    .selectable_label(self.packer.resolution == Resolution::High, "High")
                    .clicked()
                {
                    self.packer.resolution = Resolution::High;
                }
                if ui
                    .selectable_label(self.packer.resolution == Resolution::Low, "Low")
                    .clicked()
                {
                    self.packer.resolution = Resolution::Low;
                }

                ui.add(
                    egui::DragValue::new(&mut self.step_interval)
                        .prefix("low-res dt = ")
                        .range(0.01..=1.0)
                        .speed(0.01),
                );

                ui.separator();
                ui.add(egui::Slider::new(&mut self.zoom, 0.1..=10.0).text("Zoom"));
            });
        });
    }

    /// Builds the bottom status bar (population, weight, round progress).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("dt last = {:.3} s", self.last_step_dt));
                ui.separator();
                match self.packer.progress() {
                    Some((iteration, budget)) => {
                        ui.label(format!("round {iteration}/{budget}"));
                    }
                    None => {
                        ui.label("settled");
                    }
                }
                ui.separator();
                ui.label(format!("total weight = {:.1}", self.packer.total_weight()));
                ui.label(format!("particles = {}", self.packer.len()));
            });
        });
    }

    /// Builds the central panel where the cluster is drawn.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::click_and_drag());
            let rect = response.rect;
            let painter = ui.painter_at(rect);

            // Pan with drag.
            if response.dragged() {
                let delta = response.drag_delta();
                self.pan += delta;
            }

            // Zoom around the mouse cursor.
            if ui.ctx().input(|i| i.raw_scroll_delta.y != 0.0) {
                let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
                if scroll != 0.0 {
                    let pointer_screen = response.hover_pos().unwrap_or(rect.center());

                    let world_before = self.screen_to_world(pointer_screen, rect);

                    let factor = (1.0 + scroll * 0.001).clamp(0.5, 2.0);
                    self.zoom = (self.zoom * factor).clamp(0.1, 10.0);

                    let screen_after = self.world_to_screen(world_before, rect);
                    self.pan += pointer_screen - screen_after;
                }
            }

            // Center marker while a layout is alive.
            if let Some(center) = self.packer.center() {
                let c = self.world_to_screen(center, rect);
                painter.circle_stroke(c, 3.0, egui::Stroke::new(1.0, egui::Color32::DARK_GRAY));
            }

            // Draw every particle at its drawn (flushed) position, so the
            // redraw cadence of the packer is what is actually visible.
            for p in self.packer.particles() {
                let pos = self.world_to_screen(p.drawn, rect);
                let radius = (p.radius * self.zoom).max(2.0);
                painter.circle_filled(pos, radius, self.weight_color(p.weight()));
            }

            self.step_relaxation(ctx);
        });
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_central_panel(ctx);
    }
}
