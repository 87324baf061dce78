//! Interactive 2D N-body viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the simulation state
//! (population, physics constants, spawn settings) and implements
//! [`eframe::App`] to render and control the simulation through an
//! egui UI.

use eframe::App;
use glam::Vec2;
use rand::rng;
use rand_distr::NormalError;
use sim_core::{
    config::Config,
    phases::{self, StepStats},
    population::Population,
    settings::Settings,
};

/// On-screen body radius at `zoom == 1`.
const BODY_RADIUS: f32 = 2.0;
/// Zoom change per mouse-wheel line.
const WHEEL_ZOOM_STEP: f32 = 0.1;
/// Scroll distance in points treated as one wheel line.
const POINTS_PER_LINE: f32 = 50.0;
/// Lower bound keeping `world_to_screen` well defined.
const MIN_ZOOM: f32 = 0.01;

/// Main application state for the interactive viewer.
///
/// The per-frame update is:
/// 1. Handle UI interactions / input.
/// 2. If `running` is `true` and enough time has passed, call
///    [`Viewer::step_once`].
/// 3. Render every body as a circle.
///
/// ### Fields
/// - `population` - Bodies being simulated.
/// - `cfg` - Physics constants passed into each step.
/// - `settings` - Startup settings; spawn parameters for [`Viewer::reset`].
///
/// - `rng` - Random number generator used for spawning bodies.
///
/// - `running` - Whether the simulation is currently auto-advancing.
/// - `zoom` - World units per screen pixel.
/// - `zoom_rate` - Added to `zoom` after every step.
/// - `pan` - Screen-space pan offset in pixels.
///
/// - `last_stats` - Counters from the most recent step.
///
/// - `step_interval` - Target time between automatic steps (seconds).
/// - `last_step_time` - Time stamp of the last step (egui time).
/// - `last_step_dt` - Actual time delta between the last two steps.
pub struct Viewer {
    population: Population,
    cfg: Config,
    settings: Settings,

    rng: rand::rngs::ThreadRng,

    running: bool,
    zoom: f32,
    zoom_rate: f32,
    pan: egui::Vec2,

    last_stats: StepStats,

    step_interval: f64,
    last_step_time: f64,
    last_step_dt: f64,
}

impl Viewer {
    /// Creates a running viewer with a fresh random population.
    ///
    /// ### Errors
    /// Fails if `settings.rand_deviation` cannot parameterize a normal
    /// distribution.
    pub fn new(settings: Settings) -> Result<Self, NormalError> {
        let mut rng = rng();
        let population = Population::random(
            settings.mass_count,
            settings.rand_deviation,
            settings.velocity_ratio,
            &mut rng,
        )?;

        Ok(Self {
            population,
            cfg: settings.physics(),
            rng,
            running: true,
            zoom: settings.zoom,
            zoom_rate: settings.zoom_rate,
            pan: egui::vec2(0.0, 0.0),
            last_stats: StepStats::default(),
            step_interval: 0.008,
            last_step_time: 0.0,
            last_step_dt: 0.0,
            settings,
        })
    }

    /// Replaces the population with a new random one.
    ///
    /// Physics constants and camera settings are kept; zoom returns to
    /// the configured starting value. The viewer stops auto-running.
    fn reset(&mut self) {
        match Population::random(
            self.settings.mass_count,
            self.settings.rand_deviation,
            self.settings.velocity_ratio,
            &mut self.rng,
        ) {
            Ok(population) => self.population = population,
            Err(e) => log::error!("cannot respawn population: {e}"),
        }
        self.zoom = self.settings.zoom;
        self.last_stats = StepStats::default();
        self.running = false;
    }

    /// Advances the simulation by a single step and applies `zoom_rate`.
    fn step_once(&mut self) {
        self.last_stats = phases::step(&mut self.population, &self.cfg);
        self.set_zoom(self.zoom + self.zoom_rate);
    }

    fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.max(MIN_ZOOM);
    }

    /// Changes zoom while keeping the world point under `pointer` fixed
    /// on screen.
    fn zoom_at(&mut self, zoom: f32, pointer: egui::Pos2, rect: egui::Rect) {
        let world_before = self.screen_to_world(pointer, rect);
        self.set_zoom(zoom);
        let screen_after = self.world_to_screen(world_before, rect);
        self.pan += pointer - screen_after;
    }

    /// Converts a world-space position to screen-space.
    ///
    /// World coordinates are divided by `zoom`, centered inside `rect`
    /// and offset by `pan`. Screen y grows downward, as does world y.
    fn world_to_screen(&self, p: Vec2, rect: egui::Rect) -> egui::Pos2 {
        let center = rect.center();
        egui::pos2(
            center.x + p.x / self.zoom + self.pan.x,
            center.y + p.y / self.zoom + self.pan.y,
        )
    }

    /// Inverse of [`Viewer::world_to_screen`] (up to rounding).
    fn screen_to_world(&self, p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        let center = rect.center();
        let x = (p.x - center.x - self.pan.x) * self.zoom;
        let y = (p.y - center.y - self.pan.y) * self.zoom;
        Vec2::new(x, y)
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

    /// Helper to draw a labeled `f32` [`egui::DragValue`].
    fn labeled_drag_f32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut f32,
        range: std::ops::RangeInclusive<f32>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.running { "⏸ Pause" } else { "▶ Run" })
                    .clicked()
                {
                    self.running = !self.running;
                }

                ui.add(
                    egui::DragValue::new(&mut self.step_interval)
                        .prefix("dt target = ")
                        .range(0.0..=1.0)
                        .speed(0.001),
                );

                if ui.button("Step").clicked() {
                    let now = ctx.input(|i| i.time);
                    if self.last_step_time > 0.0 {
                        self.last_step_dt = now - self.last_step_time;
                    }
                    self.step_once();
                    self.last_step_time = now;
                }

                if ui.button("Reset").clicked() {
                    self.reset();
                }

                ui.separator();
                let mut zoom = self.zoom;
                if ui
                    .add(egui::Slider::new(&mut zoom, MIN_ZOOM..=20.0).text("Zoom"))
                    .changed()
                {
                    self.set_zoom(zoom);
                }
            });
        });
    }

    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("dt target = {:.3} s", self.step_interval));
                ui.label(format!("dt last = {:.3} s", self.last_step_dt));
                ui.separator();
                ui.label(format!("bodies = {}", self.population.len()));
                ui.label(format!("pairs = {}", self.last_stats.pair_evaluations));
                ui.label(format!("merges = {}", self.last_stats.merges));
                if !self.population.is_finite() {
                    ui.colored_label(egui::Color32::RED, "non-finite state");
                }
            });
        });
    }

    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Config");

                ui.separator();
                ui.label("Physics");
                Self::labeled_drag_f32(ui, "big_g:", &mut self.cfg.big_g, 0.0..=1000.0, 0.05);
                Self::labeled_drag_f32(
                    ui,
                    "close_range:",
                    &mut self.cfg.close_range,
                    0.0..=100.0,
                    0.1,
                );

                ui.separator();
                ui.label("Camera");
                Self::labeled_drag_f32(ui, "zoom_rate:", &mut self.zoom_rate, -1.0..=1.0, 0.001);

                ui.separator();
                ui.label("Spawning (applied on reset)");
                Self::labeled_drag_usize(
                    ui,
                    "mass_count:",
                    &mut self.settings.mass_count,
                    0..=5000,
                    1.0,
                );
                Self::labeled_drag_f32(
                    ui,
                    "rand_deviation:",
                    &mut self.settings.rand_deviation,
                    0.0..=5000.0,
                    1.0,
                );
                Self::labeled_drag_f32(
                    ui,
                    "velocity_ratio:",
                    &mut self.settings.velocity_ratio,
                    1.0..=10000.0,
                    1.0,
                );

                ui.separator();
                if ui.button("Reset cfg to settings").clicked() {
                    self.cfg = self.settings.physics();
                    self.zoom_rate = self.settings.zoom_rate;
                }
            });
    }

    /// Mouse-wheel lines scrolled this frame, positive away from the user.
    fn wheel_lines(ctx: &egui::Context) -> f32 {
        ctx.input(|i| {
            i.events
                .iter()
                .map(|e| match e {
                    egui::Event::MouseWheel { unit, delta, .. } => match unit {
                        egui::MouseWheelUnit::Line => delta.y,
                        egui::MouseWheelUnit::Point => delta.y / POINTS_PER_LINE,
                        egui::MouseWheelUnit::Page => delta.y * 10.0,
                    },
                    _ => 0.0,
                })
                .sum()
        })
    }

    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(egui::Color32::BLACK))
            .show(ctx, |ui| {
                let response = ui.allocate_response(ui.available_size(), egui::Sense::drag());
                let rect = response.rect;
                let painter = ui.painter_at(rect);

                // Pan with drag.
                if response.dragged() {
                    self.pan += response.drag_delta();
                }

                // Zoom around the mouse cursor.
                if let Some(pointer) = response.hover_pos() {
                    let lines = Self::wheel_lines(ctx);
                    if lines != 0.0 {
                        self.zoom_at(self.zoom - lines * WHEEL_ZOOM_STEP, pointer, rect);
                    }
                }

                let r = (BODY_RADIUS / self.zoom).max(0.5);
                for body in self.population.bodies() {
                    let p = self.world_to_screen(body.pos, rect);
                    painter.circle_filled(p, r, egui::Color32::WHITE);
                }

                // Auto-run simulation if requested.
                if self.running {
                    let now = ctx.input(|i| i.time);
                    let elapsed = now - self.last_step_time;
                    if elapsed >= self.step_interval {
                        if self.last_step_time > 0.0 {
                            self.last_step_dt = elapsed;
                        }
                        self.step_once();
                        self.last_step_time = now;
                    }

                    ctx.request_repaint();
                }
            });
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_core::body::MassPoint;

    fn test_rect() -> egui::Rect {
        egui::Rect::from_min_size(egui::Pos2::new(0.0, 0.0), egui::vec2(800.0, 600.0))
    }

    fn small_settings() -> Settings {
        Settings {
            mass_count: 12,
            ..Settings::default()
        }
    }

    #[test]
    fn world_to_screen_divides_by_zoom_around_center() {
        let mut viewer = Viewer::new(small_settings()).unwrap();
        viewer.zoom = 2.0;
        let rect = test_rect();

        let p = viewer.world_to_screen(Vec2::new(100.0, -50.0), rect);

        assert_eq!(p, egui::pos2(400.0 + 50.0, 300.0 - 25.0));
    }

    #[test]
    fn world_to_screen_and_back_is_roundtrip() {
        let mut viewer = Viewer::new(small_settings()).unwrap();
        viewer.zoom = 2.0;
        viewer.pan = egui::vec2(15.0, -7.0);
        let rect = test_rect();

        let world_points = [
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, -5.0),
            Vec2::new(-3.5, 8.25),
        ];

        let eps = 1e-4;

        for p in world_points {
            let screen = viewer.world_to_screen(p, rect);
            let back = viewer.screen_to_world(screen, rect);

            assert!(
                (back.x - p.x).abs() < eps && (back.y - p.y).abs() < eps,
                "roundtrip mismatch: p={:?}, back={:?}",
                p,
                back
            );
        }
    }

    #[test]
    fn new_spawns_configured_population() {
        let viewer = Viewer::new(small_settings()).unwrap();

        assert_eq!(viewer.population.len(), 12);
        assert!(viewer.running);
        assert_eq!(viewer.cfg, small_settings().physics());
    }

    #[test]
    fn reset_respawns_and_pauses() {
        let mut viewer = Viewer::new(small_settings()).unwrap();

        viewer.settings.mass_count = 5;
        viewer.zoom = 7.0;
        viewer.last_stats.merges = 3;

        viewer.reset();

        assert_eq!(viewer.population.len(), 5);
        assert_eq!(viewer.zoom, small_settings().zoom);
        assert_eq!(viewer.last_stats, StepStats::default());
        assert!(!viewer.running);
    }

    #[test]
    fn step_once_advances_bodies_and_zoom() {
        let mut viewer = Viewer::new(small_settings()).unwrap();

        viewer.population = Population::from_states(vec![
            MassPoint::new(Vec2::new(0.0, 0.0), Vec2::ZERO),
            MassPoint::new(Vec2::new(10.0, 0.0), Vec2::ZERO),
        ]);
        viewer.cfg = Config::with_big_g(100.0);
        viewer.zoom = 1.0;
        viewer.zoom_rate = 0.5;

        viewer.step_once();

        assert_eq!(viewer.population.bodies()[0].pos, Vec2::new(1.0, 0.0));
        assert_eq!(viewer.population.bodies()[1].pos, Vec2::new(9.0, 0.0));
        assert_eq!(viewer.last_stats.pair_evaluations, 4);
        assert_eq!(viewer.zoom, 1.5);
    }

    #[test]
    fn zoom_at_keeps_point_under_cursor() {
        let mut viewer = Viewer::new(small_settings()).unwrap();
        viewer.zoom = 1.0;
        viewer.pan = egui::vec2(10.0, 20.0);
        let rect = test_rect();
        let pointer = egui::pos2(650.0, 120.0);
        let world = viewer.screen_to_world(pointer, rect);

        viewer.zoom_at(0.5, pointer, rect);

        assert_eq!(viewer.zoom, 0.5);
        let after = viewer.world_to_screen(world, rect);
        assert!(
            (after - pointer).length() < 1e-3,
            "cursor drifted: pointer={:?}, after={:?}",
            pointer,
            after
        );

        viewer.zoom_at(-3.0, pointer, rect);
        assert_eq!(viewer.zoom, MIN_ZOOM);
    }

    #[test]
    fn zoom_never_reaches_zero() {
        let mut viewer = Viewer::new(small_settings()).unwrap();
        viewer.zoom = 0.05;
        viewer.zoom_rate = -1.0;

        viewer.step_once();

        assert_eq!(viewer.zoom, MIN_ZOOM);
    }
}
