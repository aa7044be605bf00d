use std::path::PathBuf;

use clap::Parser;
use eframe::egui::{self, Color32, Pos2, Rect, Stroke};
use egui_plot::{Legend, Line, Plot, PlotPoints};
use nalgebra::Vector3;
use tracing::info;

use rocket_launch::camera::{frame_view, CameraShot, OrbitCamera};
use rocket_launch::config::Config;
use rocket_launch::logging::init_logging;
use rocket_launch::scene::{self, Prop, Shape};
use rocket_launch::sim::{FlightPhase, FlightTimeline, SampleHistory, ScaledClock, Snapshot};

/// Interactive launch scene viewer.
#[derive(Debug, Parser)]
#[command(name = "rocket-viz", version, about)]
struct Args {
    /// RON configuration file; defaults are used when absent.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::load_or_default(args.config.as_deref())?;
    init_logging(&config.debug.log_level);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.viewer.width, config.viewer.height]),
        ..Default::default()
    };
    let app = LaunchViewer::new(config);
    eframe::run_native("Rocket Launch", options, Box::new(|_| Ok(Box::new(app))))
        .map_err(|e| anyhow::anyhow!("viewer failed: {e}"))
}

/// Sim-time spacing of the altitude plot samples, s.
const PLOT_SAMPLE_DT: f64 = 0.1;
/// Plot window: the last five minutes of simulation time.
const PLOT_HISTORY_LEN: usize = 3_000;
/// Mouse drag sensitivity: radians per pixel.
const ROTATE_SPEED: f64 = 0.005;
/// Pan moves the target by this fraction of the view distance per pixel.
const PAN_SPEED: f64 = 0.0002;
const PAN_FACTOR: f64 = 10.0;
const ZOOM_SPEED: f64 = 0.005;

const STAGE_COLOR: Color32 = Color32::from_rgb(230, 230, 230);
const PAYLOAD_COLOR: Color32 = Color32::from_rgb(200, 40, 40);
const SATELLITE_COLOR: Color32 = Color32::from_rgb(220, 180, 60);
const PLUME_COLOR: Color32 = Color32::from_rgb(255, 150, 30);

struct LaunchViewer {
    config: Config,
    timeline: FlightTimeline,
    clock: ScaledClock,
    camera: OrbitCamera,
    display_frame: bool,
    follow: bool,
    site: Vec<Prop>,
    planet: Prop,
    history: SampleHistory,
}

impl LaunchViewer {
    fn new(config: Config) -> Self {
        info!(?config.timeline, "Starting viewer");
        Self {
            timeline: FlightTimeline::new(config.timeline.clone()),
            clock: ScaledClock::new(config.viewer.time_scale),
            camera: OrbitCamera::default(),
            display_frame: config.viewer.display_frame,
            follow: config.viewer.follow_camera,
            site: scene::launch_site(),
            planet: scene::planet(config.timeline.earth_radius),
            history: SampleHistory::new(PLOT_SAMPLE_DT, PLOT_HISTORY_LEN),
            config,
        }
    }

    fn restart(&mut self) {
        self.clock.reset();
        self.timeline = FlightTimeline::new(self.config.timeline.clone());
        self.history.clear();
    }

    fn step(&mut self, real_dt: f64) -> Snapshot {
        let t = self.clock.advance(real_dt);
        self.timeline.advance(t);
        let snap = self.timeline.snapshot();
        self.history.record(&snap);
        snap
    }

    /// Keyboard camera shots and window commands.
    fn handle_keys(&mut self, ctx: &egui::Context, snap: &Snapshot) {
        let earth_radius = self.config.timeline.earth_radius;
        let (held, base, toggle_follow, close) = ctx.input(|i| {
            let held = [
                (egui::Key::Num1, CameraShot::FirstStage),
                (egui::Key::Num2, CameraShot::SecondStage),
                (egui::Key::Num3, CameraShot::Payload),
                (egui::Key::Num4, CameraShot::Satellite),
            ]
            .into_iter()
            .find(|(key, _)| i.key_down(*key))
            .map(|(_, shot)| shot);
            (
                held,
                i.key_pressed(egui::Key::B),
                i.key_pressed(egui::Key::L),
                i.key_pressed(egui::Key::Escape),
            )
        });

        if close {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
        if toggle_follow {
            self.follow = !self.follow;
            info!(follow = self.follow, "Follow camera toggled");
        }
        let requested = held.or(base.then_some(CameraShot::LaunchBase));
        if let Some(view) = frame_view(self.follow, requested, snap, earth_radius) {
            self.camera.look_at(&view);
        }
    }

    fn handle_mouse(&mut self, ui: &egui::Ui, response: &egui::Response) {
        let delta = response.drag_delta();
        let (dx, dy) = (delta.x as f64, delta.y as f64);
        if response.dragged_by(egui::PointerButton::Primary) {
            if ui.input(|i| i.modifiers.ctrl) {
                self.camera.pan(-dx * PAN_SPEED * PAN_FACTOR, dy * PAN_SPEED * PAN_FACTOR);
            } else {
                self.camera.rotate(-dx * ROTATE_SPEED, dy * ROTATE_SPEED);
            }
        } else if response.dragged_by(egui::PointerButton::Secondary) {
            self.camera.zoom(dy * ZOOM_SPEED);
        }
        if response.hovered() {
            let scroll = ui.input(|i| i.smooth_scroll_delta.y) as f64;
            if scroll != 0.0 {
                self.camera.zoom(-scroll * ZOOM_SPEED);
            }
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui, snap: &Snapshot) {
        ui.heading("Launch");
        ui.checkbox(&mut self.display_frame, "Display frame");
        let mut scale = self.clock.scale();
        ui.add(egui::Slider::new(&mut scale, 0.0..=3.0).text("Time Scale").fixed_decimals(1));
        self.clock.set_scale(scale);
        ui.checkbox(&mut self.follow, "Follow (L)");
        if ui.button("Restart").clicked() {
            self.restart();
        }

        ui.separator();
        if self.clock.is_paused() {
            ui.label(format!("t = {:.2} s (paused)", snap.time));
        } else {
            ui.label(format!("t = {:.2} s", snap.time));
        }
        ui.label(format!("Phase: {}", snap.phase.as_str()));
        ui.label(format!("Thrust: {}", snap.thrust.map_or("none", |t| t.as_str())));
        ui.label(format!(
            "Stages: {} / {}",
            snap.first_stage_phase.as_str(),
            snap.second_stage_phase.as_str()
        ));
        let tracked = match snap.phase {
            FlightPhase::Ascent => &snap.payload,
            FlightPhase::Orbit => &snap.satellite,
        };
        ui.label(format!("Speed: {:.1}", tracked.speed()));
        if let Some(orbit) = &snap.orbit {
            ui.label(format!("Orbit r = {:.1}  angle = {:.2} rad", orbit.radius, orbit.angle));
        }

        ui.separator();
        ui.label("Altitude");
        let first: PlotPoints = self
            .history
            .iter()
            .map(|s| [s.time, s.first_stage.position.z])
            .collect();
        let second: PlotPoints = self
            .history
            .iter()
            .map(|s| [s.time, s.second_stage.position.z])
            .collect();
        let payload: PlotPoints = self
            .history
            .iter()
            .map(|s| [s.time, s.payload.position.z])
            .collect();
        let satellite: PlotPoints = self
            .history
            .iter()
            .filter(|s| s.phase == FlightPhase::Orbit)
            .map(|s| [s.time, s.satellite.position.z])
            .collect();
        Plot::new("altitude")
            .height(260.0)
            .x_axis_label("Time (s)")
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                plot_ui.line(Line::new("first stage", first));
                plot_ui.line(Line::new("second stage", second));
                plot_ui.line(Line::new("payload", payload));
                plot_ui.line(Line::new("satellite", satellite));
            });
    }

    fn draw_scene(&self, painter: &egui::Painter, rect: Rect, snap: &Snapshot) {
        let sky = scene::sky_color(snap.time, self.config.timeline.orbit_start_time);
        painter.rect_filled(rect, egui::CornerRadius::ZERO, rgb_f32(sky));

        let view = Projector { camera: &self.camera, rect };
        draw_prop(painter, &view, &self.planet);
        for prop in &self.site {
            draw_prop(painter, &view, prop);
        }

        if self.display_frame {
            let o = Vector3::zeros();
            for (axis, color) in [
                (Vector3::x(), Color32::RED),
                (Vector3::y(), Color32::GREEN),
                (Vector3::z(), Color32::BLUE),
            ] {
                view.segment(painter, &o, &(axis * 10.0), 2.0, color);
            }
        }

        // Bodies
        let z = |h: f64| Vector3::new(0.0, 0.0, h);
        for (body, (base, top, radius)) in [
            (&snap.first_stage, scene::FIRST_STAGE_MESH),
            (&snap.second_stage, scene::SECOND_STAGE_MESH),
        ] {
            let p = body.position;
            view.cylinder(painter, &(p + z(base)), &(p + z(top)), radius, STAGE_COLOR);
        }
        if snap.phase == FlightPhase::Ascent {
            let (base, height, radius) = scene::PAYLOAD_MESH;
            let p = snap.payload.position;
            view.cone(painter, &(p + z(base)), &(p + z(base + height)), radius, PAYLOAD_COLOR);
        } else {
            let (base, height, radius) = scene::SATELLITE_MESH;
            let p = scene::satellite_translation(snap);
            view.cone(painter, &(p + z(base)), &(p + z(base + height)), radius, SATELLITE_COLOR);
        }

        if let Some(anchor) = scene::thrust_anchor(snap) {
            let w = scene::PLUME_HALF_WIDTH;
            let plume = [
                anchor + Vector3::new(-w, 0.0, 0.0),
                anchor + Vector3::new(w, 0.0, 0.0),
                anchor - z(scene::PLUME_LENGTH),
            ];
            view.polygon(painter, &plume, PLUME_COLOR);
        }
    }
}

impl eframe::App for LaunchViewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let real_dt = ctx.input(|i| i.stable_dt) as f64;
        let snap = self.step(real_dt);
        self.handle_keys(ctx, &snap);

        egui::SidePanel::left("controls").resizable(false).show(ctx, |ui| {
            self.controls(ui, &snap);
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let (response, painter) =
                    ui.allocate_painter(ui.available_size(), egui::Sense::drag());
                self.handle_mouse(ui, &response);
                self.draw_scene(&painter, response.rect, &snap);
            });

        ctx.request_repaint();
    }
}

// ---------------------------------------------------------------------------
// Software projection
// ---------------------------------------------------------------------------

struct Projector<'a> {
    camera: &'a OrbitCamera,
    rect: Rect,
}

impl Projector<'_> {
    fn to_screen(&self, p: &Vector3<f64>) -> Option<Pos2> {
        let aspect = (self.rect.width() / self.rect.height().max(1.0)) as f64;
        let ndc = self.camera.project(p, aspect)?;
        let c = self.rect.center();
        Some(Pos2::new(
            c.x + ndc.x as f32 * self.rect.width() * 0.5,
            c.y - ndc.y as f32 * self.rect.height() * 0.5,
        ))
    }

    fn scale(&self, p: &Vector3<f64>) -> Option<f32> {
        self.camera.pixels_per_unit(p, self.rect.height() as f64).map(|s| s as f32)
    }

    fn polygon(&self, painter: &egui::Painter, points: &[Vector3<f64>], color: Color32) {
        let screen: Option<Vec<Pos2>> = points.iter().map(|p| self.to_screen(p)).collect();
        if let Some(screen) = screen {
            painter.add(egui::Shape::convex_polygon(screen, color, Stroke::NONE));
        }
    }

    fn segment(&self, painter: &egui::Painter, a: &Vector3<f64>, b: &Vector3<f64>, width: f32, color: Color32) {
        if let (Some(a), Some(b)) = (self.to_screen(a), self.to_screen(b)) {
            painter.line_segment([a, b], Stroke::new(width, color));
        }
    }

    fn cylinder(&self, painter: &egui::Painter, base: &Vector3<f64>, top: &Vector3<f64>, radius: f64, color: Color32) {
        let mid = (base + top) * 0.5;
        if let Some(px) = self.scale(&mid) {
            self.segment(painter, base, top, (2.0 * radius as f32 * px).max(1.0), color);
        }
    }

    /// Cone drawn as its silhouette triangle facing the camera.
    fn cone(&self, painter: &egui::Painter, base: &Vector3<f64>, apex: &Vector3<f64>, radius: f64, color: Color32) {
        let (Some(b), Some(a), Some(px)) = (self.to_screen(base), self.to_screen(apex), self.scale(base)) else {
            return;
        };
        let half = (radius as f32 * px).max(1.0);
        let axis = a - b;
        let side = if axis.length() > f32::EPSILON {
            egui::vec2(-axis.y, axis.x).normalized() * half
        } else {
            egui::vec2(half, 0.0)
        };
        painter.add(egui::Shape::convex_polygon(vec![b - side, b + side, a], color, Stroke::NONE));
    }

    /// Faces sorted back to front by distance from the eye.
    fn faces(&self, painter: &egui::Painter, mut faces: Vec<Vec<Vector3<f64>>>, color: Color32) {
        let eye = self.camera.eye();
        let depth = |f: &Vec<Vector3<f64>>| {
            let centre = f.iter().sum::<Vector3<f64>>() / f.len() as f64;
            (centre - eye).norm()
        };
        faces.sort_by(|a, b| depth(b).total_cmp(&depth(a)));
        for (i, face) in faces.iter().enumerate() {
            let shade = 0.8 + 0.2 * (i as f32 / faces.len() as f32);
            self.polygon(painter, face, color.gamma_multiply(shade));
        }
    }
}

fn draw_prop(painter: &egui::Painter, view: &Projector, prop: &Prop) {
    let color = Color32::from_rgb(prop.color[0], prop.color[1], prop.color[2]);
    match &prop.shape {
        Shape::Quad(corners) => view.polygon(painter, corners, color),
        Shape::Disc { center, radius } => {
            let ring: Vec<Vector3<f64>> = (0..32)
                .map(|k| {
                    let a = k as f64 / 32.0 * std::f64::consts::TAU;
                    center + Vector3::new(a.cos(), a.sin(), 0.0) * *radius
                })
                .collect();
            view.polygon(painter, &ring, color);
        }
        Shape::Sphere { center, radius } => {
            if let (Some(c), Some(px)) = (view.to_screen(center), view.scale(center)) {
                painter.circle_filled(c, *radius as f32 * px, color);
            }
        }
        Shape::Pyramid { base, apex } => {
            let faces = (0..4).map(|k| vec![base[k], base[(k + 1) % 4], *apex]).collect();
            view.faces(painter, faces, color);
        }
        Shape::Cuboid { min, max } => {
            let c = |x: bool, y: bool, z: bool| {
                Vector3::new(
                    if x { max.x } else { min.x },
                    if y { max.y } else { min.y },
                    if z { max.z } else { min.z },
                )
            };
            let faces = vec![
                vec![c(false, false, true), c(true, false, true), c(true, true, true), c(false, true, true)],
                vec![c(false, false, false), c(true, false, false), c(true, false, true), c(false, false, true)],
                vec![c(false, true, false), c(true, true, false), c(true, true, true), c(false, true, true)],
                vec![c(false, false, false), c(false, true, false), c(false, true, true), c(false, false, true)],
                vec![c(true, false, false), c(true, true, false), c(true, true, true), c(true, false, true)],
            ];
            view.faces(painter, faces, color);
        }
    }
}

fn rgb_f32(c: [f32; 3]) -> Color32 {
    let u = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgb(u(c[0]), u(c[1]), u(c[2]))
}
