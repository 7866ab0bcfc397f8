use std::{path::PathBuf, time::Instant};

use anyhow::{Context, Result};
use cgmath::point2;
use clap::{ArgAction, Parser};
use eframe::egui;
use particle_fireworks::{
    CartesianPlane, FanSink, FanVertex, Simulation, SimulationConfig, self_test,
};
use rand::{SeedableRng, rngs::StdRng};

const INITIAL_WIDTH: f32 = 1280.0;
const INITIAL_HEIGHT: f32 = 720.0;

#[derive(Parser)]
#[command(name = "particle_fireworks", about = "Click to launch particle fireworks")]
struct Cli {
    /// JSON config file (decayRate, gravity, ttl, particlesPerSpawn, minPoints, maxPoints)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for the random source
    #[arg(long)]
    seed: Option<u64>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Skip the startup transform check
    #[arg(long)]
    skip_self_test: bool,
}

/// Turns particle fans into egui triangle fans, offset into the canvas rect.
struct MeshSink {
    origin: egui::Pos2,
    mesh: egui::Mesh,
}

impl FanSink for MeshSink {
    fn fan(&mut self, vertices: &[FanVertex]) {
        let base = self.mesh.vertices.len() as u32;
        for vertex in vertices {
            let c = vertex.color;
            self.mesh.colored_vertex(
                self.origin + egui::vec2(vertex.position.x, vertex.position.y),
                egui::Color32::from_rgb(c.r, c.g, c.b),
            );
        }
        // vertices[0] is the center, the ring wraps from the last outer vertex to the first.
        let outer = vertices.len().saturating_sub(1) as u32;
        if outer < 2 {
            return;
        }
        for j in 1..outer {
            self.mesh.add_triangle(base, base + j, base + j + 1);
        }
        self.mesh.add_triangle(base, base + outer, base + 1);
    }
}

struct Fireworks {
    simulation: Simulation<StdRng>,
    last_frame_time: Instant,
}

impl Fireworks {
    fn new(simulation: Simulation<StdRng>) -> Self {
        Self {
            simulation,
            last_frame_time: Instant::now(),
        }
    }
}

impl eframe::App for Fireworks {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        let current_time = Instant::now();
        let frame_time = current_time.duration_since(self.last_frame_time);
        self.last_frame_time = current_time;
        let ts = frame_time.as_secs_f64();

        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            frame.close();
            return;
        }

        egui::TopBottomPanel::top("Stats").show(ctx, |ui| {
            ui.label(format!(
                "FPS: {:.1}   Particles: {}",
                1.0 / ts.max(f64::EPSILON),
                self.simulation.len()
            ));
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(egui::Color32::BLACK))
            .show(ctx, |ui| {
                let (rect, response) =
                    ui.allocate_exact_size(ui.available_size(), egui::Sense::click());

                if let Err(err) = self
                    .simulation
                    .resize(rect.width() as f64, rect.height() as f64)
                {
                    log::debug!("Skipping frame: {err}");
                    return;
                }

                let spawns = response
                    .clicked()
                    .then(|| response.interact_pointer_pos())
                    .flatten()
                    .map(|pos| point2((pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64));

                let mut sink = MeshSink {
                    origin: rect.min,
                    mesh: egui::Mesh::default(),
                };
                if let Err(err) = self.simulation.step(ts, spawns, &mut sink) {
                    log::error!("Simulation step failed: {err}");
                }
                ui.painter().add(egui::Shape::mesh(sink.mesh));
            });

        ctx.request_repaint();
    }
}

fn log_level(verbose: u8) -> Option<log::LevelFilter> {
    match verbose {
        0 => None,
        1 => Some(log::LevelFilter::Info),
        2 => Some(log::LevelFilter::Debug),
        _ => Some(log::LevelFilter::Trace),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(level) = log_level(cli.verbose) {
        logger.filter_level(level);
    }
    logger.init();

    let config = match &cli.config {
        Some(path) => SimulationConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SimulationConfig::default(),
    };

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let plane = CartesianPlane::new(INITIAL_WIDTH as f64, INITIAL_HEIGHT as f64)?;
    if !cli.skip_self_test {
        let report = self_test::run(plane, &mut rng)?;
        if report.all_passed() {
            log::info!("Score: {} / {}", report.passed, report.total);
        } else {
            log::warn!("Score: {} / {}", report.passed, report.total);
        }
    }

    let simulation = Simulation::new(config, plane, rng)?;

    eframe::run_native(
        "Particle Fireworks",
        eframe::NativeOptions {
            renderer: eframe::Renderer::Wgpu,
            initial_window_size: Some(egui::vec2(INITIAL_WIDTH, INITIAL_HEIGHT)),
            ..Default::default()
        },
        Box::new(move |_cc| Box::new(Fireworks::new(simulation))),
    )
    .map_err(|err| anyhow::anyhow!("{err}"))
}
