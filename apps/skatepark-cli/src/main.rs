use anyhow::Context;
use clap::{Parser, Subcommand};
use skatepark_board::deck_mesh;
use skatepark_common::GameConfig;
use skatepark_input::Key;
use skatepark_render::{DebugTextRenderer, RenderView, Renderer};
use skatepark_sky::Lighting;
use skatepark_stage::Stage;
use skatepark_tools::{FrameTimer, StageInspector};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "skatepark-cli", about = "Headless skatepark tool")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, configuration and a summary of the initial stage
    Info {
        /// Emit the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the stage headless and print the final frame
    Simulate {
        /// Number of frames to run
        #[arg(short, long, default_value = "120")]
        frames: u64,
        /// Seconds per frame
        #[arg(long, default_value = "0.016666668")]
        dt: f32,
        /// Key codes held for the whole run, e.g. KeyW,ArrowLeft
        #[arg(long, value_delimiter = ',')]
        hold: Vec<String>,
        /// Start time of day in [0, 1)
        #[arg(long)]
        time: Option<f32>,
        /// Seconds to wait for textures before the first frame
        #[arg(long)]
        wait_textures: Option<f32>,
    },
    /// Print the day/night phase table
    Sky {
        /// Number of evenly spaced samples over one cycle
        #[arg(short, long, default_value = "24")]
        samples: u32,
    },
    /// Print statistics of the procedural deck mesh
    Deck,
}

fn parse_keys(codes: &[String]) -> anyhow::Result<Vec<Key>> {
    codes
        .iter()
        .map(|code| code.trim().parse::<Key>().map_err(anyhow::Error::from))
        .collect()
}

fn wait_duration(seconds: f32) -> anyhow::Result<Duration> {
    Duration::try_from_secs_f32(seconds.max(0.0))
        .with_context(|| format!("invalid --wait-textures value: {seconds}"))
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<GameConfig> {
    match path {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(GameConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Info { json } => {
            let stage = Stage::new(config);
            let summary = StageInspector::summary(&stage);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                let config = stage.config();
                println!("skatepark-cli v{}", env!("CARGO_PKG_VERSION"));
                println!(
                    "physics: gravity={} jump_velocity={} ground_level={}",
                    config.physics.gravity, config.physics.jump_velocity, config.physics.ground_level
                );
                println!(
                    "controls: move_force={} turn_speed={}",
                    config.controls.move_force, config.controls.turn_speed
                );
                println!(
                    "day/night: cycle={}s start={}",
                    config.day_night.cycle_seconds, config.day_night.start_time
                );
                println!(
                    "stars: count={} radius={} seed={}",
                    config.stars.count, config.stars.radius, config.stars.seed
                );
                println!(
                    "assets: dir={} load={}",
                    config.assets.texture_dir.display(),
                    config.assets.load_textures
                );
                println!("{summary}");
            }
        }
        Commands::Simulate {
            frames,
            dt,
            hold,
            time,
            wait_textures,
        } => {
            let keys = parse_keys(&hold)?;
            let mut stage = Stage::new(config);
            if let Some(time) = time {
                stage.set_time_of_day(time);
            }
            if let Some(seconds) = wait_textures {
                stage.load_textures();
                let loaded = stage.wait_for_textures(wait_duration(seconds)?);
                tracing::info!(loaded, "textures ready");
            }
            for key in &keys {
                stage.handle_key(*key, true);
            }

            let mut timer = FrameTimer::default();
            for _ in 0..frames {
                let stats = stage.update(dt);
                timer.record(stats.update_time);
            }

            let output = DebugTextRenderer::new().render(&stage, &RenderView::default());
            print!("{output}");
            println!("{}", StageInspector::summary(&stage));
            if let Some(avg) = timer.average() {
                println!(
                    "update: frames={} avg={:.3}ms max={:.3}ms",
                    timer.total_frames(),
                    avg.as_secs_f64() * 1000.0,
                    timer.max().unwrap_or_default().as_secs_f64() * 1000.0
                );
            }
        }
        Commands::Sky { samples } => {
            let samples = samples.max(1);
            println!(
                "{:>6}  {:<8} {:>5} {:>5} {:>5} {:>6}",
                "time", "phase", "sun", "moon", "stars", "light"
            );
            for i in 0..samples {
                let lighting = Lighting::at(i as f32 / samples as f32);
                println!(
                    "{:>6.3}  {:<8} {:>5.2} {:>5.2} {:>5.2} {:>6.2}",
                    lighting.time,
                    lighting.phase.to_string(),
                    lighting.sun,
                    lighting.moon,
                    lighting.stars,
                    lighting.character_light
                );
            }
        }
        Commands::Deck => {
            let mesh = deck_mesh();
            let (min, max) = mesh.bounds();
            println!("deck '{}'", mesh.name);
            println!("vertices: {}", mesh.vertex_count());
            println!("triangles: {}", mesh.triangle_count());
            println!(
                "bounds: ({:.3}, {:.3}, {:.3}) .. ({:.3}, {:.3}, {:.3})",
                min.x, min.y, min.z, max.x, max.y, max.z
            );
        }
    }

    Ok(())
}
