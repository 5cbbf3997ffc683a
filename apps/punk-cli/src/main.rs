mod demo;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use punk_engine::{Engine, EngineConfig, ManualClock};
use punk_world::WorldInspector;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "punk-cli", about = "Headless host for the punk runtime")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions
    Info,
    /// Print the default engine config as JSON
    Config,
    /// Run the demo scene on a simulated clock
    Run {
        /// Number of platform frames to simulate
        #[arg(short, long, default_value = "300")]
        frames: u64,
        /// Engine config JSON file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Use a fixed timestep
        #[arg(long)]
        fixed: bool,
        /// Target frame rate
        #[arg(long)]
        fps: Option<u32>,
        /// List every entity after the run
        #[arg(short, long)]
        list: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("punk-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("tween: {}", punk_tween::crate_info());
            println!("world: {}", punk_world::crate_info());
            println!("engine: {}", punk_engine::crate_info());
        }
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&EngineConfig::default())?);
        }
        Commands::Run {
            frames,
            config,
            fixed,
            fps,
            list,
        } => {
            let mut config = match config {
                Some(path) => {
                    let json = std::fs::read_to_string(&path)
                        .with_context(|| format!("reading {}", path.display()))?;
                    EngineConfig::from_json(&json)?
                }
                None => EngineConfig::default(),
            };
            if fixed {
                config.fixed = true;
            }
            if let Some(fps) = fps {
                config.frame_rate = fps;
            }
            config.validate()?;

            println!(
                "Run: frames={frames}, {}x{} @ {} fps, {}",
                config.width,
                config.height,
                config.frame_rate,
                if config.fixed { "fixed" } else { "variable" }
            );

            let (world, ship) = demo::build(&config);
            let mut engine = Engine::with_world(config, world)?;
            let clock = ManualClock::new();
            let rate = engine.config().rate();
            let mut ticks = 0u64;
            for _ in 0..frames {
                ticks += u64::from(engine.step(&clock));
                clock.advance(rate);
            }

            let world = engine.world();
            let hits = world
                .entity(ship)
                .and_then(|e| e.behavior::<demo::Pilot>())
                .map_or(0, |pilot| pilot.hits);
            let timings = engine.timings();
            println!("Ticks: {ticks}");
            println!("{}", WorldInspector::summary(world));
            println!(
                "Ship: hits={hits}, rocks pooled={}",
                world.recycled_count(demo::ROCK)
            );
            println!(
                "Frame rate: {:.1} fps (update={:?}, render={:?}, game={:?})",
                engine.frame_rate(),
                timings.update,
                timings.render,
                timings.game
            );
            if list {
                for id in WorldInspector::list_entities(world) {
                    if let Some(info) = WorldInspector::inspect_entity(world, id) {
                        println!("  {info}");
                    }
                }
            }
        }
    }

    Ok(())
}
