use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use worldsim_lib::model::config::AppConfig;
use worldsim_lib::model::world::World;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Mode to run the simulation in
    #[arg(short, long, value_enum, default_value = "headless")]
    mode: Mode,

    /// Custom config file path; defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of ticks to simulate
    #[arg(short, long, default_value_t = 1000)]
    ticks: u64,

    /// Seconds per tick before time scaling
    #[arg(long, default_value_t = 1.0 / 30.0)]
    dt: f64,

    /// Overrides the configured world seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Time scale multiplier, clamped to [0, 10]
    #[arg(long)]
    speed: Option<f64>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    /// Stream every simulation event as a JSON line on stdout
    #[arg(long)]
    events: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum Mode {
    /// Run the simulation and print a summary
    Headless,
    /// Generate the terrain and print it as text
    Map,
}

fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            AppConfig::from_toml(&content)?
        }
        None => AppConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.world.seed = Some(seed);
    }
    if matches!(args.mode, Mode::Map) {
        config.terrain.chunked = false;
    }
    Ok(config)
}

fn main() -> Result<()> {
    worldsim_core::init_logging();
    let args = Args::parse();
    let config = load_config(&args)?;

    let mut world = World::new(config)?;
    if let Some(speed) = args.speed {
        world.set_time_scale(speed);
    }

    match args.mode {
        Mode::Map => {
            print!("{}", world.terrain.render_ascii());
            if args.json {
                println!("{}", serde_json::to_string_pretty(&world.terrain.histogram())?);
            } else {
                for (biome, count) in world.terrain.histogram() {
                    println!("{biome:?}: {count}");
                }
            }
        }
        Mode::Headless => {
            for _ in 0..args.ticks {
                let events = world.update(args.dt)?;
                if args.events {
                    for event in &events {
                        println!("{}", serde_json::to_string(event)?);
                    }
                }
                if !world.is_populating() && world.agent_count() == 0 {
                    tracing::info!(tick = world.tick, "Population extinct");
                    break;
                }
            }

            let stats = world.stats();
            if args.json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("Tick {} ({:.1}s simulated, seed {})", stats.tick, stats.clock, stats.seed);
                println!(
                    "Humans: {}  Slimes: {}  Food: {}  Settlements: {}",
                    stats.humans, stats.slimes, stats.food, stats.settlements
                );
                for (name, value) in &stats.counters {
                    println!("  {name}: {value}");
                }
            }
        }
    }

    Ok(())
}
