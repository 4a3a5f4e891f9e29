use gravity_sandbox::{Simulation, SimulationConfig, Vec2};

use clap::Parser;

use std::path::PathBuf;
use std::process::ExitCode;

/// Headless sandbox runner: builds or loads a universe, runs it for a number
/// of frames and writes the result as a snapshot.
#[derive(Parser, Debug)]
struct Args {
    /// JSON configuration file. Defaults apply to missing fields.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Snapshot to start from instead of an empty universe.
    #[arg(short, long)]
    load: Option<PathBuf>,

    /// Random planets to add.
    #[arg(short, long, default_value_t = 0)]
    planets: usize,

    /// Add the central star.
    #[arg(long)]
    star: bool,

    /// Black holes to place, as "x,y".
    #[arg(long = "black-hole", value_parser = parse_point)]
    black_holes: Vec<Vec2>,

    #[arg(long)]
    no_gravity: bool,

    #[arg(long)]
    trails: bool,

    /// Frames to run.
    #[arg(short, long, default_value_t = 600)]
    frames: usize,

    /// Where to write the final snapshot. Printed to stdout if omitted.
    #[arg(short, long)]
    out: Option<PathBuf>,
}

fn parse_point(s: &str) -> Result<Vec2, String> {
    let (x, y) = s.split_once(',').ok_or_else(|| format!("expected \"x,y\", got {s:?}"))?;
    let x = x.trim().parse::<f32>().map_err(|e| e.to_string())?;
    let y = y.trim().parse::<f32>().map_err(|e| e.to_string())?;
    Ok(Vec2::new(x, y))
}

fn run(args: Args) -> gravity_sandbox::Result<()> {
    let config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    let mut sim = Simulation::with_config(config);

    if let Some(path) = &args.load {
        sim.load_from_file(path)?;
    }
    for _ in 0..args.planets {
        sim.add_planet()?;
    }
    if args.star {
        sim.add_star()?;
    }
    for &pos in &args.black_holes {
        sim.add_black_hole(pos)?;
    }

    sim.gravity_enabled = !args.no_gravity;
    sim.trails_enabled = args.trails;
    sim.running = true;

    let mut absorbed = 0;
    let mut merges = 0;
    for _ in 0..args.frames {
        let report = sim.step();
        absorbed += report.absorbed;
        merges += report.merges;
    }
    log::info!(
        "ran {} frames: {} bodies, {} black holes left ({absorbed} absorbed, {merges} merges)",
        sim.frame,
        sim.universe.bodies().len(),
        sim.universe.black_holes().len()
    );

    match &args.out {
        Some(path) => sim.save_to_file(path)?,
        None => println!("{}", sim.save_json()?),
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
