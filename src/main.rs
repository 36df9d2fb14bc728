//! Henhouse entry point
//!
//! Runs a session headless with the arcade physics and an autopilot fox.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use henhouse::Settings;
use henhouse::platform::{Autopilot, Runner};
use henhouse::ui::Hud;

/// Stealth-and-chase simulation runner
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Settings file (JSON); defaults are used when absent
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the RNG seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Override the starting level
    #[arg(short, long)]
    level: Option<u32>,

    /// Number of fixed ticks to run
    #[arg(short, long, default_value_t = 3600)]
    ticks: u64,

    /// Have the autopilot sneak while the flock is calm
    #[arg(long)]
    stealthy: bool,

    /// Print the final session state as JSON
    #[arg(long)]
    dump_state: bool,
}

fn load_settings(args: &Args) -> Result<Settings, henhouse::SettingsError> {
    let mut settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }
    if let Some(level) = args.level {
        settings.start_level = level;
    }
    settings.validate()?;
    Ok(settings)
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let settings = match load_settings(&args) {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("Failed to load settings: {}", e);
            return ExitCode::FAILURE;
        }
    };
    log::info!(
        "Henhouse starting (seed {}, level {}, {} ticks)",
        settings.seed,
        settings.start_level,
        args.ticks
    );

    let mut runner = Runner::new(settings, Autopilot::new(args.stealthy));
    let summary = runner.run(args.ticks).clone();
    let hud = Hud::from_state(&runner.state);

    println!(
        "{} ticks: {} wins, {} losses, {} full clears, {} captures, {} alarms, best level {}",
        summary.ticks,
        summary.wins,
        summary.losses,
        summary.completions,
        summary.captures,
        summary.alarms,
        summary.best_level
    );
    println!("{} | {} | {}", hud.level_text(), hud.prey_text(), hud.timer_text());

    if args.dump_state {
        match serde_json::to_string_pretty(&runner.state) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                log::error!("Failed to serialize state: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}
