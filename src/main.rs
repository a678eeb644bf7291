use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

// Import from the library crate
use boxwalk::{controller, logging, model};

use controller::frame_loop::SCENE_NAMES;
use controller::settings::PRESET_NAMES as SETTINGS_PRESETS;
use controller::{parse_key_script, ControllerSettings, Session};
use model::level::PRESET_NAMES as LEVEL_PRESETS;
use model::Level;

#[derive(Parser)]
#[command(name = "boxwalk", about = "Headless driver for the boxwalk player controller")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, scenes and presets
    Info,
    /// Run a scene for a number of frames and print the actor trajectory
    Simulate {
        /// Scene: forest, orbit, container or editor
        #[arg(short, long, default_value = "forest")]
        scene: String,
        /// Level JSON replacing the scene's level (falls back to it on error)
        #[arg(short, long)]
        level: Option<PathBuf>,
        /// Controller settings JSON replacing the scene's settings
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Number of frames to simulate
        #[arg(short, long, default_value = "120")]
        frames: u64,
        /// Frame time in seconds
        #[arg(long, default_value = "0.016666668")]
        dt: f32,
        /// Key script, e.g. "0:w+,60:w-,90:space+"
        #[arg(short, long, default_value = "")]
        keys: String,
        /// Print every Nth frame (events are always printed)
        #[arg(long, default_value = "10")]
        every: u64,
    },
    /// Write a built-in level preset as JSON
    ExportLevel {
        /// Preset: flat, forest or container
        preset: String,
        /// Output file
        path: PathBuf,
    },
    /// Validate a level file and print its summary
    CheckLevel {
        path: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init_with(if cli.verbose { "debug" } else { "info" });

    match cli.command {
        Commands::Info => {
            println!("boxwalk v{}", env!("CARGO_PKG_VERSION"));
            println!("scenes: {}", SCENE_NAMES.join(", "));
            println!("level presets: {}", LEVEL_PRESETS.join(", "));
            println!("settings presets: {}", SETTINGS_PRESETS.join(", "));
        }
        Commands::Simulate { scene, level, settings, frames, dt, keys, every } => {
            simulate(&scene, level, settings, frames, dt, &keys, every)?;
        }
        Commands::ExportLevel { preset, path } => {
            let level = Level::preset(&preset)?;
            level
                .save(&path)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("wrote {} ({} colliders) to {}", level.name, level.colliders.len(), path.display());
        }
        Commands::CheckLevel { path } => {
            let level = Level::load(&path).with_context(|| format!("checking {}", path.display()))?;
            println!("level: {}", level.name);
            println!("spawn: {}  safe spawn: {}", level.spawn, level.safe_spawn);
            println!("reset below y = {}", level.reset_threshold);
            println!("colliders: {}", level.colliders.len());
            if let Some(bounds) = level.bounds() {
                println!("bounds: {} .. {}", bounds.min, bounds.max);
            }
        }
    }

    Ok(())
}

fn simulate(
    scene: &str,
    level_path: Option<PathBuf>,
    settings_path: Option<PathBuf>,
    frames: u64,
    dt: f32,
    keys: &str,
    every: u64,
) -> anyhow::Result<()> {
    let Some((level, settings, rig)) = Session::scene_parts(scene) else {
        bail!("unknown scene {scene:?}, expected one of {}", SCENE_NAMES.join(", "));
    };
    let level = match level_path {
        Some(path) => Level::load_or(path, level),
        None => level,
    };
    let settings = match settings_path {
        Some(path) => ControllerSettings::load(&path).with_context(|| format!("loading {}", path.display()))?,
        None => settings,
    };
    let script = parse_key_script(keys)?;

    let mut session = Session::new(level, settings, rig)?;
    let mut pending = script.iter().peekable();
    let every = every.max(1);

    println!("scene {scene}, level {}, {frames} frames at dt {dt}", session.level().name);
    for frame in 0..frames {
        while let Some(entry) = pending.next_if(|e| e.frame <= frame) {
            session.handle_event(&entry.event);
        }

        let report = session.tick(dt);
        let p = report.actor.position;
        let v = report.actor.velocity;
        let mut events = Vec::new();
        if report.jumped {
            events.push("jump".to_string());
        }
        if let Some(index) = report.landed_on.filter(|_| report.touched_down) {
            events.push(format!("land on {}", session.level().colliders[index].name));
        }
        if report.reset {
            events.push("reset".to_string());
        }

        if report.frame % every == 0 || !events.is_empty() {
            println!(
                "{:>5}  pos ({:8.3} {:8.3} {:8.3})  vel ({:7.3} {:7.3} {:7.3})  {}{}",
                report.frame,
                p.x,
                p.y,
                p.z,
                v.x,
                v.y,
                v.z,
                if report.actor.grounded { "grounded" } else { "airborne" },
                if events.is_empty() { String::new() } else { format!("  [{}]", events.join(", ")) },
            );
        }
    }

    let actor = session.actor();
    println!("final position {} grounded {}", actor.position, actor.grounded);
    Ok(())
}
