use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{Level, debug, info, warn};

use sink_switch::audio::match_devices;
use sink_switch::config::ConfigLoader;
use sink_switch::cycle::CycleEngine;
use sink_switch::dashboard::{Dashboard, run_console};
use sink_switch::logging::{self, LoggingConfig};
use sink_switch::system::{PlatformAudioSystem, StandardFileSystem};

type Engine = CycleEngine<PlatformAudioSystem, StandardFileSystem>;

#[derive(Parser)]
#[command(name = "sink-switch")]
#[command(about = "Switch the default audio output device and cycle through your favorites")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Also write logs to a daily-rotated file
    #[arg(long, global = true)]
    log_file: bool,

    /// Directory for the log file (implies --log-file)
    #[arg(long, global = true, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// Log line format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Do not log to the terminal
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

impl Cli {
    fn logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            level: if self.verbose { Level::DEBUG } else { Level::WARN },
            file_output: self.log_file || self.log_dir.is_some(),
            console_output: !self.quiet,
            log_dir: self.log_dir.clone(),
            json_format: self.log_format == LogFormat::Json,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List all active audio output devices
    List,
    /// Switch to the next device in the cycle
    Cycle {
        /// Device names (or parts of names) or ids to cycle between for this run
        devices: Vec<String>,
    },
    /// Show the configuration file and what its device list matches
    CheckConfig,
    /// Pick cycle devices and switch interactively (default)
    Dashboard,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (_guard, log_dir) = logging::initialize_logging(cli.logging_config())?;
    if let Some(dir) = log_dir {
        if let Err(e) = logging::cleanup_old_logs(&dir, 7) {
            warn!("Could not clean up old logs: {}", e);
        }
    }

    let config_loader = match cli.config {
        Some(path) => ConfigLoader::new(StandardFileSystem, path),
        None => ConfigLoader::with_default_path(StandardFileSystem),
    };
    debug!("Using config file {}", config_loader.config_path().display());

    let audio_system = PlatformAudioSystem::new()?;
    let engine = CycleEngine::new(audio_system, config_loader);

    match cli.command {
        Some(Commands::List) => list_devices(&engine),
        Some(Commands::Cycle { devices }) => cycle(&engine, &devices),
        Some(Commands::CheckConfig) => check_config(&engine),
        Some(Commands::Dashboard) | None => run_dashboard(&engine),
    }
}

fn list_devices(engine: &Engine) -> Result<()> {
    let devices = engine.devices().context("Cannot list audio devices")?;
    let current = engine.current_default_id();

    println!("--- Audio Devices ---");
    if devices.is_empty() {
        println!("  No active audio devices found");
    }
    for device in &devices {
        let marker = if current.as_deref() == Some(device.id.as_str()) {
            " * "
        } else {
            "   "
        };
        println!("{}{}", marker, device.name);
        println!("      ID: {}", device.id);
    }

    Ok(())
}

fn cycle(engine: &Engine, patterns: &[String]) -> Result<()> {
    info!("Cycle requested with {} explicit patterns", patterns.len());

    let outcome = engine.cycle(patterns).context("Cycle failed")?;

    match &outcome.previous {
        Some(previous) => println!("Cycling [{}] -> [{}]", previous.name, outcome.target.name),
        None => println!("Starting cycle at: {}", outcome.target.name),
    }
    if !outcome.persisted {
        println!("Warning: could not save the new position; the next cycle may repeat.");
    }
    println!("Success.");

    Ok(())
}

fn check_config(engine: &Engine) -> Result<()> {
    let loader = engine.config_loader();
    println!("Configuration file: {}", loader.config_path().display());

    let config = match loader.try_load() {
        Ok(Some(config)) => config,
        Ok(None) => {
            println!("  (not created yet, all devices are cycled)");
            return Ok(());
        }
        Err(e) => {
            println!("  ✗ {}", e);
            println!("  The file is ignored and all devices are cycled until it is fixed.");
            return Ok(());
        }
    };

    let devices = engine.devices().context("Cannot list audio devices")?;
    let matched = config.matching_devices(&devices);

    println!("  ✓ Configuration parsed successfully");
    println!("  Cycle list entries: {}", config.devices.len());
    for entry in &config.devices {
        let hits = match_devices(&devices, std::slice::from_ref(entry));
        let names: Vec<&str> = hits.iter().map(|d| d.name.as_str()).collect();
        if names.is_empty() {
            println!("    '{}' -> (no active device)", entry);
        } else {
            println!("    '{}' -> {}", entry, names.join(", "));
        }
    }
    if !config.devices.is_empty() && matched.len() < 2 {
        println!("  Fewer than 2 devices match, so cycling uses all devices.");
    }
    if config.has_last_device() {
        match devices.iter().find(|d| d.id == config.last_device_id) {
            Some(device) => println!("  Last switched to: {}", device.name),
            None => println!("  Last switched to: {} (not active)", config.last_device_id),
        }
    }

    Ok(())
}

fn run_dashboard(engine: &Engine) -> Result<()> {
    let mut dashboard = Dashboard::open(engine).context("Failed to load audio devices")?;

    let stdin = std::io::stdin();
    run_console(&mut dashboard, stdin.lock(), std::io::stdout())?;
    Ok(())
}
