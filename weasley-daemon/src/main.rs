//! weasley-clockd - Weasley clock daemon
//!
//! Follows location reports for a set of people and moves one
//! servo-driven hand per person to the zone they are in.
//!
//! Reports arrive as `<topic> <payload>` lines on stdin (pipe
//! `mosquitto_sub -v -t 'weasleyclock/#'` into it) or from a replay
//! script. Hands move only on the positioner tick.

use std::fs::OpenOptions;
use std::path::PathBuf;

use anyhow::{anyhow, Context};
use clap::Parser;
use embassy_executor::Spawner;
use log::{error, info, LevelFilter};
use static_cell::StaticCell;

use crate::config::ClockConfig;

mod actuator;
mod channels;
mod config;
mod report;
mod script;
mod source;
mod tasks;

/// Move clock hands to follow tracked people
#[derive(Debug, Parser)]
#[command(name = "weasley-clockd", version, about)]
struct Cli {
    /// Clock configuration (defaults to the built-in clock.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Append log output to this file instead of stderr
    #[arg(short, long)]
    log_file: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,

    /// Log servo commands instead of driving the PWM board
    #[arg(long)]
    dry_run: bool,

    /// Replay a JSON message script
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Do not read messages from stdin
    #[arg(long)]
    no_stdin: bool,
}

// Configuration must live forever for task references
static CONFIG: StaticCell<ClockConfig> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli) {
        eprintln!("weasley-clockd: {e:#}");
        std::process::exit(1);
    }

    if let Err(e) = run(cli, spawner) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).parse_default_env();

    if let Some(path) = &cli.log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.try_init().context("installing logger")
}

fn run(cli: Cli, spawner: Spawner) -> anyhow::Result<()> {
    info!("weasley-clockd {} starting", env!("CARGO_PKG_VERSION"));

    let config = config::load(cli.config.as_deref()).context("loading configuration")?;
    let config: &'static ClockConfig = CONFIG.init(config);
    info!(
        "{} zones, {} people, tick every {} ms",
        config.dial.zones.len(),
        config.dial.hands.people().count(),
        config.tick_interval_ms
    );

    let steps = cli
        .script
        .as_deref()
        .map(|path| {
            script::load_script(path).with_context(|| format!("loading script {}", path.display()))
        })
        .transpose()?;

    let actuator = actuator::open(config, cli.dry_run)?;

    spawner
        .spawn(tasks::tick_task(config.tick_interval_ms))
        .map_err(|e| anyhow!("spawning tick task: {e:?}"))?;
    spawner
        .spawn(tasks::positioner_task(&config.dial, actuator))
        .map_err(|e| anyhow!("spawning positioner task: {e:?}"))?;
    spawner
        .spawn(tasks::ingress_task(&config.dial))
        .map_err(|e| anyhow!("spawning ingress task: {e:?}"))?;

    if let Some(steps) = steps {
        spawner
            .spawn(tasks::script_task(steps))
            .map_err(|e| anyhow!("spawning script task: {e:?}"))?;
    }

    if !cli.no_stdin {
        source::spawn_stdin_reader().context("starting stdin reader")?;
    }

    info!("All tasks spawned");
    Ok(())
}
