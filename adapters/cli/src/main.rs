#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless tower defense session.

mod config;
mod script;

use std::{fs, io, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tower_defense_core::{Command, Event, PlayState, Snapshot};
use tower_defense_world::{self as world, query, World};
use tracing::{info, trace, warn};
use tracing_subscriber::EnvFilter;

use crate::script::Step;

/// Command-line arguments accepted by the tower defense shell.
#[derive(Debug, Parser)]
#[command(name = "tower-defense")]
#[command(about = "Run a deterministic tower defense session without a window")]
struct Args {
    /// TOML configuration overriding the stock balance.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Command script applied before the free-running phase.
    #[arg(long)]
    script: Option<PathBuf>,
    /// Upper bound on the total number of ticks issued.
    #[arg(long, default_value_t = 36_000)]
    max_ticks: u64,
    /// Print the final snapshot as JSON instead of a summary line.
    #[arg(long)]
    json: bool,
    /// Print the default configuration as TOML and exit.
    #[arg(long)]
    print_default_config: bool,
}

/// Entry point for the tower defense command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    if args.print_default_config {
        print!("{}", config::render_default()?);
        return Ok(());
    }

    let config = config::load(args.config.as_deref())?;
    let mut world = World::new(config).context("configuration rejected by the simulation")?;
    let steps = match &args.script {
        Some(path) => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("failed to read script at {}", path.display()))?;
            script::parse(&source)
                .with_context(|| format!("failed to parse script {}", path.display()))?
        }
        None => Vec::new(),
    };

    let mut session = Session::new(&mut world, args.max_ticks);
    session.run_script(&steps);
    session.run_until_done();
    let ticks = session.ticks_issued;

    let snapshot = query::snapshot(&world);
    info!(ticks, "session finished");
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&snapshot).context("failed to encode snapshot")?
        );
    } else {
        println!("{}", summary(&snapshot));
    }
    Ok(())
}

/// Drives the world with scripted and free-running commands under a tick budget.
struct Session<'a> {
    world: &'a mut World,
    events: Vec<Event>,
    ticks_issued: u64,
    max_ticks: u64,
}

impl<'a> Session<'a> {
    fn new(world: &'a mut World, max_ticks: u64) -> Self {
        Self {
            world,
            events: Vec::new(),
            ticks_issued: 0,
            max_ticks,
        }
    }

    fn run_script(&mut self, steps: &[Step]) {
        for step in steps {
            for _ in 0..step.repeat {
                if query::quit_requested(self.world) {
                    return;
                }
                if step.command == Command::Tick && self.finished() {
                    break;
                }
                self.apply(step.command);
            }
        }
    }

    fn run_until_done(&mut self) {
        while !self.finished() {
            if query::play_state(self.world) == PlayState::Paused {
                warn!("script left the session paused; stopping");
                return;
            }
            self.apply(Command::Tick);
        }
    }

    fn finished(&self) -> bool {
        query::quit_requested(self.world)
            || query::play_state(self.world) == PlayState::GameOver
            || self.ticks_issued >= self.max_ticks
    }

    fn apply(&mut self, command: Command) {
        if command == Command::Tick {
            self.ticks_issued += 1;
        }
        world::apply(self.world, command, &mut self.events);
        for event in self.events.drain(..) {
            trace!(?event, "event");
        }
    }
}

fn summary(snapshot: &Snapshot) -> String {
    format!(
        "tick {} | {:?} | wave {} | money {} | lives {} | score {} | high score {} | towers {} | enemies {}",
        snapshot.tick,
        snapshot.play_state,
        snapshot.wave,
        snapshot.money,
        snapshot.lives,
        snapshot.score,
        snapshot.high_score,
        snapshot.towers.len(),
        snapshot.enemies.len(),
    )
}
