#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives Pathrunner sessions.

mod ascii;
mod config;
mod layout_transfer;
mod session;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use pathrunner_core::{CellCoord, Layout, Objective};
use pathrunner_system_planner::{Search, SearchResult, SearchStats};
use pathrunner_world::{query, Blockers, World};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::{
    ascii::format_cell,
    config::{ArenaFile, RunSettings},
    session::{Outcome, Session},
};

/// Runs A* chases on a tile grid.
#[derive(Debug, Parser)]
#[command(name = "pathrunner", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Runs the chase until the destination is reached or the tick limit elapses.
    Run {
        #[command(flatten)]
        source: LayoutSource,
        /// Overrides the tick limit of the arena.
        #[arg(long)]
        max_ticks: Option<u64>,
        /// Prints the grid after every tick.
        #[arg(long)]
        render: bool,
    },
    /// Plans a single path from the agent and prints it on the grid.
    Plan {
        #[command(flatten)]
        source: LayoutSource,
        /// Goal to plan towards.
        #[arg(long, value_enum, default_value_t = PlanTarget::Destination)]
        to: PlanTarget,
        /// Plans as if the power-up had already been collected.
        #[arg(long)]
        capability: bool,
    },
    /// Prints the layout as a single-line transfer string.
    Export {
        #[command(flatten)]
        source: LayoutSource,
    },
    /// Decodes a transfer string into an arena file.
    Import {
        /// String produced by `export`.
        transfer: String,
        /// Arena file to write; the TOML is printed when omitted.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Where the layout comes from; the built-in maze when neither is given.
#[derive(Debug, Args)]
struct LayoutSource {
    /// Arena TOML file.
    #[arg(long, conflicts_with = "transfer")]
    arena: Option<PathBuf>,
    /// Layout transfer string.
    #[arg(long)]
    transfer: Option<String>,
}

impl LayoutSource {
    fn load(&self) -> Result<ArenaFile> {
        if let Some(path) = &self.arena {
            return config::load(path);
        }
        if let Some(transfer) = &self.transfer {
            let layout =
                layout_transfer::decode(transfer).context("failed to decode layout string")?;
            return Ok(ArenaFile::new(layout));
        }
        Ok(ArenaFile::new(config::default_layout()))
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PlanTarget {
    Destination,
    PowerUp,
}

impl From<PlanTarget> for Objective {
    fn from(target: PlanTarget) -> Self {
        match target {
            PlanTarget::Destination => Objective::Primary,
            PlanTarget::PowerUp => Objective::Secondary,
        }
    }
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("pathrunner=info,warn"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")
}

/// Entry point for the Pathrunner command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging()?;

    match cli.command {
        CliCommand::Run {
            source,
            max_ticks,
            render,
        } => {
            let arena = source.load()?;
            let settings = RunSettings {
                max_ticks: max_ticks.unwrap_or(arena.run.max_ticks),
                render: render || arena.run.render,
            };
            run(&arena.layout, settings)
        }
        CliCommand::Plan {
            source,
            to,
            capability,
        } => plan_once(&source.load()?.layout, to.into(), capability),
        CliCommand::Export { source } => {
            let arena = source.load()?;
            let _ = World::new(&arena.layout).context("layout is not valid")?;
            println!("{}", layout_transfer::encode(&arena.layout)?);
            Ok(())
        }
        CliCommand::Import { transfer, output } => {
            let layout =
                layout_transfer::decode(&transfer).context("failed to decode layout string")?;
            let _ = World::new(&layout).context("layout is not valid")?;
            let arena = ArenaFile::new(layout);
            match output {
                Some(path) => {
                    config::save(&path, &arena)?;
                    tracing::info!(path = %path.display(), "arena written");
                }
                None => print!("{}", config::to_toml(&arena)?),
            }
            Ok(())
        }
    }
}

fn run(layout: &Layout, settings: RunSettings) -> Result<()> {
    let mut session = Session::new(layout).context("layout is not valid")?;
    println!("{}", query::welcome_banner(session.world()));

    let summary = session.run(settings.max_ticks, |session, tick| {
        if settings.render {
            let scene = session.scene();
            let grid = query::grid(session.world());
            let has_capability = query::session(session.world()).agent.has_capability;
            println!("tick {tick}: {}", ascii::legend(&scene, has_capability));
            print!("{}", ascii::render(grid, &scene, session.held_path()));
            println!();
        }
    });

    println!("ticks: {}", summary.ticks);
    println!("moves: {}", summary.moves);
    println!("objective changes: {}", summary.objective_changes);
    println!("rejected steps: {}", summary.rejected_steps);
    println!("capability: {}", summary.has_capability);
    println!("final cell: {}", format_cell(summary.final_cell));
    match summary.outcome {
        Outcome::Arrived { tick } => println!("outcome: destination reached on tick {tick}"),
        Outcome::TickLimit => println!("outcome: tick limit reached"),
    }
    Ok(())
}

/// One-off plan from the agent's cell.
#[derive(Debug)]
struct PlanReport {
    goal: CellCoord,
    result: SearchResult,
    stats: SearchStats,
}

fn plan_from_agent(world: &World, objective: Objective, capability: bool) -> Result<PlanReport> {
    let session = query::session(world);
    let grid = query::grid(world);
    let blockers = Blockers::new(grid)
        .with_adversary(session.adversary.cell)
        .with_capability(capability);
    let goal = session.goals.cell_for(objective);

    let search = Search::new(grid, session.agent.cell, goal, |cell| blockers.is_blocked(cell))?;
    let (result, stats) = search.run_with_stats();
    Ok(PlanReport {
        goal,
        result,
        stats,
    })
}

fn plan_once(layout: &Layout, objective: Objective, capability: bool) -> Result<()> {
    let world = World::new(layout).context("layout is not valid")?;
    let report = plan_from_agent(&world, objective, capability)?;
    let session = query::session(&world);
    let grid = query::grid(&world);
    let scene = ascii::Scene {
        agent: session.agent.cell,
        adversary: session.adversary.cell,
        goals: session.goals,
    };

    match report.result {
        SearchResult::Found(path) => {
            println!(
                "path from {} to {}: {} steps, cost {}",
                format_cell(path.start()),
                format_cell(path.goal()),
                path.step_count(),
                path.cost()
            );
            print!("{}", ascii::render(grid, &scene, path.cells().iter().copied()));
        }
        SearchResult::Unreachable => {
            println!("{} is unreachable", format_cell(report.goal));
            print!("{}", ascii::render(grid, &scene, std::iter::empty()));
        }
    }
    println!(
        "search: {} expanded, {} pushed",
        report.stats.expanded, report.stats.pushed
    );
    Ok(())
}
