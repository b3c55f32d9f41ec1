//! Lineup planner command-line entry point.
//!
//! Wires the configuration, the roster persistence adapter and the roster
//! store together, then runs one subcommand.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ Cli::parse()            -- flags and subcommand
//!  └─ load_or_init_config()   -- TOML config (defaults written on first run)
//!  └─ init_logging()          -- RUST_LOG, else [planner] log_level
//!  └─ open_roster()           -- RosterFile or MemoryStore behind Roster
//!  └─ run()                   -- use cases + report rendering
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use lineup_cli::application::manage_roster::{ManageRosterUseCase, PlayerPatch};
use lineup_cli::application::plan_lineup::{plan_lineup, PlanMode};
use lineup_cli::infrastructure::report::{render_lineup, render_roster, render_violations};
use lineup_cli::infrastructure::storage::config::{
    config_dir, config_file_path, load_config_from, load_or_init_config, AppConfig, OutputFormat,
};
use lineup_cli::infrastructure::storage::memory::MemoryStore;
use lineup_cli::infrastructure::storage::roster_file::RosterFile;
use lineup_core::{
    decode_roster, encode_roster, PlayerDraft, PlayerId, Roster, RosterEvent, RosterPersistence,
};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Equal-play lineup planner.
///
/// Keeps a team roster and schedules active players across three periods of
/// three lines each, balancing line strength and play time.
#[derive(Debug, Parser)]
#[command(name = "lineup", about = "Equal-play lineup planner", version)]
struct Cli {
    /// Config file.  Defaults to `config.toml` in the platform config
    /// directory.
    #[arg(long, global = true, env = "LINEUP_CONFIG")]
    config: Option<PathBuf>,

    /// Roster snapshot file.  Overrides `[roster] file` from the config.
    #[arg(long, global = true, env = "LINEUP_ROSTER")]
    roster: Option<PathBuf>,

    /// Print JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    /// Keep the roster in memory only; nothing is read or written.
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List players by name
    #[command(alias = "ls")]
    List {
        /// Only show active players
        #[arg(long)]
        active: bool,
    },
    /// Add a player
    Add {
        name: String,
        /// Player id; generated when omitted
        #[arg(long)]
        id: Option<String>,
        /// Jersey number
        #[arg(long)]
        number: Option<String>,
        /// Skill 0-100; anything that is not an integer means 50
        #[arg(long)]
        skill: Option<String>,
        /// Add as a goalie
        #[arg(long)]
        goalie: bool,
        /// Add as inactive
        #[arg(long)]
        inactive: bool,
    },
    /// Change fields of an existing player
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        number: Option<String>,
        #[arg(long)]
        skill: Option<String>,
        /// `G` for goalie, anything else for fielder
        #[arg(long)]
        position: Option<String>,
        #[arg(long)]
        active: Option<bool>,
    },
    /// Remove a player
    #[command(alias = "rm")]
    Remove { id: String },
    /// Mark players active (or inactive with --off)
    Activate {
        #[arg(required = true)]
        ids: Vec<String>,
        #[arg(long)]
        off: bool,
    },
    /// Check the roster rules
    Validate,
    /// Plan the lineup for the active players
    Lineup {
        /// Schedule even if the roster breaks a rule
        #[arg(long)]
        lenient: bool,
    },
    /// Replace the roster with the demo team
    Demo,
    /// Write the roster snapshot to a file, or to stdout
    Export { path: Option<PathBuf> },
    /// Replace the roster with a snapshot file
    Import { path: PathBuf },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => config_file_path()?,
    };
    // An ephemeral run leaves the file system untouched.
    let config = if cli.ephemeral {
        load_config_from(&config_path)
    } else {
        load_or_init_config(&config_path)
    }
    .with_context(|| format!("cannot load config {}", config_path.display()))?;

    init_logging(&config);
    debug!("using config {}", config_path.display());

    let mut roster = open_roster(&cli, &config, &config_path)?;
    roster.add_listener(|event, ctx| {
        let subject = match event {
            RosterEvent::Load(players) => format!("{} players", players.len()),
            RosterEvent::Create(p) | RosterEvent::Update(p) => p.id.to_string(),
            RosterEvent::Delete(id) => id.to_string(),
        };
        debug!(kind = %event.kind(), %subject, size = ctx.players().len(), "roster event");
    });

    let format = if cli.json {
        OutputFormat::Json
    } else {
        config.output.format
    };
    let ok = run(cli.command, &mut roster, format)?;
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Installs the `tracing` subscriber.  `RUST_LOG` wins over the config.
fn init_logging(config: &AppConfig) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.planner.log_level)),
        )
        .init();
}

/// Opens the roster behind the configured persistence adapter.
fn open_roster(
    cli: &Cli,
    config: &AppConfig,
    config_path: &std::path::Path,
) -> anyhow::Result<Roster> {
    let persistence: Box<dyn RosterPersistence> = if cli.ephemeral {
        Box::new(MemoryStore::new())
    } else {
        let path = match &cli.roster {
            Some(path) => path.clone(),
            None => {
                let base = match config_path.parent() {
                    Some(dir) => dir.to_path_buf(),
                    None => config_dir()?,
                };
                config.roster.resolve_file(&base)
            }
        };
        info!("roster file {}", path.display());
        Box::new(RosterFile::new(path))
    };

    let mut roster = Roster::open(persistence).context("cannot load roster")?;
    if config.roster.seed_demo && roster.player_count() == 0 {
        info!("seeding empty roster with the demo team");
        roster.load_demo();
    }
    Ok(roster)
}

/// Runs one subcommand.  Returns `false` when the command completed but the
/// result should exit with a failure status.
fn run(command: Command, roster: &mut Roster, format: OutputFormat) -> anyhow::Result<bool> {
    match command {
        Command::List { active } => {
            let players: Vec<_> = roster
                .players_by_name()
                .into_iter()
                .filter(|p| !active || p.active)
                .collect();
            print!("{}", render_roster(&players, format)?);
        }
        Command::Add {
            name,
            id,
            number,
            skill,
            goalie,
            inactive,
        } => {
            let player = ManageRosterUseCase::new(roster).add(PlayerDraft {
                id: id.unwrap_or_default(),
                name: Some(name),
                number,
                skill,
                position: goalie.then(|| "G".to_string()),
                active: !inactive,
            })?;
            println!("{}", player.id);
        }
        Command::Update {
            id,
            name,
            number,
            skill,
            position,
            active,
        } => {
            let patch = PlayerPatch {
                name,
                number,
                skill,
                position,
                active,
            };
            ManageRosterUseCase::new(roster).update(&PlayerId::new(id), patch)?;
        }
        Command::Remove { id } => {
            let removed = ManageRosterUseCase::new(roster).remove(&PlayerId::new(id))?;
            println!("removed {}", removed.name);
        }
        Command::Activate { ids, off } => {
            let ids: Vec<PlayerId> = ids.into_iter().map(PlayerId::new).collect();
            let changed = ManageRosterUseCase::new(roster).set_active(&ids, !off)?;
            println!("{changed} players changed");
        }
        Command::Validate => {
            let messages = roster.validate();
            print!("{}", render_violations(&messages, format)?);
            if !messages.is_empty() {
                return Ok(false);
            }
        }
        Command::Lineup { lenient } => {
            let mode = if lenient { PlanMode::Lenient } else { PlanMode::Strict };
            let plan = plan_lineup(roster, mode)?;
            print!("{}", render_lineup(&plan, format)?);
        }
        Command::Demo => {
            roster.load_demo();
            println!("loaded {} demo players", roster.player_count());
        }
        Command::Export { path } => {
            let snapshot = encode_roster(roster.players());
            match path {
                Some(path) => std::fs::write(&path, &snapshot)
                    .with_context(|| format!("cannot write {}", path.display()))?,
                None => println!("{snapshot}"),
            }
        }
        Command::Import { path } => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("cannot read {}", path.display()))?;
            let players = decode_roster(&text)
                .with_context(|| format!("cannot decode {}", path.display()))?;
            roster.replace_all(players)?;
            println!("imported {} players", roster.player_count());
        }
    }
    Ok(true)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
