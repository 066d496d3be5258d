//! Development entry point for seeding a local Active database.
//!
//! # Responsibility
//! - Seed, erase or count entities in a database file.
//! - Print human-readable results; diagnostics go to the stderr log, or to
//!   rotating files under `--log-dir`.
//!
//! # Invariants
//! - A failed erase ends the process with a non-zero exit code.

use active_core::seed::steps::HabitsSeed;
use active_core::{
    core_version, default_log_level, init_console_logging, init_logging, Seeder, Store,
};
use clap::{Parser, Subcommand};
use log::{debug, error};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "active",
    version = env!("CARGO_PKG_VERSION"),
    about = "Seed and inspect a local Active habit database",
    long_about = None
)]
struct Cli {
    /// SQLite database file (created and migrated when missing)
    #[arg(global = true, long = "db", env = "ACTIVE_DB", default_value = "active.sqlite3")]
    db: PathBuf,

    /// Log level: trace|debug|info|warn|error
    #[arg(global = true, long = "log-level", env = "ACTIVE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Absolute directory for rotating log files; logs go to stderr when unset
    #[arg(global = true, long = "log-dir", env = "ACTIVE_LOG_DIR")]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the seed steps and print the resulting entity counts
    Seed {
        /// Also seed habits (with sequences, fire times and notifications) up to this many
        #[arg(long = "habits", default_value_t = 0)]
        habits: usize,

        /// Length in days of each seeded habit's sequence
        #[arg(long = "sequence-days", default_value_t = 14)]
        sequence_days: u32,
    },

    /// Remove seeded days and the user (cascading to everything they own)
    Erase,

    /// Print the entity counts
    Counts,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| default_log_level().to_string());
    let logging = match cli.log_dir.as_deref() {
        Some(dir) => init_logging(&level, dir),
        None => init_console_logging(&level),
    };
    if let Err(err) = logging {
        eprintln!("Error: {err}");
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_exit module=cli status=error error={err}");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    debug!(
        "event=cli_start module=cli status=start core_version={} db={}",
        core_version(),
        cli.db.display()
    );
    let store = Arc::new(Store::open(&cli.db)?);
    let mut seeder = Seeder::new(Arc::clone(&store));

    match cli.command {
        Command::Seed {
            habits,
            sequence_days,
        } => {
            if habits > 0 {
                seeder.register_step(Box::new(
                    HabitsSeed::new(habits).with_sequence_days(sequence_days),
                ));
            }
            let report = seeder.seed();
            println!("{report}");
        }
        Command::Erase => {
            let summary = seeder.erase()?;
            println!(
                "Removed {} day(s){}",
                summary.days_deleted,
                if summary.user_deleted {
                    " and the user"
                } else {
                    ""
                }
            );
        }
        Command::Counts => println!("{}", seeder.entity_counts()),
    }

    Ok(())
}
