//! Coral CLI — Redis-inspired shell for the CoralDB engine.
//!
//! Two modes:
//! - **REPL mode**: `coral [flags]` — interactive prompt (if stdin is a TTY)
//! - **Pipe mode**: `echo "SET k v" | coral` — line-by-line from stdin
//!
//! Exit code is 0 on a clean SHUTDOWN (or EOF, which shuts down for you).

mod format;
mod repl;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use coral_executor::{Coral, EngineConfig};
use tracing_subscriber::EnvFilter;

/// In-memory key-value store with a Redis-style command surface.
#[derive(Debug, Parser)]
#[command(name = "coral", version, about)]
struct Cli {
    /// Snapshot file location.
    #[arg(long, default_value = "db.json")]
    path: PathBuf,

    /// Pin the index hash seed (default: wall clock).
    #[arg(long)]
    seed: Option<u32>,

    /// Suppress the banner in interactive mode.
    #[arg(long)]
    quiet: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = EngineConfig::new().persistence_path(&cli.path);
    if let Some(seed) = cli.seed {
        config = config.hash_seed(seed);
    }

    let db = match Coral::start(config) {
        Ok(db) => db,
        Err(err) => {
            eprintln!("(error) {err}");
            return ExitCode::FAILURE;
        }
    };

    let code = if std::io::stdin().is_terminal() {
        repl::run_repl(&db, cli.quiet)
    } else {
        repl::run_pipe(&db)
    };

    // EOF and quit paths still persist; SHUTDOWN already closed the engine.
    if db.is_running() {
        db.shutdown();
    }

    code
}
