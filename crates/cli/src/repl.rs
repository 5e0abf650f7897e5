//! REPL loop with rustyline, plus pipe mode.
//!
//! Interactive mode: prompt, history, Ctrl-C to clear the line, Ctrl-D to
//! exit (persisting on the way out). Pipe mode: read lines from stdin,
//! execute each, skip blanks and `#` comments.

use std::io::{self, BufRead};
use std::process::ExitCode;

use coral_executor::Coral;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::format::format_reply;

const PROMPT: &str = "coral> ";

fn history_file() -> Option<String> {
    std::env::var("HOME")
        .ok()
        .map(|home| format!("{home}/.coral_history"))
}

/// Run the interactive REPL. Returns the process exit code.
pub fn run_repl(db: &Coral, quiet: bool) -> ExitCode {
    if !quiet {
        println!("coral {} — type SHUTDOWN or Ctrl-D to exit", env!("CARGO_PKG_VERSION"));
    }

    let mut rl = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(err) => {
            eprintln!("(error) {err}");
            return ExitCode::FAILURE;
        }
    };

    let history = history_file();
    if let Some(ref path) = history {
        let _ = rl.load_history(path);
    }

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                let reply = db.command(trimmed);
                println!("{}", format_reply(&reply));

                if !db.is_running() {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl-C — just show a new prompt.
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl-D — exit; main persists via shutdown.
                break;
            }
            Err(err) => {
                eprintln!("(error) {err:?}");
                break;
            }
        }
    }

    if let Some(ref path) = history {
        let _ = rl.save_history(path);
    }

    ExitCode::SUCCESS
}

/// Pipe mode: read lines from stdin, execute each. Returns the process
/// exit code; any error reply makes it nonzero.
pub fn run_pipe(db: &Coral) -> ExitCode {
    let stdin = io::stdin();
    let mut failed = false;

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let reply = db.command(trimmed);
        if reply.is_ok() {
            println!("{}", format_reply(&reply));
        } else {
            eprintln!("{}", format_reply(&reply));
            failed = true;
        }

        if !db.is_running() {
            break;
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
