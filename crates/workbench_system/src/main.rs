//! `workbench-driver`: the reference headless driver (design doc §6).
//!
//! Reads one JSON-encoded [`Command`] per line from standard input, applies
//! it to a single in-process [`Workbench`], and writes one JSON-encoded
//! [`Response`] per line to standard output. Exists so the engines can be
//! exercised end to end without the UI collaborator this repo doesn't own.

use std::io::{self, BufRead, Write};

use clap::Parser;

use workbench_system::{Command, Workbench};

/// Command-line flags for the headless driver.
#[derive(Parser)]
#[command(name = "workbench-driver")]
#[command(about = "Headless JSON-lines driver for the formal-methods workbench core")]
struct Cli {
    /// Bound on backward derivation search depth (design doc §5, default 10).
    #[arg(long = "max-depth", default_value_t = workbench_kernel::DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Bound on example-enumeration and random-term-generation depth.
    #[arg(long = "enumeration-depth", default_value_t = 3)]
    enumeration_depth: usize,

    /// Seed for the RNG backing `generateRandomTerm`. Omit for a fixed
    /// default seed, keeping runs reproducible unless the caller asks
    /// otherwise.
    #[arg(long = "seed")]
    seed: Option<u64>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let mut workbench = Workbench::new(cli.max_depth, cli.enumeration_depth, cli.seed);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                log::error!("failed to read a line from stdin: {}", err);
                break;
            }
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let outcome = match serde_json::from_str::<Command>(trimmed) {
            Ok(command) => workbench.execute(command).map_err(|err| err.to_string()),
            Err(err) => Err(format!("malformed command: {}", err)),
        };

        let line_out = match outcome {
            Ok(response) => serde_json::to_string(&response).unwrap_or_else(|err| {
                log::error!("failed to serialize a successful response: {}", err);
                r#"{"error":"internal serialization failure"}"#.to_string()
            }),
            Err(message) => serde_json::json!({ "error": message }).to_string(),
        };

        if writeln!(out, "{}", line_out).is_err() {
            log::error!("stdout closed; stopping");
            break;
        }
    }
}
