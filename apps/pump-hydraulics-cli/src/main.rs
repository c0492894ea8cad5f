//! `pump-hydraulics-cli` — reads a `SystemState` as JSON on stdin, writes
//! the derived `Derived` snapshot as JSON on stdout.
//!
//! Exit codes: `0` success, `1` malformed input (I/O or JSON decode
//! error), `2` strict-mode hydraulic error (invalid input or a
//! nonconvergent supply solve).

use std::io::{self, Read, Write};
use std::process::ExitCode;

use clap::Parser;
use pump_hydraulics::{recompute, recompute_strict, SystemState};

/// Run one hydraulics recompute pass against a `SystemState` snapshot.
#[derive(Debug, Parser)]
#[command(name = "pump-hydraulics-cli", version)]
struct Args {
    /// Fail on invalid input or solver nonconvergence instead of
    /// degrading to an advisory. Also settable via PUMP_HYDRAULICS_STRICT.
    #[arg(long)]
    strict: bool,
}

fn strict_mode(args: &Args) -> bool {
    args.strict
        || std::env::var("PUMP_HYDRAULICS_STRICT")
            .map(|v| !v.is_empty() && v != "0" && v.to_lowercase() != "false")
            .unwrap_or(false)
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();
}

fn read_system_state() -> anyhow::Result<SystemState> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    Ok(serde_json::from_str(&input)?)
}

fn main() -> ExitCode {
    init_logging();
    let args = Args::parse();

    let state = match read_system_state() {
        Ok(state) => state,
        Err(err) => {
            tracing::error!(error = %err, "failed to read or parse SystemState from stdin");
            eprintln!("error: {err}");
            return ExitCode::from(1);
        }
    };

    if strict_mode(&args) {
        match recompute_strict(&state) {
            Ok(derived) => write_derived(&derived),
            Err(err) => {
                tracing::warn!(error = %err, "recompute_strict rejected input");
                eprintln!("error: {err}");
                ExitCode::from(2)
            }
        }
    } else {
        let derived = recompute(&state);
        write_derived(&derived)
    }
}

fn write_derived(derived: &pump_hydraulics::Derived) -> ExitCode {
    match serde_json::to_string_pretty(derived) {
        Ok(json) => match writeln!(io::stdout(), "{json}") {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("error: failed to write output: {err}");
                ExitCode::from(2)
            }
        },
        Err(err) => {
            eprintln!("error: failed to serialize output: {err}");
            ExitCode::from(2)
        }
    }
}
