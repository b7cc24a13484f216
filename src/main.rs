//! Vigilar CLI
//!
//! # Usage
//!
//! ```bash
//! # Write the reference artifacts
//! vigilar init ./artifacts
//!
//! # Check the artifacts load and agree with each other
//! vigilar check
//!
//! # Watch the simulated sensor
//! vigilar monitor --interval-ms 1000 --cycles 20
//!
//! # Diagnose one reading
//! vigilar predict "Air Temperature [K]=300" "Process Temperature [K]=310" \
//!     "Rotational Speed [rpm]=1500" "Torque [Nm]=240" "Tool Wear [min]=590"
//!
//! # Serve predictions over HTTP
//! vigilar --config monitor.yaml serve
//! ```

use clap::Parser;
use std::process::ExitCode;
use vigilar::cli::{init_tracing, run_command, Cli, LogLevel};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(LogLevel::from_flags(cli.verbose, cli.quiet));

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
