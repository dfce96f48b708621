//! Crecer CLI
//!
//! # Usage
//!
//! ```bash
//! # Train the artifact pair from historical data
//! crecer train ready_data.csv --out-dir model
//!
//! # Train with overrides
//! crecer train ready_data.csv --trees 200 --seed 7
//!
//! # Predict a growth class for one record
//! crecer predict record.json --model-dir model
//!
//! # Rank a venture pool against an investor preference
//! crecer recommend pool.csv preference.json
//! ```

use clap::Parser;
use crecer::cli::{run_command, Cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
