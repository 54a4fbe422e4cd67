//! Ledger Settlement CLI
//!
//! Replays a CSV of ledger commands and prints every stored transaction
//! with its settled balance.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- commands.csv > transactions.csv
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity
//! - `LEDGER_COMMAND_TIMEOUT_MS`: Optional deadline for each command

use ledger_settlement::{Config, LedgerError, LedgerProcessor, Result};
use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(LedgerError::MissingArgument);
    }

    let config = Config::from_env()?;

    let input_path = &args[1];
    let file = File::open(input_path)?;
    let reader = BufReader::new(file);

    let processor = LedgerProcessor::in_memory(config);
    processor.process_csv(reader)?;

    let stdout = io::stdout();
    let handle = stdout.lock();
    processor.write_output(handle)?;

    Ok(())
}
