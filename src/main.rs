use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

mod ledger;
mod log;
mod report;

use crate::ledger::Ledger;

/// Audit a debug-allocator log for alloc/free mismatches
#[derive(Debug, Parser)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Path of the allocation log to audit
    log: PathBuf,
}

fn main() {
    // diagnostics go to stderr, stdout carries only the report
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).unwrap();

    let args = Args::parse();
    if let Err(err) = run(&args) {
        error!("{err:#}");
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let input = fs::read_to_string(&args.log)
        .with_context(|| format!("failed to read log file {}", args.log.display()))?;

    let ledger = audit(&input)?;
    info!("{} pointers tracked", ledger.len());

    let stdout = std::io::stdout();
    let mismatches = report::write_mismatches(&ledger, &mut stdout.lock())?;
    info!("{mismatches} mismatched pointers");
    Ok(())
}

/// The whole log is parsed before the ledger is built, so a bad line
/// aborts the run before any report line is written.
fn audit(input: &str) -> Result<Ledger> {
    let records = log::parse(input)?;
    info!("parsed {} records", records.len());

    let mut ledger = Ledger::new();
    for record in records {
        ledger.record(record);
    }
    Ok(ledger)
}
