use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use taskforge_hitl::core::AppConfig;
use taskforge_hitl::{DispatchOutcome, Dispatcher};
use tracing_subscriber::EnvFilter;

/// Render one HITL approval record from a JSON batch of task records.
#[derive(Debug, Parser)]
#[command(name = "hitl-dispatch", version)]
struct Args {
    /// Read the batch from this file instead of stdin.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Pretty-print the output record.
    #[arg(long)]
    pretty: bool,
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("reading batch from stdin")?;
            Ok(buf)
        }
    }
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only the record.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let (dispatcher, outcome): (Dispatcher, DispatchOutcome) = match AppConfig::from_env() {
        Ok(config) => {
            let dispatcher = Dispatcher::new(config);
            let outcome = match read_input(args.input.as_ref()) {
                Ok(input) => dispatcher.dispatch_str(&input),
                Err(e) => dispatcher.fail(&format!("{:#}", e)),
            };
            (dispatcher, outcome)
        }
        Err(e) => {
            let dispatcher = Dispatcher::default();
            let outcome = dispatcher.fail(&e);
            (dispatcher, outcome)
        }
    };

    let record = dispatcher.to_record(&outcome);
    let rendered = if args.pretty {
        serde_json::to_string_pretty(&record)?
    } else {
        serde_json::to_string(&record)?
    };
    println!("{}", rendered);
    Ok(())
}
