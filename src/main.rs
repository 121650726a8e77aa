//! Command-line probe for shard-key hashes.
//!
//! Takes 1 to 3 decimal keys, prints the engine-compatible hash on stdout
//! and diagnostics on stderr:
//!
//! ```bash
//! orashard 42
//! orashard 7 -3
//! RUST_LOG=orashard=debug orashard 1 2 3
//! ```

use std::env;
use std::process::ExitCode;

use orashard::{in_range, HashRange};

/// Illustrative range printed alongside the hash so the classification
/// path is exercised on every run.
const DEMO_RANGE: HashRange = HashRange::new(-1_000_000, 1_000_000);

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 4 {
        let program = args.first().map(String::as_str).unwrap_or("orashard");
        eprintln!("Usage: {program} key1 [key2] [key3]");
        return ExitCode::FAILURE;
    }

    let mut keys = Vec::with_capacity(args.len() - 1);
    for (position, raw) in args[1..].iter().enumerate() {
        match raw.parse::<i64>() {
            Ok(key) => {
                eprintln!("Value-{}={key}", position + 1);
                keys.push(key);
            }
            Err(err) => {
                eprintln!("Error: argument {} ({raw:?}) is not an integer: {err}", position + 1);
                return ExitCode::FAILURE;
            }
        }
    }

    match orashard::hash_keys(&keys) {
        Ok(hash) => {
            println!("HASH={hash}");
            eprintln!(
                "InRange[{}..={}]={}",
                DEMO_RANGE.low,
                DEMO_RANGE.high,
                in_range(hash, DEMO_RANGE.low, DEMO_RANGE.high)
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
