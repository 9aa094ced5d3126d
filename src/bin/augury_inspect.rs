//! Augury Snapshot Inspector
//!
//! Membaca header envelope dari snapshot file tanpa men-decode payload:
//! - Nama serializer yang tercatat
//! - Ukuran payload
//!
//! Usage:
//!   cargo run --release --bin augury_inspect -- [OPTIONS] <PATH>...

use std::path::PathBuf;

use augury::storage::Snapshot;
use tracing::{debug, error, info};

/// Inspector configuration
struct InspectConfig {
    paths: Vec<PathBuf>,
    verbose: bool,
}

impl Default for InspectConfig {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            verbose: false,
        }
    }
}

fn inspect(path: &PathBuf) -> augury::Result<()> {
    let snapshot = Snapshot::open(path)?;
    let name = snapshot.serializer_name()?;
    let payload = snapshot.payload_len()?;

    debug!("{:?}: {} bytes total", snapshot.path(), snapshot.len());
    println!("{}", path.display());
    println!("  Serializer: {}", name);
    println!("  Payload:    {} bytes", payload);
    Ok(())
}

fn print_help() {
    println!("Augury Snapshot Inspector\n");
    println!("Usage: augury_inspect [OPTIONS] <PATH>...\n");
    println!("Options:");
    println!("  -v, --verbose   Debug logging (RUST_LOG overrides)");
    println!("  -h, --help      Show this help");
}

fn parse_args() -> InspectConfig {
    let args: Vec<String> = std::env::args().collect();
    let mut config = InspectConfig::default();

    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--verbose" | "-v" => {
                config.verbose = true;
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            path => config.paths.push(PathBuf::from(path)),
        }
    }

    config
}

fn main() {
    let config = parse_args();

    let default_level = if config.verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if config.paths.is_empty() {
        print_help();
        std::process::exit(2);
    }

    info!("Inspecting {} snapshot(s)", config.paths.len());

    for path in &config.paths {
        if let Err(e) = inspect(path) {
            error!("{}: {} ({})", path.display(), e, e.error_code());
            std::process::exit(1);
        }
    }
}
