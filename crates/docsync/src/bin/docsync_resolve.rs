//! `docsync-resolve`: print the node an internal reference points to.
//!
//! Usage:
//!   docsync-resolve '#/components/schemas/Pet'
//!
//! The document is read from stdin. Chains of `$ref` are followed; a cycle
//! is reported as an error.

use docsync::cli::resolve_reference;
use docsync::config::SyncConfig;
use std::io::{self, Read, Write};
use tracing::error;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let reference = match args.get(1) {
        Some(r) => r.clone(),
        None => {
            eprintln!("First argument must be a reference such as '#/components/schemas/Pet'.");
            std::process::exit(1);
        }
    };

    let config = match SyncConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    let mut buf = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut buf) {
        error!("{e}");
        std::process::exit(1);
    }

    match resolve_reference(&buf, &reference, &config) {
        Ok(result) => {
            let mut out = result;
            if !out.ends_with('\n') {
                out.push('\n');
            }
            if let Err(e) = io::stdout().write_all(out.as_bytes()) {
                error!("{e}");
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
