//! `docsync-edit`: apply one structural edit to a JSON or YAML document.
//!
//! Usage:
//!   docsync-edit '<mutation-json>'
//!
//! The document is read from stdin and written to stdout in the same syntax.
//! Example mutation: `{"op":"rename_key","path":["paths"],"old_key":"/a","new_key":"/b"}`.
//! Set `DOCSYNC_CONFIG` to a TOML file to change indentation.

use docsync::cli::apply_mutation;
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
    let mutation = match args.get(1) {
        Some(m) => m.clone(),
        None => {
            eprintln!("First argument must be a JSON-encoded mutation.");
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

    match apply_mutation(&buf, &mutation, config) {
        Ok(mut result) => {
            if !result.ends_with('\n') {
                result.push('\n');
            }
            if let Err(e) = io::stdout().write_all(result.as_bytes()) {
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
