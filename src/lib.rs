pub mod ai;
pub mod commands;
pub mod config;
pub mod error;
pub mod execution;
pub mod plan;

pub use error::{RenamerError, Result};

use tracing_subscriber::EnvFilter;

/// Initialize tracing with the `RUST_LOG` env filter.
///
/// Default: warn for most crates, info for this one (run summaries visible).
/// Use `RUST_LOG=batch_renamer=debug` for per-operation logs.
pub fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "warn,batch_renamer=debug"
    } else {
        "warn,batch_renamer=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}
