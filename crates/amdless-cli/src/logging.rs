//! Tracing setup for the batch driver.
//!
//! The CLI owns the subscriber; library crates stay logging-free. All log
//! output goes to stderr because stdout carries converted source (or the
//! `--json` summary) and must stay clean.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber.
///
/// `verbosity` maps 0/1/2+ to info/debug/trace for this crate's targets
/// while foreign crates stay at warn; an explicit `RUST_LOG` wins over both.
pub fn init(verbosity: u8, json: bool) {
    let own_level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,amdless_cli={own_level},amdless_core={own_level}"
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
