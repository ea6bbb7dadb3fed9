//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the logging subsystem for the binary
//! - Configure the level from `RUST_LOG`, falling back to the CLI level
//!
//! # Design Decisions
//! - Uses the tracing crate for structured logging
//! - The library only emits events; installing a subscriber is the binary's job

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber. `level` applies to this crate when `RUST_LOG` is unset.
pub fn init_logging(level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("gateway_config={}", level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
