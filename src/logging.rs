//! Tracing setup for host applications and demos
//!
//! Stores only emit `tracing` events; installing a subscriber is left to the
//! host. [`init_tracing`] is the ready-made choice.

use anyhow::Result;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install a global fmt subscriber
///
/// `RUST_LOG` wins when set; otherwise `default_directive` (for example
/// `"shelf=debug"`) is used. Fails if a global subscriber is already set.
pub fn init_tracing(default_directive: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init()?;

    Ok(())
}
