//! `swarm-bus` — the in-process publish/subscribe backplane shared by every
//! component of the coordination core.
//!
//! A single [`Bus`] instance is constructed once at process startup and
//! cloned into every long-running task. Topics are plain strings; see
//! [`bus::topics`] for the well-known channel names. Publish never blocks
//! and never fails the caller - a topic with no subscribers simply drops
//! the message, matching the at-most-once, best-effort semantics of the
//! Redis pub/sub deployment this module stands in for.

pub mod bus;

pub use bus::{Bus, BusError, Envelope, Subscription};

/// Library version, surfaced in `/health` and startup logs.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the process-wide tracing subscriber. Respects `RUST_LOG`.
pub fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
