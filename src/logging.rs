//! Tracing setup for the binary.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Installs a compact stdout subscriber.
///
/// `RUST_LOG` wins when set; otherwise the crate logs at `level` and
/// everything else at `warn`. Calling this twice is harmless: the second
/// install fails and is ignored.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,rosterkeeper={level}")));

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .compact();

    let _ = tracing_subscriber::registry().with(filter).with(fmt_layer).try_init();
}
