//! Process-wide tracing subscriber

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "github_agent=info";

/// Install the fmt subscriber, filtered by `RUST_LOG`.
///
/// Returns `false` when a global subscriber was already installed, which
/// happens when the crate is embedded in a host that configures tracing.
pub fn init_logging() -> bool {
    init_logging_with(DEFAULT_LOG_FILTER)
}

/// Same as [`init_logging`] with a caller-chosen fallback filter
pub fn init_logging_with(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init()
        .is_ok()
}
