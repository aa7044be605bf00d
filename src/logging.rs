//! Console logging through `tracing`.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `filter`; an empty `filter` falls back to
/// [`DEFAULT_FILTER`]. Returns `false` if a subscriber was already set.
pub fn init_logging(filter: &str) -> bool {
    let filter = if filter.trim().is_empty() { DEFAULT_FILTER } else { filter };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .try_init()
        .is_ok()
}
