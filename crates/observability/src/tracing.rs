//! Subscriber installation.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Install JSON logging filtered by `RUST_LOG`.
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init()
        .is_ok();
    if installed {
        ::tracing::debug!("json subscriber installed");
    }
}

/// Human-readable output captured by the test harness, `debug` for the client crates.
///
/// Every test may call this; later calls are no-ops.
pub fn init_for_tests() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("thingkit_models=debug,thingkit_transport=trace"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_initialisation_is_harmless() {
        init_for_tests();
        init_for_tests();
        init();
        ::tracing::info!("still logging");
    }
}
