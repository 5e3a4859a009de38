use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

/// Initializes the tracing subscriber. `RUST_LOG` wins over the
/// configured level; repeated calls are no-ops.
pub fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));

    if config.log_json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .try_init()
            .ok();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .try_init()
            .ok();
    }
}
