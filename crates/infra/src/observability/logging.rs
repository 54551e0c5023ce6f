//! `tracing-subscriber` setup
//!
//! `RUST_LOG` wins over the configured level when set. Token values never
//! appear in events, so both formats are safe to ship to log collectors.

use bullboard_domain::{BullboardError, LoggingConfig, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Filter from `RUST_LOG`, falling back to `config.level`.
///
/// # Errors
/// `BullboardError::Config` if neither source holds a valid directive.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| BullboardError::Config(format!("Invalid log level '{}': {e}", config.level)))
}

/// Install the global subscriber.
///
/// Returns `false` when a subscriber was already installed (for instance by
/// the host application or an earlier call); the existing one stays active.
///
/// # Errors
/// `BullboardError::Config` if the log level does not parse.
pub fn init_tracing(config: &LoggingConfig) -> Result<bool> {
    let filter = build_filter(config)?;

    let installed = if config.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true).with_current_span(true))
            .try_init()
            .is_ok()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .try_init()
            .is_ok()
    };

    if installed {
        tracing::debug!(level = %config.level, json = config.json, "Tracing initialized");
    }
    Ok(installed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_a_no_op() {
        let config = LoggingConfig { level: "debug".into(), json: true };
        init_tracing(&config).unwrap();
        assert!(!init_tracing(&config).unwrap());
    }

    #[test]
    fn invalid_level_is_rejected() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let config = LoggingConfig { level: "bullboard=loud".into(), json: false };
        assert!(matches!(build_filter(&config), Err(BullboardError::Config(_))));
    }
}
