//! Logging configuration using tracing.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter for the given verbosity
pub fn default_level(quiet: bool) -> &'static str {
    if quiet {
        "warn"
    } else {
        "info"
    }
}

/// Initialize logging on stderr; `RUST_LOG` takes precedence over `quiet`
pub fn init(quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level(quiet)))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_target(false)
                .with_level(false),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_keeps_warnings() {
        assert_eq!(default_level(true), "warn");
        assert_eq!(default_level(false), "info");
    }
}
