//! Logging initialization.
//!
//! `tracing` with a human-readable or JSON layer on stderr. RUST_LOG, when
//! set, replaces the computed filter entirely.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Build the default filter for a base level.
///
/// HTTP request spans from `tower_http` follow the base level only when it
/// is `debug` or more verbose.
fn default_filter(level: &str) -> EnvFilter {
    let http_level = match level {
        "debug" | "trace" => level,
        _ => "warn",
    };
    EnvFilter::new(format!("{level},tower_http={http_level}"))
}

/// Initialize the logging subsystem.
pub fn init(level: &str, json_format: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(level));

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Initialize logging from the `[logging]` config section, with CLI overrides.
pub fn init_from_config(
    config: &pokelens_core::Config,
    verbose_override: bool,
    json_logs_override: bool,
) {
    let level = if verbose_override {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let json_format = json_logs_override || config.logging.format == "json";
    init(level, json_format);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_quiets_http_spans_at_info() {
        let filter = default_filter("info").to_string();
        assert!(filter.contains("tower_http=warn"));
        assert!(filter.contains("info"));
    }

    #[test]
    fn test_default_filter_follows_debug() {
        assert!(default_filter("debug").to_string().contains("tower_http=debug"));
    }
}
