// logging.rs - tracing-subscriber setup shared by both binaries

use tracing_subscriber::EnvFilter;

/// Maps the legacy `LOG` level names onto tracing directives
fn legacy_level(level: &str) -> Option<&'static str> {
    match level.trim().to_ascii_lowercase().as_str() {
        "debug" => Some("debug"),
        "info" => Some("info"),
        "warn" | "warning" => Some("warn"),
        // tracing has no level above error
        "error" | "fatal" => Some("error"),
        _ => None,
    }
}

/// `RUST_LOG` wins, then `LOG`, then `default`
pub fn env_filter(default: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let level = std::env::var("LOG")
        .ok()
        .as_deref()
        .and_then(legacy_level)
        .unwrap_or(default);
    EnvFilter::new(level)
}

/// Installs the global subscriber for the server
pub fn init() {
    tracing_subscriber::fmt().with_env_filter(env_filter("info")).init();
}
