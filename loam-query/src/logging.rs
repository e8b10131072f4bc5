//! Logging bootstrap.
//!
//! Structured logging is controlled by environment variables:
//!
//! - `LOAM_DEBUG=true|1|yes` - enable debug logging
//! - `LOAM_LOG_LEVEL=trace|debug|info|warn|error` - set a specific level
//! - `LOAM_LOG_FORMAT=json|pretty|compact` - set the output format (default: json)
//!
//! Call [`init`] once at startup (requires the `tracing-subscriber`
//! feature). Within Loam itself, the standard `tracing` macros are used:
//!
//! ```rust,ignore
//! use tracing::{debug, warn};
//!
//! debug!(model = %schema.name(), attribute, "coalescing lazy attribute fetch");
//! warn!(model = %schema.name(), "batch result row lacks identifier columns");
//! ```

use std::env;

/// Check if debug logging is enabled via `LOAM_DEBUG`.
#[inline]
pub fn is_debug_enabled() -> bool {
    env::var("LOAM_DEBUG")
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

/// The configured log level from `LOAM_LOG_LEVEL`.
///
/// Defaults to "debug" when `LOAM_DEBUG` is enabled, otherwise "warn".
pub fn log_level() -> &'static str {
    if let Ok(level) = env::var("LOAM_LOG_LEVEL") {
        match level.to_lowercase().as_str() {
            "trace" => return "trace",
            "debug" => return "debug",
            "info" => return "info",
            "warn" => return "warn",
            "error" => return "error",
            _ => {}
        }
    }
    if is_debug_enabled() { "debug" } else { "warn" }
}

/// The configured output format from `LOAM_LOG_FORMAT`.
pub fn log_format() -> &'static str {
    match env::var("LOAM_LOG_FORMAT").as_deref() {
        Ok("pretty") => "pretty",
        Ok("compact") => "compact",
        _ => "json",
    }
}

/// Install a global subscriber configured from the environment.
///
/// Safe to call more than once; only the first call installs.
#[cfg(feature = "tracing-subscriber")]
pub fn init() {
    use std::sync::Once;

    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let level = log_level();
        let filter = tracing_subscriber::EnvFilter::new(format!(
            "loam_query={level},loam_memory={level}"
        ));
        let builder = tracing_subscriber::fmt().with_env_filter(filter);
        let result = match log_format() {
            "pretty" => builder.pretty().try_init(),
            "compact" => builder.compact().try_init(),
            _ => builder.json().try_init(),
        };
        // A subscriber installed by the host application wins.
        let _ = result;
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_is_always_valid() {
        assert!(["trace", "debug", "info", "warn", "error"].contains(&log_level()));
    }

    #[test]
    fn test_log_format_is_always_valid() {
        assert!(["json", "pretty", "compact"].contains(&log_format()));
    }
}
