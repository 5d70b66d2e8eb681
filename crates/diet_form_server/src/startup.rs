//! Process settings read from the environment at startup.
//!
//! Every function takes the variable lookup as a closure so the binary passes
//! `std::env::var` and tests pass a map.

use std::net::SocketAddr;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

/// Preferred variable for the log filter; `RUST_LOG` is read when it is unset.
pub const LOG_LEVEL_VAR: &str = "DIET_FORM_LOG_LEVEL";

/// Filter used when the configured one does not parse.
pub const FALLBACK_FILTER: &str = "info,hyper=warn";

/// Extra time the HTTP layer grants on top of the backend timeout.
pub const TIMEOUT_SLACK: Duration = Duration::from_secs(5);

pub const ADDRESS_VAR: &str = "ADDRESS";

/// Filter directives from `DIET_FORM_LOG_LEVEL`, then `RUST_LOG`, then `info`.
/// Blank values count as unset.
pub fn log_directives(mut get: impl FnMut(&str) -> Option<String>) -> String {
    let mut lookup = |key: &str| get(key).filter(|v| !v.trim().is_empty());
    lookup(LOG_LEVEL_VAR)
        .or_else(|| lookup("RUST_LOG"))
        .unwrap_or_else(|| "info".to_string())
}

pub fn log_filter(get: impl FnMut(&str) -> Option<String>) -> EnvFilter {
    let directives = log_directives(get);
    EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new(FALLBACK_FILTER))
}

/// Socket address from `ADDRESS`, `127.0.0.1:3000` when unset or unparsable.
pub fn bind_address(mut get: impl FnMut(&str) -> Option<String>) -> SocketAddr {
    let default = SocketAddr::from(([127, 0, 0, 1], 3000));
    match get(ADDRESS_VAR) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(address = %raw, %default, "ADDRESS does not parse; using default");
            default
        }),
    }
}

/// Timeout for whole HTTP requests given the backend call timeout.
pub fn http_timeout(backend: Duration) -> Duration {
    backend.saturating_add(TIMEOUT_SLACK)
}
