//! Startup settings resolved from the environment.

use std::collections::HashMap;
use std::time::Duration;

use diet_form_server::startup::{
    FALLBACK_FILTER, TIMEOUT_SLACK, bind_address, http_timeout, log_directives, log_filter,
};
use tracing_subscriber::filter::LevelFilter;

fn env(pairs: &[(&str, &str)]) -> impl FnMut(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn log_level_var_takes_priority_over_rust_log() {
    let directives = log_directives(env(&[
        ("DIET_FORM_LOG_LEVEL", "debug"),
        ("RUST_LOG", "trace"),
    ]));
    assert_eq!(directives, "debug");
}

#[test]
fn rust_log_then_info_are_fallbacks() {
    assert_eq!(log_directives(env(&[("RUST_LOG", "warn")])), "warn");
    assert_eq!(log_directives(env(&[])), "info");
    assert_eq!(
        log_directives(env(&[("DIET_FORM_LOG_LEVEL", "  "), ("RUST_LOG", "error")])),
        "error"
    );
}

#[test]
fn valid_filter_is_used_as_given() {
    let filter = log_filter(env(&[("DIET_FORM_LOG_LEVEL", "debug,hyper=warn")]));
    assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    assert!(filter.to_string().to_lowercase().contains("hyper=warn"));
}

#[test]
fn invalid_filter_falls_back() {
    let filter = log_filter(env(&[("DIET_FORM_LOG_LEVEL", "hyper=loud")]));
    assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));
    let shown = filter.to_string().to_lowercase();
    for directive in FALLBACK_FILTER.split(',') {
        assert!(shown.contains(directive), "{shown} lacks {directive}");
    }
}

#[test]
fn default_address_when_unset_or_garbage() {
    assert_eq!(bind_address(env(&[])).to_string(), "127.0.0.1:3000");
    assert_eq!(
        bind_address(env(&[("ADDRESS", "not-an-address")])).to_string(),
        "127.0.0.1:3000"
    );
}

#[test]
fn address_from_env() {
    assert_eq!(
        bind_address(env(&[("ADDRESS", " 0.0.0.0:8080 ")])).to_string(),
        "0.0.0.0:8080"
    );
}

#[test]
fn http_timeout_adds_slack() {
    assert_eq!(
        http_timeout(Duration::from_secs(120)),
        Duration::from_secs(120) + TIMEOUT_SLACK
    );
    assert_eq!(http_timeout(Duration::MAX), Duration::MAX);
}
