use crate::DietError;
use std::time::Duration;

/// Backend used while developing on the local machine.
pub const LOCAL_API_URL: &str = "http://localhost:3333";
/// Backend used everywhere else unless overridden.
pub const PRODUCTION_API_URL: &str = "https://gerador-dieta-openai-backend.onrender.com";
/// Host name that selects [`LOCAL_API_URL`].
pub const LOCAL_HOST: &str = "localhost";

const DEFAULT_TIMEOUT_SECS: u64 = 120;
const DEFAULT_MAX_RETRIES: u32 = 2;

/// What the resolver is allowed to look at.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolveContext {
    /// Host name the form is served under, when known.
    pub host: Option<String>,
    /// Explicitly configured backend URL.
    pub override_url: Option<String>,
}

/// Pick the backend base URL for `ctx`.
///
/// A `localhost` host always wins, then a non-empty override, then the
/// production URL.
pub fn resolve_api_base_url(ctx: &ResolveContext) -> String {
    if ctx.host.as_deref().map(str::trim) == Some(LOCAL_HOST) {
        return LOCAL_API_URL.to_string();
    }
    match ctx.override_url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => url.trim_end_matches('/').to_string(),
        _ => PRODUCTION_API_URL.to_string(),
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub max_retries: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, DietError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Same as [`Config::from_env`], reading variables through `get` so tests
    /// do not touch the process environment.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, DietError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let ctx = ResolveContext {
            host: get("DIET_FORM_HOST"),
            override_url: get("DIET_API_BASE_URL"),
        };
        let timeout_secs = parse_or(&mut get, "DIET_API_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        let max_retries = parse_or(&mut get, "DIET_API_MAX_RETRIES", DEFAULT_MAX_RETRIES)?;
        let api_base_url = resolve_api_base_url(&ctx);
        tracing::debug!(host = ?ctx.host, %api_base_url, "resolved diet backend");
        Ok(Self {
            api_base_url,
            request_timeout: Duration::from_secs(timeout_secs),
            max_retries,
        })
    }
}

fn parse_or<F, T>(get: &mut F, key: &str, default: T) -> Result<T, DietError>
where
    F: FnMut(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match get(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| DietError::Config(format!("{key} must be a non-negative integer, got {raw:?}"))),
    }
}
