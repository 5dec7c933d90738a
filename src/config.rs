use bon::Builder;
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = concat!("journal-client/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Builder)]
pub struct ClientConfig {
    #[builder(into, default = DEFAULT_BASE_URL.to_string())]
    pub base_url: String,
    #[builder(default = Duration::from_secs(DEFAULT_TIMEOUT_SECS))]
    pub timeout: Duration,
    #[builder(into, default = DEFAULT_USER_AGENT.to_string())]
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig::builder().build()
    }
}

impl ClientConfig {
    /// Reads `JJ_BASE_URL`, `JJ_TIMEOUT_SECS` and `JJ_USER_AGENT`.
    pub fn from_env() -> Self {
        Self::load_with(|key| env::var(key).ok())
    }

    pub(crate) fn load_with(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let timeout_secs: u64 = try_load(&lookup, "JJ_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS);
        Self {
            base_url: try_load(&lookup, "JJ_BASE_URL", DEFAULT_BASE_URL.to_string()),
            timeout: Duration::from_secs(timeout_secs),
            user_agent: try_load(&lookup, "JJ_USER_AGENT", DEFAULT_USER_AGENT.to_string()),
        }
    }
}

fn try_load<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        None => {
            info!("{key} not set, using default: {default}");
            default
        }
        Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value: {e}, using default: {default}");
            default
        }),
    }
}
