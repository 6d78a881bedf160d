use std::env;
use std::time::Duration;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8009/api";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Base URL of the transactions backend, including its `/api` prefix.
    pub backend_url: String,
    pub backend_timeout: Duration,
    /// Page size used when walking `GET /transactions`.
    pub page_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 7070,
            backend_url: DEFAULT_BACKEND_URL.into(),
            backend_timeout: Duration::from_secs(30),
            page_size: 500,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset or unparsable values keep defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            host: lookup("SPENDLENS_HOST").unwrap_or(defaults.host),
            port: lookup("SPENDLENS_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            backend_url: lookup("SPENDLENS_BACKEND_URL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.backend_url),
            backend_timeout: lookup("SPENDLENS_BACKEND_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.backend_timeout),
            page_size: lookup("SPENDLENS_PAGE_SIZE")
                .and_then(|v| v.parse().ok())
                .filter(|n: &usize| *n > 0)
                .unwrap_or(defaults.page_size),
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
