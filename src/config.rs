use crate::models::DEFAULT_PAGE_SIZE;
use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_API_URL: &str = "RENTAL_SCOUT_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "RENTAL_SCOUT_TIMEOUT_SECS";
pub const ENV_PAGE_SIZE: &str = "RENTAL_SCOUT_PAGE_SIZE";
pub const ENV_DATA_DIR: &str = "RENTAL_SCOUT_DATA_DIR";
pub const ENV_TOKEN: &str = "RENTAL_SCOUT_TOKEN";

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Everything the client needs to reach the backend and store history
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the search service, without trailing slash
    pub api_base: String,
    pub timeout: Duration,
    pub page_size: u32,
    pub user_agent: String,
    /// Directory holding persisted client state (recent searches)
    pub data_dir: PathBuf,
    /// Bearer token to seed the session with
    pub token: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            page_size: DEFAULT_PAGE_SIZE,
            user_agent: format!("rental-scout/{}", env!("CARGO_PKG_VERSION")),
            data_dir: default_data_dir(),
            token: None,
        }
    }
}

impl ClientConfig {
    /// Build a config from the environment, honouring a `.env` file
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_URL) {
            config.api_base = url;
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = secs
                .trim()
                .parse()
                .with_context(|| format!("{} must be a number of seconds", ENV_TIMEOUT_SECS))?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(size) = lookup(ENV_PAGE_SIZE) {
            config.page_size = size
                .trim()
                .parse()
                .with_context(|| format!("{} must be a positive integer", ENV_PAGE_SIZE))?;
        }
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            config.data_dir = PathBuf::from(dir);
        }
        config.token = lookup(ENV_TOKEN).filter(|t| !t.trim().is_empty());

        config.validate()
    }

    fn validate(mut self) -> Result<Self> {
        self.api_base = self.api_base.trim().trim_end_matches('/').to_string();
        if self.api_base.is_empty() {
            bail!("{} must not be empty", ENV_API_URL);
        }
        if self.page_size == 0 {
            bail!("{} must be at least 1", ENV_PAGE_SIZE);
        }
        Ok(self)
    }

    /// Absolute URL for a backend path such as `/search`
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path.trim_start_matches('/'))
    }
}

/// `~/.rental-scout`, or the working directory when no home is known
fn default_data_dir() -> PathBuf {
    std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map(|home| PathBuf::from(home).join(".rental-scout"))
        .unwrap_or_else(|_| PathBuf::from(".rental-scout"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api_base, "http://localhost:8000");
        assert_eq!(config.page_size, 20);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.token.is_none());
    }

    #[test]
    fn overrides_and_trims_base_url() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_API_URL, "https://api.example.pe/"),
            (ENV_PAGE_SIZE, "50"),
            (ENV_TIMEOUT_SECS, "5"),
            (ENV_TOKEN, "secret"),
        ]))
        .unwrap();

        assert_eq!(config.endpoint("/search"), "https://api.example.pe/search");
        assert_eq!(config.page_size, 50);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.token.as_deref(), Some("secret"));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(ClientConfig::from_lookup(lookup(&[(ENV_PAGE_SIZE, "0")])).is_err());
        assert!(ClientConfig::from_lookup(lookup(&[(ENV_PAGE_SIZE, "many")])).is_err());
        assert!(ClientConfig::from_lookup(lookup(&[(ENV_API_URL, "  ")])).is_err());
    }
}
