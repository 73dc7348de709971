use std::{net::SocketAddr, time::Duration};

use anyhow::Context;

use crate::provider::DEFAULT_CAST_LIMIT;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    pub provider_api_key: String,
    pub provider_base_url: String,
    pub provider_language: String,
    pub provider_timeout: Duration,
    pub provider_rps: u32,
    pub cast_limit: usize,
    pub max_concurrent: usize,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = var("PORT").unwrap_or_else(|| "5000".to_string()).parse().context("PORT")?;

        let database_url =
            var("DATABASE_URL").unwrap_or_else(|| "sqlite://filmcast.db?mode=rwc".to_string());

        let provider_api_key = var("PROVIDER_API_KEY").unwrap_or_default();
        let provider_base_url = var("PROVIDER_BASE_URL")
            .unwrap_or_else(|| "https://www.myapifilms.com/imdb".to_string());
        let provider_language = var("PROVIDER_LANGUAGE").unwrap_or_else(|| "en-us".to_string());

        let provider_timeout_secs: u64 = match var("PROVIDER_TIMEOUT_SECS") {
            Some(s) => s.parse().context("PROVIDER_TIMEOUT_SECS")?,
            None => 30,
        };

        let provider_rps: u32 = var("PROVIDER_RPS").and_then(|s| s.parse().ok()).unwrap_or(4);

        let cast_limit: usize =
            var("CAST_LIMIT").and_then(|s| s.parse().ok()).unwrap_or(DEFAULT_CAST_LIMIT);

        let max_concurrent: usize =
            var("MAX_CONCURRENT_REQUESTS").and_then(|s| s.parse().ok()).unwrap_or(5);

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            database_url,
            provider_api_key,
            provider_base_url,
            provider_language,
            provider_timeout: Duration::from_secs(provider_timeout_secs),
            provider_rps,
            cast_limit,
            max_concurrent,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.addr.port(), 5000);
        assert_eq!(cfg.cast_limit, 5);
        assert_eq!(cfg.provider_timeout, Duration::from_secs(30));
        assert!(cfg.provider_api_key.is_empty());
        assert!(cfg.database_url.starts_with("sqlite://"));
    }

    #[test]
    fn overrides_are_read() {
        let cfg = config(&[
            ("PORT", "8080"),
            ("PROVIDER_API_KEY", "secret"),
            ("CAST_LIMIT", "3"),
            ("PROVIDER_TIMEOUT_SECS", "5"),
        ])
        .unwrap();
        assert_eq!(cfg.addr.port(), 8080);
        assert_eq!(cfg.provider_api_key, "secret");
        assert_eq!(cfg.cast_limit, 3);
        assert_eq!(cfg.provider_timeout, Duration::from_secs(5));
    }

    #[test]
    fn bad_port_is_an_error() {
        assert!(config(&[("PORT", "not-a-port")]).is_err());
    }
}
