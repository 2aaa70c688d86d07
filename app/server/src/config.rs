//! Configuration management
//!
//! Reads the server settings from the environment once at startup.
//! A `.env` file in the working directory is honoured (see `main`).

use anyhow::{anyhow, Context, Result};
use reqwest::Url;
use std::env;
use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
pub const DEFAULT_EXPLORER_BASE_URL: &str = "https://blockstream.info/api";
pub const DEFAULT_PRICE_API_URL: &str = "https://api.coingecko.com/api/v3/simple/price";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Read-only server configuration, shared by every request.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// Esplora base, e.g. `https://blockstream.info/api`. Transactions live at `{base}/tx/{txid}`.
    pub explorer_base_url: Url,
    /// CoinGecko `/simple/price` endpoint.
    pub price_api_url: Url,
    pub price_api_key: Option<String>,
    /// Budget for each outbound call.
    pub request_timeout: Duration,
}

impl Config {
    /// Build the configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// Unset or blank variables fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bind_addr = var("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("Invalid BIND_ADDR")?;

        let explorer_base_url = parse_base_url(
            "EXPLORER_BASE_URL",
            &var("EXPLORER_BASE_URL").unwrap_or_else(|| DEFAULT_EXPLORER_BASE_URL.to_string()),
        )?;

        let price_api_url = parse_base_url(
            "PRICE_API_URL",
            &var("PRICE_API_URL").unwrap_or_else(|| DEFAULT_PRICE_API_URL.to_string()),
        )?;

        let timeout_secs = match var("REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("Invalid REQUEST_TIMEOUT_SECS '{}'", raw))?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(anyhow!("REQUEST_TIMEOUT_SECS must be greater than zero"));
        }

        Ok(Self {
            bind_addr,
            explorer_base_url,
            price_api_url,
            price_api_key: var("PRICE_API_KEY"),
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.parse().expect("valid default bind address"),
            explorer_base_url: Url::parse(DEFAULT_EXPLORER_BASE_URL).expect("valid url"),
            price_api_url: Url::parse(DEFAULT_PRICE_API_URL).expect("valid url"),
            price_api_key: None,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

fn parse_base_url(key: &str, raw: &str) -> Result<Url> {
    let url = Url::parse(raw).with_context(|| format!("Invalid {} '{}'", key, raw))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(anyhow!("{} '{}' must be an http(s) URL", key, raw));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:5000".parse().unwrap());
        assert_eq!(config.explorer_base_url.as_str(), "https://blockstream.info/api");
        assert_eq!(
            config.price_api_url.as_str(),
            "https://api.coingecko.com/api/v3/simple/price"
        );
        assert_eq!(config.price_api_key, None);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn overrides_are_applied() {
        let config = config_from(&[
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("EXPLORER_BASE_URL", "https://mempool.space/api"),
            ("PRICE_API_KEY", " demo-key "),
            ("REQUEST_TIMEOUT_SECS", "3"),
        ])
        .unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(config.explorer_base_url.host_str(), Some("mempool.space"));
        assert_eq!(config.price_api_key.as_deref(), Some("demo-key"));
        assert_eq!(config.request_timeout, Duration::from_secs(3));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = config_from(&[("PRICE_API_KEY", "   "), ("BIND_ADDR", "")]).unwrap();
        assert_eq!(config.price_api_key, None);
        assert_eq!(config.bind_addr, "0.0.0.0:5000".parse().unwrap());
    }

    #[test]
    fn rejects_bad_values() {
        assert!(config_from(&[("BIND_ADDR", "not-an-addr")]).is_err());
        assert!(config_from(&[("REQUEST_TIMEOUT_SECS", "ten")]).is_err());
        assert!(config_from(&[("REQUEST_TIMEOUT_SECS", "0")]).is_err());
        assert!(config_from(&[("EXPLORER_BASE_URL", "mailto:someone@example.com")]).is_err());
        assert!(config_from(&[("PRICE_API_URL", "ftp://prices.example.com")]).is_err());
    }
}
