use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, anyhow};

pub const API_KEY_ENV_VAR: &str = "GEMINI_API_KEY";
pub const LISTEN_ADDR_ENV_VAR: &str = "CARDVANTAGE_LISTEN_ADDR";
pub const MODEL_ENV_VAR: &str = "CARDVANTAGE_MODEL";
pub const INFERENCE_TIMEOUT_ENV_VAR: &str = "CARDVANTAGE_INFERENCE_TIMEOUT_MS";
pub const CORS_ENV_VAR: &str = "CARDVANTAGE_CORS_ALLOW_ORIGINS";
pub const LOG_FORMAT_ENV_VAR: &str = "CARDVANTAGE_LOG_FORMAT";

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_INFERENCE_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    pub api_key: String,
    pub model: String,
    pub inference_timeout: Duration,
    pub cors_allow: Vec<String>,
}

impl ServerConfig {
    /// Reads the process environment after loading `.env` when present.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_ENV_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| anyhow!("API Key not found"))?;

        let raw_addr = lookup(LISTEN_ADDR_ENV_VAR).unwrap_or_else(|| DEFAULT_LISTEN_ADDR.into());
        let listen_addr: SocketAddr = raw_addr
            .trim()
            .parse()
            .with_context(|| format!("Invalid {LISTEN_ADDR_ENV_VAR}: `{raw_addr}`"))?;

        let model = lookup(MODEL_ENV_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.into());

        let timeout_ms = lookup(INFERENCE_TIMEOUT_ENV_VAR)
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(DEFAULT_INFERENCE_TIMEOUT_MS);

        let cors_allow = lookup(CORS_ENV_VAR)
            .unwrap_or_else(|| "*".into())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            listen_addr,
            api_key,
            model,
            inference_timeout: Duration::from_millis(timeout_ms),
            cors_allow,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use super::ServerConfig;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<ServerConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn missing_api_key_refuses_to_start() {
        let result = config_from(&[]);
        assert!(matches!(result, Err(ref error) if error.to_string() == "API Key not found"));

        let blank = config_from(&[("GEMINI_API_KEY", "  ")]);
        assert!(blank.is_err());
    }

    #[test]
    fn defaults_apply_when_only_the_key_is_set() {
        let result = config_from(&[("GEMINI_API_KEY", "secret")]);
        assert!(result.is_ok());
        if let Ok(config) = result {
            assert_eq!(config.listen_addr.to_string(), "0.0.0.0:8080");
            assert_eq!(config.model, "gemini-2.5-flash");
            assert_eq!(config.inference_timeout, Duration::from_millis(30_000));
            assert_eq!(config.cors_allow, vec!["*".to_string()]);
        }
    }

    #[test]
    fn overrides_are_parsed() {
        let result = config_from(&[
            ("GEMINI_API_KEY", "secret"),
            ("CARDVANTAGE_LISTEN_ADDR", "127.0.0.1:9090"),
            ("CARDVANTAGE_MODEL", "gemini-2.5-pro"),
            ("CARDVANTAGE_INFERENCE_TIMEOUT_MS", "abc"),
            (
                "CARDVANTAGE_CORS_ALLOW_ORIGINS",
                "chrome-extension://abc, http://localhost:3000,",
            ),
        ]);
        assert!(result.is_ok());
        if let Ok(config) = result {
            assert_eq!(config.listen_addr.port(), 9090);
            assert_eq!(config.model, "gemini-2.5-pro");
            assert_eq!(config.inference_timeout, Duration::from_millis(30_000));
            assert_eq!(
                config.cors_allow,
                vec![
                    "chrome-extension://abc".to_string(),
                    "http://localhost:3000".to_string()
                ]
            );
        }
    }

    #[test]
    fn invalid_listen_address_is_an_error() {
        let result = config_from(&[
            ("GEMINI_API_KEY", "secret"),
            ("CARDVANTAGE_LISTEN_ADDR", "localhost"),
        ]);
        assert!(matches!(result, Err(ref error) if error.to_string().contains("CARDVANTAGE_LISTEN_ADDR")));
    }
}
