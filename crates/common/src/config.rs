use std::collections::HashMap;
use std::env;

use crate::error::{AppError, AppResult};

pub const DEFAULT_API_BASE_URL: &str = "https://api.rozetkapay.com/api/";

/// Credentials and endpoint for the RozetkaPay REST API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RozetkaPayConfig {
    pub login: String,
    pub password: String,
    pub api_base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub bind_addr: String,
    /// Externally reachable base URL, used for the return and notify URLs.
    pub public_url: String,
    /// Recorded as `payment_gateway` on every local payment.
    pub gateway_id: String,
    pub rozetkapay: RozetkaPayConfig,
}

impl RozetkaPayConfig {
    pub fn from_map(vars: &HashMap<String, String>) -> AppResult<Self> {
        let timeout_secs = get(vars, "ROZETKAPAY_TIMEOUT_SECS", "30")
            .parse::<u64>()
            .map_err(|e| AppError::Config(format!("invalid ROZETKAPAY_TIMEOUT_SECS: {e}")))?;

        Ok(Self {
            login: required(vars, "ROZETKAPAY_LOGIN")?,
            password: required(vars, "ROZETKAPAY_PASSWORD")?,
            api_base_url: get(vars, "ROZETKAPAY_API_BASE_URL", DEFAULT_API_BASE_URL),
            timeout_secs,
        })
    }
}

impl GatewayConfig {
    pub fn from_env() -> AppResult<Self> {
        Self::from_map(&env_map())
    }

    pub fn from_map(vars: &HashMap<String, String>) -> AppResult<Self> {
        Ok(Self {
            bind_addr: get(vars, "RZP_BIND_ADDR", "0.0.0.0:8080"),
            public_url: get(vars, "RZP_PUBLIC_URL", "http://localhost:8080")
                .trim_end_matches('/')
                .to_string(),
            gateway_id: get(vars, "RZP_GATEWAY_ID", "rozetkapay_redirect"),
            rozetkapay: RozetkaPayConfig::from_map(vars)?,
        })
    }
}

fn env_map() -> HashMap<String, String> {
    env::vars().collect()
}

fn get(vars: &HashMap<String, String>, key: &str, default: &str) -> String {
    vars.get(key)
        .cloned()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn required(vars: &HashMap<String, String>, key: &str) -> AppResult<String> {
    vars.get(key)
        .cloned()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Config(format!("missing required env var {key}")))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::{GatewayConfig, DEFAULT_API_BASE_URL};

    fn credentials() -> HashMap<String, String> {
        let mut vars = HashMap::new();
        vars.insert("ROZETKAPAY_LOGIN".into(), "merchant".into());
        vars.insert("ROZETKAPAY_PASSWORD".into(), "secret".into());
        vars
    }

    #[test]
    fn gateway_config_defaults_apply() {
        let cfg = GatewayConfig::from_map(&credentials()).expect("config");

        assert_eq!(cfg.bind_addr, "0.0.0.0:8080");
        assert_eq!(cfg.public_url, "http://localhost:8080");
        assert_eq!(cfg.gateway_id, "rozetkapay_redirect");
        assert_eq!(cfg.rozetkapay.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(cfg.rozetkapay.timeout_secs, 30);
    }

    #[test]
    fn login_is_required() {
        let mut vars = credentials();
        vars.remove("ROZETKAPAY_LOGIN");

        let err = GatewayConfig::from_map(&vars).expect_err("should fail");
        assert!(err.to_string().contains("ROZETKAPAY_LOGIN"));
    }

    #[test]
    fn empty_password_counts_as_missing() {
        let mut vars = credentials();
        vars.insert("ROZETKAPAY_PASSWORD".into(), String::new());

        let err = GatewayConfig::from_map(&vars).expect_err("should fail");
        assert!(err.to_string().contains("ROZETKAPAY_PASSWORD"));
    }

    #[test]
    fn public_url_trailing_slash_is_trimmed() {
        let mut vars = credentials();
        vars.insert("RZP_PUBLIC_URL".into(), "https://shop.example/".into());
        vars.insert("ROZETKAPAY_TIMEOUT_SECS".into(), "5".into());

        let cfg = GatewayConfig::from_map(&vars).expect("config");
        assert_eq!(cfg.public_url, "https://shop.example");
        assert_eq!(cfg.rozetkapay.timeout_secs, 5);
    }

    #[test]
    fn bad_timeout_is_a_config_error() {
        let mut vars = credentials();
        vars.insert("ROZETKAPAY_TIMEOUT_SECS".into(), "soon".into());

        let err = GatewayConfig::from_map(&vars).expect_err("should fail");
        assert!(err.to_string().contains("ROZETKAPAY_TIMEOUT_SECS"));
    }
}
