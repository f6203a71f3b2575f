/*
 * Responsibility
 * - 環境変数や設定の読み込み (PORT, CONNECT_PRODUCT, LOCAL_BASE_URL など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use crate::services::connect::{ProductVariant, StrategyConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<String>) -> Self {
        match value
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub product: ProductVariant,
    pub local_base_url: url::Url,
    pub handle_known_errors: bool,

    // None => in-memory credential store
    pub database_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (env, test maps).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port: u16 = lookup("PORT")
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV"));

        let product = lookup("CONNECT_PRODUCT")
            .ok_or(ConfigError::Missing("CONNECT_PRODUCT"))?
            .parse::<ProductVariant>()
            .map_err(|_| ConfigError::Invalid("CONNECT_PRODUCT"))?;

        let local_base_url = lookup("LOCAL_BASE_URL")
            .ok_or(ConfigError::Missing("LOCAL_BASE_URL"))?;
        let local_base_url =
            url::Url::parse(&local_base_url).map_err(|_| ConfigError::Invalid("LOCAL_BASE_URL"))?;

        let handle_known_errors = match lookup("CONNECT_HANDLE_KNOWN_ERRORS") {
            None => true,
            Some(v) => match v.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => return Err(ConfigError::Invalid("CONNECT_HANDLE_KNOWN_ERRORS")),
            },
        };

        let database_url = lookup("DATABASE_URL").filter(|s| !s.trim().is_empty());

        Ok(Self {
            addr,
            app_env,
            product,
            local_base_url,
            handle_known_errors,
            database_url,
        })
    }

    pub fn strategy_config(&self) -> StrategyConfig {
        StrategyConfig {
            product: self.product,
            local_base_url: self.local_base_url.clone(),
            handle_known_errors: self.handle_known_errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = load(&[
            ("CONNECT_PRODUCT", "jira"),
            ("LOCAL_BASE_URL", "https://addon.example.com"),
        ])
        .unwrap();

        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.app_env, AppEnv::Development);
        assert_eq!(config.product, ProductVariant::Jira);
        assert!(config.handle_known_errors);
        assert!(config.database_url.is_none());
    }

    #[test]
    fn product_and_base_url_are_required() {
        assert_eq!(
            load(&[("LOCAL_BASE_URL", "https://a.example.com")]).unwrap_err(),
            ConfigError::Missing("CONNECT_PRODUCT")
        );
        assert_eq!(
            load(&[("CONNECT_PRODUCT", "jira")]).unwrap_err(),
            ConfigError::Missing("LOCAL_BASE_URL")
        );
        assert_eq!(
            load(&[("CONNECT_PRODUCT", "trello"), ("LOCAL_BASE_URL", "https://a.example.com")])
                .unwrap_err(),
            ConfigError::Invalid("CONNECT_PRODUCT")
        );
        assert_eq!(
            load(&[("CONNECT_PRODUCT", "jira"), ("LOCAL_BASE_URL", "not a url")]).unwrap_err(),
            ConfigError::Invalid("LOCAL_BASE_URL")
        );
    }

    #[test]
    fn overrides() {
        let config = load(&[
            ("PORT", "8080"),
            ("APP_ENV", "prod"),
            ("CONNECT_PRODUCT", "bitbucket"),
            ("LOCAL_BASE_URL", "https://addon.example.com/connect"),
            ("CONNECT_HANDLE_KNOWN_ERRORS", "false"),
            ("DATABASE_URL", "postgres://localhost/connect"),
        ])
        .unwrap();

        assert_eq!(config.addr.port(), 8080);
        assert!(config.app_env.is_production());
        assert_eq!(config.product, ProductVariant::Bitbucket);
        assert_eq!(config.local_base_url.path(), "/connect");
        assert!(!config.handle_known_errors);
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/connect"));
    }
}
