//! Runtime configuration
//!
//! One explicit configuration object built from the environment at startup
//! and passed into construction. Nothing reads environment variables after
//! this point.

use std::env;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://banking.db";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite connection string for the account store.
    pub database_url: String,
    /// Credential for the language-model API. Absent means fallback-only
    /// mode: every unclassified message gets a canned reply.
    pub openai_api_key: Option<String>,
    /// Port for the HTTP server.
    pub port: u16,
}

impl AppConfig {
    /// Build configuration from `DATABASE_URL`, `OPENAI_API_KEY` and `PORT`.
    /// Callers should load `.env` via dotenv before invoking this.
    pub fn from_env() -> Self {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let openai_api_key = env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        let port = env::var("PORT")
            .or_else(|_| env::var("API_PORT"))
            .ok()
            .and_then(|raw| parse_port(&raw))
            .unwrap_or(DEFAULT_PORT);

        Self {
            database_url,
            openai_api_key,
            port,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            openai_api_key: None,
            port: DEFAULT_PORT,
        }
    }
}

fn parse_port(raw: &str) -> Option<u16> {
    raw.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_port() {
        assert_eq!(parse_port("8080"), Some(8080));
        assert_eq!(parse_port(" 3000 "), Some(3000));
        assert_eq!(parse_port("not-a-port"), None);
        assert_eq!(parse_port(""), None);
    }

    #[test]
    fn test_default_config_is_fallback_only() {
        let config = AppConfig::default();
        assert!(config.openai_api_key.is_none());
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
    }
}
