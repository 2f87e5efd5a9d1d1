/// Configuration management for the API server
///
/// Settings come from environment variables. A `.env` file in the working
/// directory is loaded first when present (development convenience).
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 5000)
/// - `API_CORS_ORIGINS`: Comma-separated allowed origins, `*` for any (default: `*`)
/// - `API_PRODUCTION`: Enables HSTS (default: false)
/// - `JWT_SECRET`: Secret key for token signing, at least 32 characters (required)
/// - `AI_API_KEY`: Provider key; the AI endpoints are disabled without it
/// - `AI_BASE_URL`: Provider API root (default: https://api.openai.com/v1)
/// - `AI_MODEL`: Model name (default: gpt-4o-mini)
/// - `AI_TIMEOUT_SECONDS`: Provider request timeout (default: 30)
/// - `RUST_LOG`: Log filter
///
/// # Example
///
/// ```no_run
/// use quillpress_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use anyhow::Context;
use quillpress_shared::ai::openai::AiConfig;
use std::{collections::HashMap, env, str::FromStr};

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,

    /// `None` when `AI_API_KEY` is unset
    pub ai: Option<AiConfig>,
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,

    /// Allowed CORS origins; `["*"]` allows any
    pub cors_origins: Vec<String>,

    /// Production mode (adds HSTS)
    pub production: bool,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HS256 signing secret, at least 32 characters
    pub secret: String,
}

/// Minimum accepted `JWT_SECRET` length
pub const MIN_JWT_SECRET_LEN: usize = 32;

impl Config {
    /// Loads configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value does
    /// not parse.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(env::vars().collect())
    }

    /// Builds configuration from an explicit variable map
    pub fn from_vars(vars: HashMap<String, String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(&vars, key);

        let database_url = get("DATABASE_URL")
            .context("DATABASE_URL environment variable is required")?
            .to_string();

        let jwt_secret = get("JWT_SECRET")
            .context("JWT_SECRET environment variable is required")?
            .to_string();
        if jwt_secret.len() < MIN_JWT_SECRET_LEN {
            anyhow::bail!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LEN
            );
        }

        let cors_origins = get("API_CORS_ORIGINS")
            .unwrap_or("*")
            .split(',')
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();

        let ai = match get("AI_API_KEY") {
            Some(key) => {
                let defaults = AiConfig::default();
                Some(AiConfig {
                    api_key: key.to_string(),
                    base_url: get("AI_BASE_URL")
                        .map(str::to_string)
                        .unwrap_or(defaults.base_url),
                    model: get("AI_MODEL")
                        .map(str::to_string)
                        .unwrap_or(defaults.model),
                    timeout_seconds: parse_or(
                        get("AI_TIMEOUT_SECONDS"),
                        "AI_TIMEOUT_SECONDS",
                        defaults.timeout_seconds,
                    )?,
                })
            }
            None => None,
        };

        Ok(Self {
            api: ApiConfig {
                host: get("API_HOST").unwrap_or("0.0.0.0").to_string(),
                port: parse_or(get("API_PORT"), "API_PORT", 5000)?,
                cors_origins,
                production: parse_or(get("API_PRODUCTION"), "API_PRODUCTION", false)?,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections: parse_or(
                    get("DATABASE_MAX_CONNECTIONS"),
                    "DATABASE_MAX_CONNECTIONS",
                    10,
                )?,
            },
            jwt: JwtConfig { secret: jwt_secret },
            ai,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

/// Non-blank, trimmed value of `key`
fn lookup<'a>(vars: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn parse_or<T>(value: Option<&str>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(raw) => raw
            .parse()
            .map_err(|e| anyhow::anyhow!("{} has invalid value '{}': {}", key, raw, e)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn required() -> Vec<(&'static str, &'static str)> {
        vec![
            ("DATABASE_URL", "postgresql://localhost/quillpress"),
            ("JWT_SECRET", SECRET),
        ]
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_vars(vars(&required())).unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:5000");
        assert_eq!(config.api.cors_origins, vec!["*"]);
        assert!(!config.api.production);
        assert_eq!(config.database.max_connections, 10);
        assert!(config.ai.is_none());
    }

    #[test]
    fn test_overrides() {
        let mut pairs = required();
        pairs.extend([
            ("API_HOST", "127.0.0.1"),
            ("API_PORT", "8080"),
            ("API_CORS_ORIGINS", "http://localhost:5173, https://example.com"),
            ("API_PRODUCTION", "true"),
            ("AI_API_KEY", "sk-test"),
            ("AI_MODEL", "llama3"),
            ("AI_BASE_URL", "http://localhost:11434/v1"),
        ]);
        let config = Config::from_vars(vars(&pairs)).unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(
            config.api.cors_origins,
            vec!["http://localhost:5173", "https://example.com"]
        );
        assert!(config.api.production);

        let ai = config.ai.unwrap();
        assert_eq!(ai.api_key, "sk-test");
        assert_eq!(ai.model, "llama3");
        assert_eq!(ai.base_url, "http://localhost:11434/v1");
        assert_eq!(ai.timeout_seconds, 30);
    }

    #[test]
    fn test_missing_database_url() {
        let err = Config::from_vars(vars(&[("JWT_SECRET", SECRET)])).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn test_short_jwt_secret() {
        let err = Config::from_vars(vars(&[
            ("DATABASE_URL", "postgresql://localhost/quillpress"),
            ("JWT_SECRET", "too-short"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("at least 32"));
    }

    #[test]
    fn test_invalid_port() {
        let mut pairs = required();
        pairs.push(("API_PORT", "eighty"));
        let err = Config::from_vars(vars(&pairs)).unwrap_err();
        assert!(err.to_string().contains("API_PORT"));
    }
}
