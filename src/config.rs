/*
 * Responsibility
 * - Read settings from the environment (DATABASE_URL, JWT, CORS allow-list, ...)
 * - Validate them (missing required values abort startup)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

/// Origins allowed when `CORS_ALLOWED_ORIGINS` is not set at all.
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn from_value(value: Option<String>) -> Self {
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

/// Bearer token validation parameters.
#[derive(Clone)]
pub struct JwtSettings {
    pub key: String,
    pub issuer: String,
    pub audience: String,
}

impl fmt::Debug for JwtSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("JwtSettings")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish()
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub database_url: String,
    pub jwt: JwtSettings,
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Each required setting accepts its plain name first and then the
    /// `Section__Key` spelling used by the deployment's existing environment files.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_value(lookup("APP_ENV"));

        let database_url = required(
            &lookup,
            "DATABASE_URL",
            &["ConnectionStrings__DefaultConnection"],
        )?;

        let jwt = JwtSettings {
            key: required(&lookup, "JWT_KEY", &["Jwt__Key"])?,
            issuer: required(&lookup, "JWT_ISSUER", &["Jwt__Issuer"])?,
            audience: required(&lookup, "JWT_AUDIENCE", &["Jwt__Audience"])?,
        };

        let cors_allowed_origins = match lookup("CORS_ALLOWED_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>(),
            None => vec![DEFAULT_CORS_ORIGIN.to_string()],
        };

        // Credentialed CORS cannot be combined with a wildcard origin.
        if cors_allowed_origins.iter().any(|o| o == "*") {
            return Err(ConfigError::Invalid("CORS_ALLOWED_ORIGINS"));
        }

        Ok(Self {
            addr,
            app_env,
            database_url,
            jwt,
            cors_allowed_origins,
        })
    }
}

fn required<F>(
    lookup: &F,
    key: &'static str,
    aliases: &[&'static str],
) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    std::iter::once(key)
        .chain(aliases.iter().copied())
        .filter_map(|k| lookup(k))
        .find(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(key))
}
