use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_TOKEN_KEY: &str = "ecommerce_token";
const DEFAULT_EXPIRY_HOURS: i64 = 24;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} required")]
    Missing(&'static str),

    #[error("{0} environment variable is empty, a value was expected")]
    Empty(&'static str),

    #[error("invalid value '{value}' for {var}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub authorization: AuthorizationConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Full connection URL. Built from the discrete DB_* variables when not given.
    pub url: String,
    pub max_connections: u32,
    pub open_connection_timeout_secs: u64,
    pub idle_connection_timeout_secs: u64,
    pub auto_migrate: bool,
}

impl DatabaseConfig {
    pub fn open_connection_timeout(&self) -> Duration {
        Duration::from_secs(self.open_connection_timeout_secs)
    }

    pub fn idle_connection_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_connection_timeout_secs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TokenSourceKind {
    Header,
    Cookie,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    #[serde(skip_serializing)]
    pub signing_key: String,
    /// Cookie name holding the credential when cookie extraction is used.
    pub token_key: String,
    pub expiry_hours: i64,
    pub token_source: TokenSourceKind,
}

impl JwtConfig {
    /// Codec settings alone, for tools that never touch the store.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            signing_key: required(&lookup, "JWT_SIGNING_KEY")?,
            token_key: lookup("JWT_TOKEN_KEY").unwrap_or_else(|| DEFAULT_TOKEN_KEY.to_string()),
            expiry_hours: parsed(&lookup, "JWT_EXPIRY_TIME")?.unwrap_or(DEFAULT_EXPIRY_HOURS),
            token_source: TokenSourceKind::Header,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthorizationConfig {
    /// Role the caller must carry to reach mutating routes. `None` admits any identity.
    pub admin_role: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Unknown values fall back to INFO.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => LogLevel::Debug,
            "WARN" | "WARNING" => LogLevel::Warn,
            "ERROR" => LogLevel::Error,
            _ => LogLevel::Info,
        }
    }

    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub format: LogFormat,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        let signing_key = required(&lookup, "JWT_SIGNING_KEY")?;
        let database_url = database_url(&lookup)?;

        // Set defaults based on environment, then override with specific env vars
        let config = match environment {
            Environment::Production => Self::production(signing_key, database_url),
            Environment::Staging => Self::staging(signing_key, database_url),
            Environment::Development => Self::development(signing_key, database_url),
        };
        config.with_env_overrides(&lookup)
    }

    fn with_env_overrides<F>(mut self, lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server overrides
        if let Some(v) = lookup("APP_HOST") {
            self.server.host = v;
        }
        if let Some(v) = parsed(lookup, "APP_PORT")? {
            self.server.port = v;
        }

        // Database overrides
        if let Some(v) = parsed(lookup, "DB_MAX_OPEN_CONNECTIONS")? {
            self.database.max_connections = v;
        }
        if let Some(v) = parsed(lookup, "DB_OPEN_CONNECTION_TIMEOUT")? {
            self.database.open_connection_timeout_secs = v;
        }
        if let Some(v) = parsed(lookup, "DB_IDLE_CONNECTION_TIMEOUT")? {
            self.database.idle_connection_timeout_secs = v;
        }
        if let Some(v) = parsed(lookup, "DB_AUTO_MIGRATE")? {
            self.database.auto_migrate = v;
        }

        // JWT overrides
        if let Some(v) = parsed(lookup, "JWT_EXPIRY_TIME")? {
            self.jwt.expiry_hours = v;
        }
        if let Some(v) = lookup("JWT_TOKEN_KEY") {
            if v.is_empty() {
                return Err(ConfigError::Empty("JWT_TOKEN_KEY"));
            }
            self.jwt.token_key = v;
        }
        if let Some(v) = lookup("AUTH_TOKEN_SOURCE") {
            self.jwt.token_source = match v.to_ascii_lowercase().as_str() {
                "header" => TokenSourceKind::Header,
                "cookie" => TokenSourceKind::Cookie,
                _ => return Err(ConfigError::Invalid { var: "AUTH_TOKEN_SOURCE", value: v }),
            };
        }

        // Authorization overrides
        if let Some(v) = lookup("AUTH_ADMIN_ROLE") {
            let trimmed = v.trim();
            self.authorization.admin_role = (!trimmed.is_empty()).then(|| trimmed.to_string());
        }

        // Logging overrides
        if let Some(v) = lookup("LOG_LEVEL") {
            self.logging.level = LogLevel::parse(&v);
        }
        if let Some(v) = lookup("LOG_FORMAT") {
            self.logging.format = match v.to_ascii_lowercase().as_str() {
                "json" => LogFormat::Json,
                _ => LogFormat::Text,
            };
        }

        Ok(self)
    }

    fn base(environment: Environment, signing_key: String, database_url: String) -> Self {
        Self {
            environment,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections: 20,
                open_connection_timeout_secs: 120,
                idle_connection_timeout_secs: 120,
                auto_migrate: false,
            },
            jwt: JwtConfig {
                signing_key,
                token_key: DEFAULT_TOKEN_KEY.to_string(),
                expiry_hours: DEFAULT_EXPIRY_HOURS,
                token_source: TokenSourceKind::Header,
            },
            authorization: AuthorizationConfig::default(),
            logging: LoggingConfig {
                level: LogLevel::Info,
                format: LogFormat::Text,
            },
        }
    }

    fn development(signing_key: String, database_url: String) -> Self {
        let mut config = Self::base(Environment::Development, signing_key, database_url);
        config.database.max_connections = 5;
        config.database.auto_migrate = true;
        config.logging.level = LogLevel::Debug;
        config
    }

    fn staging(signing_key: String, database_url: String) -> Self {
        let mut config = Self::base(Environment::Staging, signing_key, database_url);
        config.database.open_connection_timeout_secs = 30;
        config.logging.format = LogFormat::Json;
        config
    }

    fn production(signing_key: String, database_url: String) -> Self {
        let mut config = Self::base(Environment::Production, signing_key, database_url);
        config.database.max_connections = 50;
        config.database.open_connection_timeout_secs = 10;
        config.jwt.expiry_hours = 4;
        config.logging.format = LogFormat::Json;
        config
    }
}

fn required<F>(lookup: &F, var: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Err(ConfigError::Missing(var)),
        Some(v) if v.trim().is_empty() => Err(ConfigError::Empty(var)),
        Some(v) => Ok(v),
    }
}

fn parsed<F, T>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        None => Ok(None),
        Some(v) => v
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { var, value: v }),
    }
}

/// DATABASE_URL wins; otherwise the discrete DB_* variables are all required.
fn database_url<F>(lookup: &F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup("DATABASE_URL").filter(|u| !u.trim().is_empty()) {
        return Ok(url);
    }

    let host = required(lookup, "DB_HOST")?;
    let port: u16 = parsed(lookup, "DB_PORT")?.ok_or(ConfigError::Missing("DB_PORT"))?;
    let user = required(lookup, "DB_USER")?;
    let name = required(lookup, "DB_NAME")?;
    let pass = lookup("DB_PASS").ok_or(ConfigError::Missing("DB_PASS"))?;
    let disable_ssl = parsed::<_, bool>(lookup, "DB_DISABLE_SSL")?.unwrap_or(false);
    let ssl_mode = if disable_ssl { "disable" } else { "require" };

    Ok(format!(
        "postgres://{}:{}@{}:{}/{}?sslmode={}",
        user, pass, host, port, name, ssl_mode
    ))
}
