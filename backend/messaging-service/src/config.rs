use crate::error::AppError;
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => Err(AppError::Config(format!(
                "STORAGE_BACKEND must be postgres or memory, got {other}"
            ))),
        }
    }
}

/// How the caller identity in query/path parameters is verified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Accept the claimed identity as-is
    Trust,
    /// Require an HS256 bearer token naming the claimed participant
    Jwt,
}

impl FromStr for AuthMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trust" | "none" => Ok(Self::Trust),
            "jwt" => Ok(Self::Jwt),
            other => Err(AppError::Config(format!(
                "AUTH_MODE must be trust or jwt, got {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(AppError::Config(format!(
                "LOG_FORMAT must be text or json, got {other}"
            ))),
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub storage: StorageBackend,
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    /// Maximum message length in characters
    pub message_max_length: usize,
    pub default_page_size: u32,
    pub request_timeout_secs: u64,
    pub auth_mode: AuthMode,
    pub jwt_secret: Option<String>,
    pub log_format: LogFormat,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("storage", &self.storage)
            .field("database_url", &self.database_url.as_ref().map(|_| "[REDACTED]"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("message_max_length", &self.message_max_length)
            .field("default_page_size", &self.default_page_size)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("auth_mode", &self.auth_mode)
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "[REDACTED]"))
            .field("log_format", &self.log_format)
            .finish()
    }
}

/// Page size ceiling for message listing
pub const MAX_PAGE_SIZE: u32 = 200;

fn parsed<T: FromStr>(key: &str, default: T) -> Result<T, AppError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{key} has an invalid value: {raw}"))),
        Err(_) => Ok(default),
    }
}

fn enum_var<T: FromStr<Err = AppError>>(key: &str, default: T) -> Result<T, AppError> {
    match env::var(key) {
        Ok(raw) => raw.parse(),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenv().ok();

        let storage = enum_var("STORAGE_BACKEND", StorageBackend::Postgres)?;
        let database_url = env::var("DATABASE_URL").ok().filter(|s| !s.is_empty());
        if storage == StorageBackend::Postgres && database_url.is_none() {
            return Err(AppError::Config("DATABASE_URL missing".into()));
        }

        let auth_mode = enum_var("AUTH_MODE", AuthMode::Trust)?;
        let jwt_secret = env::var("JWT_SECRET").ok().filter(|s| !s.is_empty());
        if auth_mode == AuthMode::Jwt && jwt_secret.is_none() {
            return Err(AppError::Config("JWT_SECRET missing for AUTH_MODE=jwt".into()));
        }

        let message_max_length: usize = parsed("MESSAGE_MAX_LENGTH", 1000)?;
        if message_max_length == 0 {
            return Err(AppError::Config("MESSAGE_MAX_LENGTH must be positive".into()));
        }
        let default_page_size: u32 = parsed("MESSAGE_PAGE_SIZE", 50)?;
        if !(1..=MAX_PAGE_SIZE).contains(&default_page_size) {
            return Err(AppError::Config(format!(
                "MESSAGE_PAGE_SIZE must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }

        Ok(Self {
            storage,
            database_url,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: parsed("PORT", 8001)?,
            message_max_length,
            default_page_size,
            request_timeout_secs: parsed("REQUEST_TIMEOUT_SECS", 30)?,
            auth_mode,
            jwt_secret,
            log_format: enum_var("LOG_FORMAT", LogFormat::Text)?,
        })
    }

    /// In-memory storage, trusted identities, default limits.
    pub fn test_defaults() -> Self {
        Self {
            storage: StorageBackend::Memory,
            database_url: None,
            host: "127.0.0.1".into(),
            port: 0,
            message_max_length: 1000,
            default_page_size: 50,
            request_timeout_secs: 30,
            auth_mode: AuthMode::Trust,
            jwt_secret: None,
            log_format: LogFormat::Text,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
