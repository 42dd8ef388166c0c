// ABOUTME: Server configuration parsed from environment variables
// ABOUTME: Port, bind host, database location, CORS origin, session secret and security toggles

use std::net::IpAddr;
use std::num::ParseIntError;
use std::path::PathBuf;
use thiserror::Error;

use givelink_config::{first_set, parse_flag};
use givelink_config::constants::{
    CORS_ORIGIN, ENABLE_HSTS, GIVELINK_ADMIN_TOKEN, GIVELINK_CORS_ORIGIN,
    GIVELINK_DATABASE_PATH, GIVELINK_HOST, GIVELINK_PORT, JWT_SECRET, PORT, SECURE_COOKIES,
    SECURITY_HEADERS_ENABLED,
};

pub const DEFAULT_PORT: u16 = 5001;
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";
pub const MIN_JWT_SECRET_LENGTH: usize = 16;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid port number: {0}")]
    InvalidPort(#[from] ParseIntError),
    #[error("Port {0} is out of valid range (1-65535)")]
    PortOutOfRange(u16),
    #[error("Invalid bind host: {0}")]
    InvalidHost(String),
    #[error("JWT_SECRET must be set to start the server")]
    MissingJwtSecret,
    #[error("JWT_SECRET must be at least {MIN_JWT_SECRET_LENGTH} characters")]
    WeakJwtSecret,
    #[error("Invalid boolean for {name}: {value}")]
    InvalidFlag { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub database_path: PathBuf,
    pub cors_origin: String,
    pub jwt_secret: Option<String>,
    pub admin_token: Option<String>,
    pub secure_cookies: bool,
    pub security_headers_enabled: bool,
    pub enable_hsts: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |names: &[&str]| first_set(&lookup, names);
        let flag = |name: &'static str, default: bool| match get(&[name]) {
            None => Ok(default),
            Some(value) => parse_flag(&value).ok_or(ConfigError::InvalidFlag { name, value }),
        };

        let port = match get(&[GIVELINK_PORT, PORT]) {
            Some(raw) => raw.parse::<u16>()?,
            None => DEFAULT_PORT,
        };
        if port == 0 {
            return Err(ConfigError::PortOutOfRange(port));
        }

        let host_raw = get(&[GIVELINK_HOST]).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let host = host_raw
            .parse::<IpAddr>()
            .map_err(|_| ConfigError::InvalidHost(host_raw.clone()))?;

        let database_path = get(&[GIVELINK_DATABASE_PATH])
            .map(PathBuf::from)
            .unwrap_or_else(givelink_core::database_file);

        Ok(Config {
            host,
            port,
            database_path,
            cors_origin: get(&[GIVELINK_CORS_ORIGIN, CORS_ORIGIN])
                .unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string()),
            jwt_secret: get(&[JWT_SECRET]),
            admin_token: get(&[GIVELINK_ADMIN_TOKEN]),
            secure_cookies: flag(SECURE_COOKIES, false)?,
            security_headers_enabled: flag(SECURITY_HEADERS_ENABLED, true)?,
            enable_hsts: flag(ENABLE_HSTS, false)?,
        })
    }

    /// The session signing secret, required before serving.
    pub fn require_jwt_secret(&self) -> Result<&str, ConfigError> {
        let secret = self
            .jwt_secret
            .as_deref()
            .ok_or(ConfigError::MissingJwtSecret)?;
        if secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ConfigError::WeakJwtSecret);
        }
        Ok(secret)
    }
}
