use crate::utils::AppError;
use actix_web::cookie::Key;
use base64::Engine;
use std::env;

pub const MEMORY_DATABASE_URL: &str = "memory://";

/// Runtime configuration read from the environment (and `.env` via dotenv)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub session_key: Option<String>,
    pub session_cookie_secure: bool,
    pub bcrypt_cost: u32,
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = parse_port(&env::var("PORT").unwrap_or_else(|_| "8000".to_string()))?;
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| AppError::ConfigError("DATABASE_URL must be set".to_string()))?;
        let session_key = env::var("SESSION_KEY").ok().filter(|k| !k.trim().is_empty());
        let session_cookie_secure = parse_bool(
            "SESSION_COOKIE_SECURE",
            &env::var("SESSION_COOKIE_SECURE").unwrap_or_else(|_| "false".to_string()),
        )?;
        let bcrypt_cost = match env::var("BCRYPT_COST") {
            Ok(raw) => parse_bcrypt_cost(&raw)?,
            Err(_) => bcrypt::DEFAULT_COST,
        };
        let allowed_origins = parse_origins(
            &env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| "http://localhost:4028".to_string()),
        );

        let config = Self {
            host,
            port,
            database_url,
            session_key,
            session_cookie_secure,
            bcrypt_cost,
            allowed_origins,
        };

        // Fail at startup rather than on the first request
        if let Some(encoded) = &config.session_key {
            decode_session_key(encoded)?;
        }

        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn uses_memory_store(&self) -> bool {
        self.database_url.starts_with(MEMORY_DATABASE_URL)
    }

    /// Signing/encryption key for the session cookie.
    ///
    /// Without `SESSION_KEY` a random key is generated, so sessions do not
    /// survive a restart.
    pub fn cookie_key(&self) -> Result<Key, AppError> {
        match &self.session_key {
            Some(encoded) => decode_session_key(encoded),
            None => {
                log::warn!("⚠️  SESSION_KEY not set, generating a random key (sessions reset on restart)");
                Ok(Key::generate())
            }
        }
    }
}

pub fn decode_session_key(encoded: &str) -> Result<Key, AppError> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|e| AppError::ConfigError(format!("SESSION_KEY is not valid base64: {}", e)))?;

    Key::try_from(bytes.as_slice()).map_err(|_| {
        AppError::ConfigError(format!(
            "SESSION_KEY must decode to at least 64 bytes (got {})",
            bytes.len()
        ))
    })
}

fn parse_port(raw: &str) -> Result<u16, AppError> {
    raw.trim()
        .parse::<u16>()
        .map_err(|_| AppError::ConfigError(format!("PORT is not a valid port: {}", raw)))
}

fn parse_bool(name: &str, raw: &str) -> Result<bool, AppError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(AppError::ConfigError(format!("{} must be a boolean, got {}", name, other))),
    }
}

fn parse_bcrypt_cost(raw: &str) -> Result<u32, AppError> {
    let cost = raw
        .trim()
        .parse::<u32>()
        .map_err(|_| AppError::ConfigError(format!("BCRYPT_COST is not a number: {}", raw)))?;

    if !(4..=31).contains(&cost) {
        return Err(AppError::ConfigError(format!(
            "BCRYPT_COST must be between 4 and 31, got {}",
            cost
        )));
    }

    Ok(cost)
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().trim_end_matches('/'))
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}
