use std::env;
use std::path::PathBuf;

use crate::error::{PortalError, Result};

/// How outbound candidate notifications leave the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailTransportConfig {
    /// Write messages to the log only.
    Log,
    Smtp(SmtpConfig),
    Api(ApiMailConfig),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpSecurity {
    /// Plain connect, then upgrade with STARTTLS (usually port 587).
    StartTls,
    /// TLS from the first byte (usually port 465).
    Implicit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub security: SmtpSecurity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiMailConfig {
    pub endpoint: String,
    pub api_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailConfig {
    pub from: String,
    pub transport: MailTransportConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub database_path: PathBuf,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub bcrypt_cost: u32,
    pub uploads_dir: PathBuf,
    pub public_url: String,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    pub mail: MailConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            database_path: PathBuf::from("portal.db"),
            jwt_secret: "portal-dev-secret-change-me".to_string(),
            token_ttl_hours: 24,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            uploads_dir: PathBuf::from("uploads"),
            public_url: "http://127.0.0.1:8080".to_string(),
            admin_email: None,
            admin_password: None,
            mail: MailConfig {
                from: "no-reply@localhost".to_string(),
                transport: MailTransportConfig::Log,
            },
        }
    }
}

impl AppConfig {
    /// Loads `.env` (if present) and reads the process environment.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| {
            get(key).ok_or_else(|| PortalError::Config(format!("{} must be set", key)))
        };
        let defaults = AppConfig::default();

        let token_ttl_hours = match get("TOKEN_TTL_HOURS") {
            Some(v) => parse_number::<i64>("TOKEN_TTL_HOURS", &v)?,
            None => defaults.token_ttl_hours,
        };
        let bcrypt_cost = match get("BCRYPT_COST") {
            Some(v) => parse_number::<u32>("BCRYPT_COST", &v)?,
            None => defaults.bcrypt_cost,
        };

        let transport = match get("MAIL_TRANSPORT").as_deref().unwrap_or("log") {
            "log" => MailTransportConfig::Log,
            "smtp" => {
                let security = match get("SMTP_SECURITY").as_deref().unwrap_or("starttls") {
                    "starttls" => SmtpSecurity::StartTls,
                    "tls" | "implicit" => SmtpSecurity::Implicit,
                    other => {
                        return Err(PortalError::Config(format!(
                            "SMTP_SECURITY must be 'starttls' or 'tls', got '{}'",
                            other
                        )))
                    }
                };
                let port = match get("SMTP_PORT") {
                    Some(v) => parse_number::<u16>("SMTP_PORT", &v)?,
                    None => match security {
                        SmtpSecurity::StartTls => 587,
                        SmtpSecurity::Implicit => 465,
                    },
                };
                MailTransportConfig::Smtp(SmtpConfig {
                    host: require("SMTP_HOST")?,
                    port,
                    username: require("SMTP_USER")?,
                    password: require("SMTP_PASSWORD")?,
                    security,
                })
            }
            "api" => MailTransportConfig::Api(ApiMailConfig {
                endpoint: require("MAIL_API_URL")?,
                api_key: require("MAIL_API_KEY")?,
            }),
            other => {
                return Err(PortalError::Config(format!(
                    "MAIL_TRANSPORT must be one of log, smtp, api; got '{}'",
                    other
                )))
            }
        };

        let from = match &transport {
            MailTransportConfig::Log => get("SMTP_FROM_EMAIL").unwrap_or(defaults.mail.from),
            _ => require("SMTP_FROM_EMAIL")?,
        };

        Ok(Self {
            bind_addr: get("BIND_ADDR").unwrap_or(defaults.bind_addr),
            database_path: get("DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),
            jwt_secret: get("JWT_SECRET").unwrap_or(defaults.jwt_secret),
            token_ttl_hours,
            bcrypt_cost,
            uploads_dir: get("UPLOADS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.uploads_dir),
            public_url: get("PUBLIC_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.public_url),
            admin_email: get("ADMIN_EMAIL"),
            admin_password: get("ADMIN_PASSWORD"),
            mail: MailConfig { from, transport },
        })
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| PortalError::Config(format!("{} is not a valid number: '{}'", key, value)))
}
