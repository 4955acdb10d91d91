use std::{env, fmt::Display, net::SocketAddr, str::FromStr};

use tracing::info;

const MAX_POSTS_PER_PAGE: i64 = 100;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("environment variable {0} is required")]
    Missing(&'static str),
    #[error("invalid value for {key} : {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// SMTP settings, the mailer is disabled when `server` is unset
#[derive(Clone)]
pub struct MailConfig {
    pub server: Option<String>,
    pub port: u16,
    pub use_tls: bool,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Clone)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    /// Key signing the password reset tokens
    pub secret_key: String,
    /// AES-256 key encrypting the session cookie
    pub encoding_key: [u8; 32],
    /// Absolute URL used to build the links sent by email
    pub server_url: String,
    pub posts_per_page: i64,
    /// The first address is the sender of every email
    pub admins: Vec<String>,
    pub mail: MailConfig,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let encoding_key = required(&lookup, "ENCODING_KEY")?;
        let encoding_key =
            <[u8; 32]>::try_from(encoding_key.as_bytes()).map_err(|_| ConfigError::Invalid {
                key: "ENCODING_KEY",
                reason: format!("expected 32 bytes, got {}", encoding_key.len()),
            })?;

        let posts_per_page: i64 = parse_or(&lookup, "POSTS_PER_PAGE", "3")?;
        if !(1..=MAX_POSTS_PER_PAGE).contains(&posts_per_page) {
            return Err(ConfigError::Invalid {
                key: "POSTS_PER_PAGE",
                reason: format!("must be between 1 and {MAX_POSTS_PER_PAGE}"),
            });
        }

        let admins: Vec<String> = or_default(&lookup, "ADMINS", "admin@microblog.local")
            .split(',')
            .map(|admin| admin.trim().to_string())
            .filter(|admin| !admin.is_empty())
            .collect();
        if admins.is_empty() {
            return Err(ConfigError::Invalid {
                key: "ADMINS",
                reason: "at least one address is needed".to_string(),
            });
        }

        Ok(Self {
            bind_address: parse_or(&lookup, "BIND_ADDRESS", "0.0.0.0:5000")?,
            database_url: required(&lookup, "DATABASE_URL")?,
            secret_key: or_default(&lookup, "SECRET_KEY", "this-is-a-key"),
            encoding_key,
            server_url: or_default(&lookup, "SERVER_URL", "http://localhost:5000")
                .trim_end_matches('/')
                .to_string(),
            posts_per_page,
            admins,
            mail: MailConfig {
                server: lookup("MAIL_SERVER").filter(|server| !server.is_empty()),
                port: parse_or(&lookup, "MAIL_PORT", "25")?,
                use_tls: lookup("MAIL_USE_TLS").is_some(),
                username: lookup("MAIL_USERNAME"),
                password: lookup("MAIL_PASSWORD"),
            },
        })
    }
}

fn required(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<String, ConfigError> {
    lookup(key).ok_or(ConfigError::Missing(key))
}

fn or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default : {default}");
        default.to_string()
    })
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    or_default(lookup, key, default)
        .parse()
        .map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        })
}
