//! Env-based server configuration. Transport policy only; nothing in here
//! changes handler behavior.

use std::env;
use std::time::Duration;

const DEFAULT_DATABASE_URL: &str = "sqlite://studydesk.db?mode=rwc";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_SESSION_TTL_HOURS: u64 = 24;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub port: u16,
    pub secure_cookies: bool,
    pub session_ttl: Duration,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let port = env::var("PORT")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let secure_cookies = env::var("SECURE_COOKIES")
            .map(|raw| raw == "1" || raw.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let session_ttl_hours = env::var("SESSION_TTL_HOURS")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(DEFAULT_SESSION_TTL_HOURS);

        Self {
            database_url,
            port,
            secure_cookies,
            session_ttl: Duration::from_secs(session_ttl_hours * 60 * 60),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            port: DEFAULT_PORT,
            secure_cookies: false,
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_HOURS * 60 * 60),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_development_friendly() {
        let config = ServerConfig::default();

        assert_eq!(config.port, 3000);
        assert!(!config.secure_cookies);
        assert_eq!(config.session_ttl, Duration::from_secs(24 * 60 * 60));
    }
}
