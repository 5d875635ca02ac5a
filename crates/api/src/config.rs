use projecthub_core::validation::DEFAULT_EMAIL_DOMAINS;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Whether the server runs in production mode (`APP_ENV=production`).
    /// Controls suppression of internal error messages in responses.
    pub production: bool,
    /// Institutional email domains accepted at registration.
    pub email_domains: Vec<String>,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                           |
    /// |------------------------|-----------------------------------|
    /// | `HOST`                 | `0.0.0.0`                         |
    /// | `PORT`                 | `3000`                            |
    /// | `CORS_ORIGINS`         | `http://localhost:3001`           |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                              |
    /// | `APP_ENV`              | `development`                     |
    /// | `EMAIL_DOMAINS`        | `university.edu,student.university.edu` |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3001".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let production = std::env::var("APP_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let email_domains: Vec<String> = std::env::var("EMAIL_DOMAINS")
            .unwrap_or_else(|_| DEFAULT_EMAIL_DOMAINS.join(","))
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            production,
            email_domains,
            jwt,
        }
    }
}
