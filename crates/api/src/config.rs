/// Server configuration loaded from environment variables.
///
/// All fields except `BILLING_WEBHOOK_SECRET` have defaults suitable for
/// local development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Token lifetimes.
    pub tokens: TokenConfig,
    /// Shared secret for verifying billing webhook signatures.
    pub billing_webhook_secret: String,
}

/// Token lifetime configuration.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Access token lifetime in seconds (default: 3600).
    pub access_ttl_secs: i64,
    /// Refresh token lifetime in days (default: 30).
    pub refresh_ttl_days: i64,
}

/// Default access token lifetime in seconds.
const DEFAULT_ACCESS_TTL_SECS: i64 = 3600;
/// Default refresh token lifetime in days.
const DEFAULT_REFRESH_TTL_DAYS: i64 = 30;

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Required | Default                 |
    /// |--------------------------|----------|-------------------------|
    /// | `HOST`                   | no       | `0.0.0.0`               |
    /// | `PORT`                   | no       | `3000`                  |
    /// | `CORS_ORIGINS`           | no       | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`   | no       | `30`                    |
    /// | `ACCESS_TOKEN_TTL_SECS`  | no       | `3600`                  |
    /// | `REFRESH_TOKEN_TTL_DAYS` | no       | `30`                    |
    /// | `BILLING_WEBHOOK_SECRET` | **yes**  | --                      |
    ///
    /// # Panics
    ///
    /// Panics if `BILLING_WEBHOOK_SECRET` is not set or is empty, or if a
    /// numeric variable fails to parse. Misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let access_ttl_secs: i64 = std::env::var("ACCESS_TOKEN_TTL_SECS")
            .unwrap_or_else(|_| DEFAULT_ACCESS_TTL_SECS.to_string())
            .parse()
            .expect("ACCESS_TOKEN_TTL_SECS must be a valid i64");

        let refresh_ttl_days: i64 = std::env::var("REFRESH_TOKEN_TTL_DAYS")
            .unwrap_or_else(|_| DEFAULT_REFRESH_TTL_DAYS.to_string())
            .parse()
            .expect("REFRESH_TOKEN_TTL_DAYS must be a valid i64");

        let billing_webhook_secret = std::env::var("BILLING_WEBHOOK_SECRET")
            .expect("BILLING_WEBHOOK_SECRET must be set in the environment");
        assert!(
            !billing_webhook_secret.is_empty(),
            "BILLING_WEBHOOK_SECRET must not be empty"
        );

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            tokens: TokenConfig {
                access_ttl_secs,
                refresh_ttl_days,
            },
            billing_webhook_secret,
        }
    }
}
