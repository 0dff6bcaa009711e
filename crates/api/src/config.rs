/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development. In production,
/// override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Grace period for background cleanup after the listener stops
    /// (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// PostgreSQL URL. When unset, scopes and protocols live in memory.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections (default: `20`).
    pub db_max_connections: u32,
    /// JSON file seeding the in-memory protocol catalog.
    pub protocol_catalog_path: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default    |
    /// |-------------------------|------------|
    /// | `HOST`                  | `0.0.0.0`  |
    /// | `PORT`                  | `3000`     |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`       |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`       |
    /// | `DATABASE_URL`          | unset      |
    /// | `DB_MAX_CONNECTIONS`    | `20`       |
    /// | `PROTOCOL_CATALOG_PATH` | unset      |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let database_url = non_empty_var("DATABASE_URL");

        let db_max_connections: u32 = std::env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "20".into())
            .parse()
            .expect("DB_MAX_CONNECTIONS must be a valid u32");

        let protocol_catalog_path = non_empty_var("PROTOCOL_CATALOG_PATH");

        Self {
            host,
            port,
            request_timeout_secs,
            shutdown_timeout_secs,
            database_url,
            db_max_connections,
            protocol_catalog_path,
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
