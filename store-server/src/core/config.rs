/// Server configuration
///
/// # Environment variables
///
/// Every setting can be overridden through the environment:
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | WORK_DIR | /var/lib/store | Working directory (database, logs) |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | LOCK_TTL_SECS | 300 | Checkout lock lifetime |
/// | SWEEP_INTERVAL_SECS | 300 | Expiry sweeper interval |
/// | PAYMENT_ENDPOINT | (unset) | Payment provider base URL |
/// | PAYMENT_API_KEY | (unset) | Payment provider API key |
/// | ENVIRONMENT | development | development \| staging \| production |
/// | SHUTDOWN_TIMEOUT_MS | 10000 | Graceful shutdown timeout |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/data/store HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for database and log files
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// Checkout lock lifetime in seconds
    pub lock_ttl_secs: u64,
    /// Expiry sweeper interval in seconds
    pub sweep_interval_secs: u64,
    /// Payment provider base URL (None disables card checkout)
    pub payment_endpoint: Option<String>,
    /// Payment provider API key
    pub payment_api_key: Option<String>,
    /// Running environment: development | staging | production
    pub environment: String,
    /// Graceful shutdown timeout (milliseconds)
    pub shutdown_timeout_ms: u64,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/store".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            lock_ttl_secs: std::env::var("LOCK_TTL_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(300),
            sweep_interval_secs: std::env::var("SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(300),
            payment_endpoint: std::env::var("PAYMENT_ENDPOINT").ok(),
            payment_api_key: std::env::var("PAYMENT_API_KEY").ok(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            shutdown_timeout_ms: std::env::var("SHUTDOWN_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10000),
        }
    }

    /// Override work dir and port, commonly used in tests.
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// Database directory under the working dir
    pub fn database_dir(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.work_dir).join("database")
    }

    /// Log directory under the working dir
    pub fn log_dir(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.work_dir).join("logs")
    }

    /// Ensure the working directory layout exists
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.log_dir())?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
