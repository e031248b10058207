use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Development-only signing secret. Never deploy with this value.
pub const DEV_JWT_SECRET: &str = "supersecret";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub auth: AuthConfig,

    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    /// Maximum database connections (default: 5)
    pub max_db_connections: u32,

    /// Minimum database connections (default: 1)
    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/quill.db".to_string(),
            log_level: "info".to_string(),
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,

    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HMAC secret used to sign session tokens.
    pub jwt_secret: String,

    /// Session token lifetime, e.g. "1d", "12h", "30m", "45s" or plain seconds.
    pub token_lifetime: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEV_JWT_SECRET.to_string(),
            token_lifetime: "1d".to_string(),
        }
    }
}

impl AuthConfig {
    pub fn lifetime(&self) -> Result<Duration> {
        parse_lifetime(&self.token_lifetime)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Argon2 memory cost in KiB (default: 8192 = 8MB)
    pub argon2_memory_cost_kib: u32,

    /// Argon2 time cost (iterations)
    pub argon2_time_cost: u32,

    pub argon2_parallelism: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            argon2_memory_cost_kib: 8192,
            argon2_time_cost: 3,
            argon2_parallelism: 1,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            server: ServerConfig::default(),
            auth: AuthConfig::default(),
            security: SecurityConfig::default(),
        }
    }
}

impl Config {
    /// Loads the first config file found, falling back to defaults, then applies
    /// environment overrides (a `.env` file is honoured).
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::load_file()?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn load_file() -> Result<Self> {
        for path in &Self::config_paths() {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Overrides file values with `DATABASE_URL`, `JWT_SECRET`, `JWT_EXPIRY`, `PORT`
    /// and `LOG_LEVEL` when set.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL") {
            self.general.database_path = url;
        }
        if let Some(secret) = lookup("JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Some(expiry) = lookup("JWT_EXPIRY") {
            self.auth.token_lifetime = expiry;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("Invalid PORT value: {port}"))?;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.general.log_level = level;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.is_empty() {
            anyhow::bail!("auth.jwt_secret cannot be empty");
        }

        let lifetime = self.auth.lifetime()?;
        if lifetime.is_zero() {
            anyhow::bail!("auth.token_lifetime must be greater than zero");
        }

        if self.general.min_db_connections > self.general.max_db_connections {
            anyhow::bail!("general.min_db_connections cannot exceed max_db_connections");
        }

        if self.auth.jwt_secret == DEV_JWT_SECRET {
            warn!("Using the development JWT secret; set JWT_SECRET before deploying");
        }

        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("quill").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".quill").join("config.toml"));
        }

        paths
    }

    #[must_use]
    pub fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<()> {
        let path = Self::default_config_path();
        if path.exists() {
            info!("Config already exists at: {}", path.display());
            return Ok(());
        }
        Self::default().save_to_path(&path)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }
}

/// Parses a lifetime such as `1d`, `12h`, `30m`, `45s` or a bare number of seconds.
pub fn parse_lifetime(value: &str) -> Result<Duration> {
    let value = value.trim();
    if value.is_empty() {
        anyhow::bail!("Token lifetime cannot be empty");
    }

    let (digits, multiplier) = match value.char_indices().last() {
        Some((idx, 'd')) => (&value[..idx], 86_400),
        Some((idx, 'h')) => (&value[..idx], 3_600),
        Some((idx, 'm')) => (&value[..idx], 60),
        Some((idx, 's')) => (&value[..idx], 1),
        _ => (value, 1),
    };

    let amount: u64 = digits
        .trim()
        .parse()
        .with_context(|| format!("Invalid token lifetime: {value}"))?;

    amount
        .checked_mul(multiplier)
        .map(Duration::from_secs)
        .ok_or_else(|| anyhow::anyhow!("Token lifetime too large: {value}"))
}
