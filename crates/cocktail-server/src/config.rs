//! Configuration loading and management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Account seeded into an empty users table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bootstrap: Option<BootstrapConfig>,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_db_url(),
            max_connections: default_max_connections(),
        }
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub jwt_secret: String,
    /// Token lifetime: plain seconds or a number with an s/m/h/d suffix
    #[serde(default = "default_jwt_during")]
    pub jwt_during: String,
    /// Argon2 time cost for password hashes
    #[serde(default = "default_hash_cost")]
    pub hash_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            jwt_during: default_jwt_during(),
            hash_cost: default_hash_cost(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// First account, created only when no active user exists
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapConfig {
    pub email: String,
    pub password: String,
    #[serde(default = "default_bootstrap_name")]
    pub nom: String,
    #[serde(default = "default_bootstrap_name")]
    pub prenom: String,
    #[serde(default = "default_bootstrap_name")]
    pub pseudo: String,
}

// Default value functions
fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_db_url() -> String {
    "sqlite:./data/cocktails.db?mode=rwc".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_jwt_during() -> String {
    "1h".to_string()
}

fn default_hash_cost() -> u32 {
    2
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_bootstrap_name() -> String {
    "admin".to_string()
}

/// Parse a lifetime like "3600", "90s", "30m", "2h" or "1d"
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Ok(secs) = s.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }
    let (unit_start, _) = s.char_indices().last()?;
    let (num, unit) = s.split_at(unit_start);
    let value: u64 = num.trim().parse().ok()?;
    let multiplier = match unit {
        "s" => 1,
        "m" => 60,
        "h" => 3600,
        "d" => 86400,
        _ => return None,
    };
    value.checked_mul(multiplier).map(Duration::from_secs)
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &str) -> Result<Self> {
        let config_path = Path::new(path);

        // Check if config file exists
        if !config_path.exists() {
            info!("Config file not found at {}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        info!("Loaded configuration from {}", path);
        Ok(config)
    }

    /// Token lifetime parsed from `auth.jwt_during`
    pub fn token_lifetime(&self) -> Result<chrono::Duration> {
        let lifetime = parse_duration(&self.auth.jwt_during)
            .with_context(|| format!("Invalid token lifetime: {:?}", self.auth.jwt_during))?;
        chrono::Duration::from_std(lifetime).context("Token lifetime out of range")
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.is_empty() {
            anyhow::bail!("auth.jwt_secret must be set (or JWT_SECRET)");
        }
        if self.auth.hash_cost == 0 {
            anyhow::bail!("auth.hash_cost must be at least 1");
        }
        let lifetime = self.token_lifetime()?;
        if lifetime <= chrono::Duration::zero() {
            anyhow::bail!("auth.jwt_during must be a positive duration");
        }
        if chrono::Utc::now().checked_add_signed(lifetime).is_none() {
            anyhow::bail!("auth.jwt_during is too large");
        }
        if self.database.max_connections == 0 {
            anyhow::bail!("database.max_connections must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("3600"), Some(Duration::from_secs(3600)));
        assert_eq!(parse_duration("90s"), Some(Duration::from_secs(90)));
        assert_eq!(parse_duration("30m"), Some(Duration::from_secs(1800)));
        assert_eq!(parse_duration("2h"), Some(Duration::from_secs(7200)));
        assert_eq!(parse_duration("1d"), Some(Duration::from_secs(86400)));
        assert_eq!(parse_duration("1w"), None);
        assert_eq!(parse_duration("1é"), None);
        assert_eq!(parse_duration("h"), None);
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("213503982334602d"), None);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = Config::load("/nonexistent/cocktails.toml").unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.auth.jwt_during, "1h");
        assert!(config.bootstrap.is_none());

        // Defaults alone are not runnable: there is no secret
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [server]
            port = 8080

            [auth]
            jwt_secret = "from-file"
            jwt_during = "30m"
            hash_cost = 3

            [bootstrap]
            email = "admin@example.com"
            password = "admin"
            "#
        )
        .unwrap();

        let config = Config::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.bind_address, "0.0.0.0");
        assert_eq!(config.auth.hash_cost, 3);
        assert_eq!(config.token_lifetime().unwrap().num_seconds(), 1800);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());

        let bootstrap = config.bootstrap.unwrap();
        assert_eq!(bootstrap.email, "admin@example.com");
        assert_eq!(bootstrap.pseudo, "admin");
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let mut config = Config::default();
        config.auth.jwt_secret = "secret".to_string();
        assert!(config.validate().is_ok());

        config.auth.hash_cost = 0;
        assert!(config.validate().is_err());

        config.auth.hash_cost = 2;
        config.auth.jwt_during = "soon".to_string();
        assert!(config.validate().is_err());

        config.auth.jwt_during = "0".to_string();
        assert!(config.validate().is_err());

        config.auth.jwt_during = "100000000d".to_string();
        assert!(config.validate().is_err());
    }
}
