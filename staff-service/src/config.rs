use std::path::Path;

use serde::Deserialize;

/// Service tuning read from a TOML file. Connection strings stay in the
/// environment; everything here has a default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StaffServiceConfig {
    pub password: PasswordConfig,
    pub database: DatabaseConfig,
    pub rate_limit: RateLimitConfig,
    pub cache: CacheConfig,
}

/// Argon2id work factor.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            parallelism: 1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { max_connections: 5 }
    }
}

/// Per-IP token bucket.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub per_second: u64,
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            per_second: 2,
            burst_size: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub school_year_ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            school_year_ttl_seconds: 3600,
        }
    }
}

impl StaffServiceConfig {
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        if !Path::new(path).exists() {
            tracing::info!("Config file not found at {path}, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        tracing::info!(?config, "Loaded staff service config from {path}");
        Ok(config)
    }
}
