use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every value has a default; malformed numbers fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// YAML catalogue on disk. `None` means the catalogue bundled into the binary.
    pub templates_path: Option<String>,
    pub geometry_cache_capacity: usize,
    pub contrast_cache_capacity: usize,
    /// Turns the per-layout-type zone requirement table from warnings into errors.
    pub enforce_zone_requirements: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_env("PORT", 8080u16)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            templates_path: optional_env("TEMPLATES_PATH"),
            geometry_cache_capacity: parse_env("GEOMETRY_CACHE_CAPACITY", 256usize)?,
            contrast_cache_capacity: parse_env("CONTRAST_CACHE_CAPACITY", 128usize)?,
            enforce_zone_requirements: parse_env("ENFORCE_ZONE_REQUIREMENTS", false)?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            templates_path: None,
            geometry_cache_capacity: 256,
            contrast_cache_capacity: 128,
            enforce_zone_requirements: false,
        }
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        None => Ok(default),
    }
}
