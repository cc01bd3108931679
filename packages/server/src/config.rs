use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    #[serde(default)]
    pub allow_origins: Vec<String>,
    #[serde(default = "default_cors_max_age")]
    pub max_age: u64,
}

fn default_cors_max_age() -> u64 {
    3600
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origins: Vec::new(),
            max_age: default_cors_max_age(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Shared secret for verifying identity-provider session tokens.
    pub jwt_secret: String,
}

/// Abuse-protection knobs for the publish endpoints.
///
/// The bucket holds `capacity` tokens and refills `refill_rate` tokens every
/// `interval_secs`, per subject. Setting `enabled` to false lets every
/// request through, which is what local development usually wants.
#[derive(Debug, Deserialize, Clone)]
pub struct ProtectionConfig {
    #[serde(default = "default_protection_enabled")]
    pub enabled: bool,
    #[serde(default = "default_protection_capacity")]
    pub capacity: u32,
    #[serde(default = "default_protection_refill_rate")]
    pub refill_rate: u32,
    #[serde(default = "default_protection_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_protection_block_automated")]
    pub block_automated: bool,
}

fn default_protection_enabled() -> bool {
    true
}

fn default_protection_capacity() -> u32 {
    10
}

fn default_protection_refill_rate() -> u32 {
    10
}

fn default_protection_interval_secs() -> u64 {
    3600
}

fn default_protection_block_automated() -> bool {
    true
}

impl Default for ProtectionConfig {
    fn default() -> Self {
        Self {
            enabled: default_protection_enabled(),
            capacity: default_protection_capacity(),
            refill_rate: default_protection_refill_rate(),
            interval_secs: default_protection_interval_secs(),
            block_automated: default_protection_block_automated(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PixabayConfig {
    pub api_key: String,
    #[serde(default = "default_pixabay_base_url")]
    pub base_url: String,
    #[serde(default = "default_pixabay_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_pixabay_base_url() -> String {
    "https://pixabay.com/api/".to_string()
}

fn default_pixabay_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    /// Number of rendered pages kept in the in-process cache.
    #[serde(default = "default_page_capacity")]
    pub page_capacity: usize,
}

fn default_page_capacity() -> usize {
    256
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            page_capacity: default_page_capacity(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub protection: ProtectionConfig,
    pub pixabay: PixabayConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., INKWELL__AUTH__JWT_SECRET)
            .add_source(Environment::with_prefix("INKWELL").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
