use serde::Deserialize;

/// Top-level application configuration.
/// Loaded from environment variables (`PS__SECTION__KEY`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Uploaded file storage
    #[serde(default)]
    pub storage: StorageConfig,
    /// Room → file mapping store
    #[serde(default)]
    pub rooms: RoomsConfig,
    /// Redis settings (only used by the redis room store)
    #[serde(default)]
    pub redis: RedisConfig,
    /// S3 / MinIO settings (only used by the s3 storage backend)
    #[serde(default)]
    pub s3: S3Config,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to (default: 0.0.0.0)
    #[serde(default = "default_host")]
    pub host: String,
    /// HTTP + WebSocket port (default: 5000)
    #[serde(default = "default_port")]
    pub port: u16,
    /// Base URL clients use to reach this server, used to build file URLs
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    /// Log level when RUST_LOG is unset (default: info)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Largest accepted upload in MiB (default: 50)
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_base_url: default_public_base_url(),
            log_level: default_log_level(),
            max_upload_mb: default_max_upload_mb(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Local,
    S3,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Directory for the local backend (default: uploads)
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            upload_dir: default_upload_dir(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomsBackend {
    #[default]
    Json,
    Redis,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoomsConfig {
    #[serde(default)]
    pub backend: RoomsBackend,
    /// File the json backend persists to (default: roomMap.json)
    #[serde(default = "default_json_path")]
    pub json_path: String,
}

impl Default for RoomsConfig {
    fn default() -> Self {
        Self {
            backend: RoomsBackend::default(),
            json_path: default_json_path(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    /// Redis connection URL
    #[serde(default = "default_redis_url")]
    pub url: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
        }
    }
}

impl AppConfig {
    /// Load config from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let cfg = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("PS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        cfg.try_deserialize()
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    5000
}
fn default_public_base_url() -> String {
    "http://localhost:5000".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_max_upload_mb() -> usize {
    50
}
fn default_upload_dir() -> String {
    "uploads".to_string()
}
fn default_json_path() -> String {
    "roomMap.json".to_string()
}
fn default_redis_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Config {
    /// S3-compatible endpoint URL (MinIO)
    #[serde(default = "default_s3_endpoint")]
    pub endpoint: String,
    /// Public S3 endpoint used in file URLs handed to browsers.
    /// Defaults to the same as `endpoint` if not set.
    #[serde(default)]
    pub public_endpoint: Option<String>,
    /// Bucket for uploaded documents
    #[serde(default = "default_s3_bucket")]
    pub bucket: String,
    /// AWS region
    #[serde(default = "default_s3_region")]
    pub region: String,
    /// Access key
    #[serde(default = "default_s3_access_key")]
    pub access_key: String,
    /// Secret key
    #[serde(default = "default_s3_secret_key")]
    pub secret_key: String,
}

impl S3Config {
    /// Returns the public endpoint for browser-facing URLs,
    /// falling back to the internal endpoint if not configured.
    pub fn public_endpoint(&self) -> &str {
        self.public_endpoint.as_deref().unwrap_or(&self.endpoint)
    }
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            endpoint: default_s3_endpoint(),
            public_endpoint: None,
            bucket: default_s3_bucket(),
            region: default_s3_region(),
            access_key: default_s3_access_key(),
            secret_key: default_s3_secret_key(),
        }
    }
}

fn default_s3_endpoint() -> String {
    "http://localhost:9000".to_string()
}
fn default_s3_bucket() -> String {
    "ps-documents".to_string()
}
fn default_s3_region() -> String {
    "us-east-1".to_string()
}
fn default_s3_access_key() -> String {
    "pagesync".to_string()
}
fn default_s3_secret_key() -> String {
    "pagesync123".to_string()
}
