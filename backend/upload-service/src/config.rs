/// Configuration management for upload-service
///
/// Loads configuration from environment variables with sensible defaults.
use db_pool::env_utils::{env_non_empty, parse_env_bool, parse_env_with_default};
use db_pool::DbConfig;
use std::fmt;

use crate::error::{AppError, Result};

pub const SERVICE_NAME: &str = "upload-service";

const DEFAULT_BUCKET: &str = "sample-app-bucket1";
const DEFAULT_REGION: &str = "ap-northeast-2";

#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppConfig,
    pub database: DbConfig,
    pub s3: S3Config,
    pub logging: LogConfig,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub env: String,
    /// Apply the bundled schema migrations before serving traffic
    pub run_migrations: bool,
}

impl AppConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Clone)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    /// Custom endpoint for S3-compatible storage (MinIO, LocalStack)
    pub endpoint: Option<String>,
    /// Overrides the URL prefix handed back for stored objects
    pub public_base_url: Option<String>,
    pub force_path_style: bool,
}

impl fmt::Debug for S3Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3Config")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field(
                "access_key_id",
                &self.access_key_id.as_ref().map(|_| "[REDACTED]"),
            )
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("endpoint", &self.endpoint)
            .field("public_base_url", &self.public_base_url)
            .field("force_path_style", &self.force_path_style)
            .finish()
    }
}

impl S3Config {
    /// Base URL under which stored objects are publicly reachable
    pub fn public_base_url(&self) -> String {
        if let Some(base) = &self.public_base_url {
            return base.trim_end_matches('/').to_string();
        }

        match &self.endpoint {
            Some(endpoint) => format!("{}/{}", endpoint.trim_end_matches('/'), self.bucket),
            None => format!("https://{}.s3.{}.amazonaws.com", self.bucket, self.region),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Clone, Debug)]
pub struct LogConfig {
    pub format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let database = DbConfig::from_env(SERVICE_NAME).map_err(AppError::Config)?;

        let endpoint = env_non_empty("S3_ENDPOINT");
        let force_path_style = parse_env_bool("S3_FORCE_PATH_STYLE", endpoint.is_some());

        Ok(Config {
            app: AppConfig {
                host: env_non_empty("APP_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: parse_env_with_default("APP_PORT", 3000),
                env: env_non_empty("APP_ENV").unwrap_or_else(|| "development".to_string()),
                run_migrations: parse_env_bool("DB_RUN_MIGRATIONS", false),
            },
            database,
            s3: S3Config {
                bucket: env_non_empty("S3_BUCKET").unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
                region: env_non_empty("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
                access_key_id: env_non_empty("AWS_ACCESS_KEY_ID"),
                secret_access_key: env_non_empty("AWS_SECRET_ACCESS_KEY"),
                endpoint,
                public_base_url: env_non_empty("S3_PUBLIC_BASE_URL"),
                force_path_style,
            },
            logging: LogConfig {
                format: match env_non_empty("LOG_FORMAT").as_deref() {
                    Some("json") => LogFormat::Json,
                    _ => LogFormat::Pretty,
                },
            },
        })
    }
}
