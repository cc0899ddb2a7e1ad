//! Application configuration module
use crate::utils::split_list;
use anyhow::Context;
use std::env;
use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_TABLE_NAME: &str = "spacex-launches";
pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_SPACEX_API_URL: &str = "https://api.spacexdata.com/v4/launches";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub storage: StorageConfig,
    pub sync: SyncConfig,
    pub cors: CorsConfig,
}

#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub table_name: String,
    pub region: String,
    /// Set when talking to DynamoDB Local or another compatible endpoint
    pub endpoint_url: Option<String>,
}

#[derive(Clone, Debug)]
pub struct SyncConfig {
    pub api_url: String,
    pub request_timeout: Duration,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CorsConfig {
    AnyOrigin,
    Origins(Vec<String>),
}

impl CorsConfig {
    pub fn parse(value: &str) -> Self {
        let origins = split_list(value);
        if origins.is_empty() || origins.iter().any(|o| o == "*") {
            CorsConfig::AnyOrigin
        } else {
            CorsConfig::Origins(origins)
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR must be a socket address such as 0.0.0.0:3000")?;

        let storage = StorageConfig {
            table_name: env_or("SPACEX_TABLE_NAME", DEFAULT_TABLE_NAME),
            region: env_or("SPACEX_AWS_REGION", DEFAULT_REGION),
            endpoint_url: env::var("DYNAMODB_ENDPOINT_URL")
                .ok()
                .filter(|s| !s.is_empty()),
        };

        let sync = SyncConfig {
            api_url: env_or("SPACEX_API_URL", DEFAULT_SPACEX_API_URL),
            request_timeout: Duration::from_secs(env_u64("SPACEX_REQUEST_TIMEOUT", 30)),
        };

        let cors = CorsConfig::parse(&env_or("CORS_ALLOWED_ORIGINS", "*"));

        Ok(Self {
            bind_addr,
            storage,
            sync,
            cors,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
