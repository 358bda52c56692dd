mod file_config;

pub use file_config::{EchoNestFileConfig, FileConfig};

use crate::echonest::{EchoNestConfig, DEFAULT_ECHO_NEST_BASE_URL};
use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DB_PATH: &str = "/tmp/songlister.db";
pub const DEFAULT_INDEX_USER_ID: i64 = 2;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub db_path: Option<PathBuf>,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub static_dir_path: Option<String>,
    pub index_user_id: i64,
    pub echonest_api_key: Option<String>,
    pub echonest_base_url: String,
    pub echonest_timeout_sec: u64,
    pub enrichment_timeout_sec: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            port: 3001,
            logging_level: RequestsLoggingLevel::default(),
            static_dir_path: None,
            index_user_id: DEFAULT_INDEX_USER_ID,
            echonest_api_key: None,
            echonest_base_url: DEFAULT_ECHO_NEST_BASE_URL.to_string(),
            echonest_timeout_sec: 10,
            enrichment_timeout_sec: 30,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub static_dir_path: Option<String>,
    pub index_user_id: i64,

    pub echonest_api_key: Option<String>,
    pub echonest_base_url: String,
    pub echonest_timeout_sec: u64,
    pub enrichment_timeout_sec: u64,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_path = file
            .db_path
            .map(PathBuf::from)
            .or_else(|| cli.db_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));

        if db_path.is_dir() {
            bail!("db_path is a directory: {:?}", db_path);
        }
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.is_dir() {
                bail!("Database directory does not exist: {:?}", parent);
            }
        }

        let port = file.port.unwrap_or(cli.port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let static_dir_path = file
            .static_dir_path
            .or_else(|| cli.static_dir_path.clone());
        let index_user_id = file.index_user_id.unwrap_or(cli.index_user_id);

        let echonest = file.echonest.unwrap_or_default();
        let echonest_base_url = echonest
            .base_url
            .unwrap_or_else(|| cli.echonest_base_url.clone());
        let echonest_timeout_sec = echonest.timeout_sec.unwrap_or(cli.echonest_timeout_sec);
        let enrichment_timeout_sec = echonest
            .enrichment_timeout_sec
            .unwrap_or(cli.enrichment_timeout_sec);

        Ok(Self {
            db_path,
            port,
            logging_level,
            static_dir_path,
            index_user_id,
            echonest_api_key: cli.echonest_api_key.clone().filter(|k| !k.is_empty()),
            echonest_base_url,
            echonest_timeout_sec,
            enrichment_timeout_sec,
        })
    }

    pub fn echonest_config(&self) -> EchoNestConfig {
        EchoNestConfig {
            base_url: self.echonest_base_url.clone(),
            api_key: self.echonest_api_key.clone(),
            timeout_sec: self.echonest_timeout_sec,
        }
    }

    pub fn enrichment_timeout(&self) -> Duration {
        Duration::from_secs(self.enrichment_timeout_sec)
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
