use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub db_path: Option<String>,
    pub port: Option<u16>,
    pub logging_level: Option<String>,
    pub static_dir_path: Option<String>,
    pub index_user_id: Option<i64>,

    pub echonest: Option<EchoNestFileConfig>,
}

/// The API key is not read from the file, only from the environment or the
/// command line.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct EchoNestFileConfig {
    pub base_url: Option<String>,
    pub timeout_sec: Option<u64>,
    pub enrichment_timeout_sec: Option<u64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
