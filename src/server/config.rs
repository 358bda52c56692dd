use super::RequestsLoggingLevel;
use crate::config::DEFAULT_INDEX_USER_ID;

#[derive(Clone)]
pub struct ServerConfig {
    pub requests_logging_level: RequestsLoggingLevel,
    pub port: u16,
    /// User whose songs are listed on the index page.
    pub index_user_id: i64,
    /// Served under `/static` when set.
    pub static_dir_path: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            requests_logging_level: RequestsLoggingLevel::Path,
            port: 3001,
            index_user_id: DEFAULT_INDEX_USER_ID,
            static_dir_path: None,
        }
    }
}
