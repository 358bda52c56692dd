use axum::extract::FromRef;

use crate::songlist::SonglistManager;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedSonglistManager = Arc<SonglistManager>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub manager: GuardedSonglistManager,
    pub hash: String,
}

impl ServerState {
    pub fn new(config: ServerConfig, manager: GuardedSonglistManager, hash: String) -> Self {
        Self {
            config,
            start_time: Instant::now(),
            manager,
            hash,
        }
    }
}

impl FromRef<ServerState> for GuardedSonglistManager {
    fn from_ref(input: &ServerState) -> Self {
        input.manager.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
