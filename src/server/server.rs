use anyhow::{Context, Result};
use std::time::Duration;

use tracing::{error, info};

use tower_http::services::ServeDir;

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};

use super::index_page::{render_error, render_index};
use super::{log_requests, state::*, ServerConfig};
use crate::songlist::SonglistError;

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

fn footer(state: &ServerState) -> String {
    format!(
        "songlister {} - up {}",
        state.hash,
        format_uptime(state.start_time.elapsed())
    )
}

fn error_page(state: &ServerState, err: SonglistError) -> Response {
    let (status, title) = match &err {
        SonglistError::NotFound { .. } => (StatusCode::NOT_FOUND, "Not found"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong"),
    };
    if status.is_server_error() {
        error!("Failed to render index: {:#}", err);
    } else {
        info!("Index not available: {}", err);
    }
    let message = match &err {
        SonglistError::NotFound { .. } => err.to_string(),
        _ => "The song list could not be loaded.".to_string(),
    };
    (status, Html(render_error(title, &message, &footer(state)))).into_response()
}

async fn index(State(state): State<ServerState>) -> Response {
    match state.manager.get_index_songs(state.config.index_user_id) {
        Ok(songs) => Html(render_index(&songs, &footer(&state))).into_response(),
        Err(err) => error_page(&state, err),
    }
}

pub fn make_app(config: ServerConfig, manager: GuardedSonglistManager, hash: String) -> Router {
    let state = ServerState::new(config.clone(), manager, hash);

    let mut app: Router = Router::new()
        .route("/", get(index))
        .route("/index", get(index))
        .with_state(state.clone());

    if let Some(static_dir) = config.static_dir_path {
        app = app.nest_service("/static", ServeDir::new(static_dir));
    }

    app.layer(middleware::from_fn_with_state(state, log_requests))
}

pub async fn run_server(
    config: ServerConfig,
    manager: GuardedSonglistManager,
    hash: String,
) -> Result<()> {
    let port = config.port;
    let app = make_app(config, manager, hash);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    info!("Listening on {}", listener.local_addr()?);

    Ok(axum::serve(listener, app).await?)
}
