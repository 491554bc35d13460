use anyhow::{Context, Result};
use std::time::Duration;

use tracing::{error, info, warn};

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};

use super::{log_requests, state::*, ServerConfig};
use crate::song::{validate_song, FieldErrors};

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub version: &'static str,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    Json(ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `POST /add/`: validates the payload, enriches it and stores the result.
async fn add_song(
    State(song_store): State<GuardedSongStore>,
    State(pipeline): State<GuardedEnrichmentPipeline>,
    body: Bytes,
) -> Response {
    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(err) => {
            let errors = FieldErrors::non_field(format!("JSON parse error - {}", err));
            return (StatusCode::BAD_REQUEST, Json(errors)).into_response();
        }
    };

    let song = match validate_song(&payload) {
        Ok(song) => song,
        Err(errors) => return (StatusCode::BAD_REQUEST, Json(errors)).into_response(),
    };

    let song = pipeline.enrich(song).await;

    let id = match song_store.create_song(&song) {
        Ok(id) => id,
        Err(err) => {
            error!("Failed to store song {}: {:#}", song, err);
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("An error occurred: {}", err),
            );
        }
    };

    if song.usable_lyrics().is_none() {
        warn!("No lyrics for {} (stored as {})", song, id);
        return error_response(StatusCode::NOT_FOUND, "Lyrics not found");
    }

    match song_store.get_song(id) {
        Ok(Some(stored)) => {
            info!("Added song {} with id {}", stored.record, id);
            (StatusCode::CREATED, Json(stored.record)).into_response()
        }
        Ok(None) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("An error occurred: song {} vanished after insert", id),
        ),
        Err(err) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("An error occurred: {}", err),
        ),
    }
}

pub fn make_app(
    config: ServerConfig,
    song_store: GuardedSongStore,
    pipeline: GuardedEnrichmentPipeline,
) -> Result<Router> {
    let state = ServerState::new(config, song_store, pipeline);

    let app: Router = Router::new()
        .route("/", get(home))
        .route("/add/", post(add_song))
        .layer(middleware::from_fn_with_state(state.clone(), log_requests))
        .with_state(state);

    Ok(app)
}

pub async fn run_server(
    config: ServerConfig,
    song_store: GuardedSongStore,
    pipeline: GuardedEnrichmentPipeline,
) -> Result<()> {
    let port = config.port;
    let app = make_app(config, song_store, pipeline)?;

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    info!("Listening on port {}", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
