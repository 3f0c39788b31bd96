//! HTTP API handlers

use crate::adapters::{
    MediaPlayerEntity, MpcHcMediaPlayer, MpcHcRemote, PlayerSnapshot, RemoteEntity,
    TransportCommand,
};
use crate::bus::SharedBus;
use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
    routing::{get, post},
    Json, Router,
};
use futures::stream::Stream;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub player: Arc<MpcHcMediaPlayer>,
    pub remote: Arc<MpcHcRemote>,
    pub bus: SharedBus,
}

impl AppState {
    pub fn new(player: Arc<MpcHcMediaPlayer>, remote: Arc<MpcHcRemote>, bus: SharedBus) -> Self {
        Self {
            player,
            remote,
            bus,
        }
    }
}

/// All API routes, without middleware
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/status", get(status_handler))
        .route("/player", get(player_handler))
        .route("/player/control", post(player_control_handler))
        .route("/player/seek", post(player_seek_handler))
        .route("/remote/command", post(remote_command_handler))
        .route("/events", get(events_handler))
        .with_state(state)
}

/// Error response
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn bad_request(error: String) -> axum::response::Response {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error })).into_response()
}

/// General status response
#[derive(Serialize)]
pub struct StatusResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub player_url: String,
    pub available: bool,
    pub bus_subscribers: usize,
}

/// GET /status - Service health check
pub async fn status_handler(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        service: "mpc-hc-control",
        version: env!("MPCHC_VERSION"),
        player_url: state.player.base_url().to_string(),
        available: state.player.available().await,
        bus_subscribers: state.bus.subscriber_count(),
    })
}

// =============================================================================
// Media player handlers
// =============================================================================

/// GET /player - Current media player snapshot
pub async fn player_handler(State(state): State<AppState>) -> Json<PlayerSnapshot> {
    Json(state.player.snapshot().await)
}

#[derive(Deserialize)]
pub struct ControlRequest {
    pub action: String,
    #[serde(default)]
    pub value: Option<f64>,
}

/// POST /player/control - Transport command (play, pause, stop, next_track, ...)
pub async fn player_control_handler(
    State(state): State<AppState>,
    Json(req): Json<ControlRequest>,
) -> impl IntoResponse {
    let Some(command) = TransportCommand::from_action(&req.action, req.value) else {
        return bad_request(format!("Unknown action: {}", req.action));
    };

    state.player.handle_command(command).await;
    (StatusCode::OK, Json(serde_json::json!({"ok": true}))).into_response()
}

#[derive(Deserialize)]
pub struct SeekRequest {
    /// Target position in seconds
    pub position: f64,
}

/// POST /player/seek - Jump to a position, responds with the refreshed snapshot
pub async fn player_seek_handler(
    State(state): State<AppState>,
    Json(req): Json<SeekRequest>,
) -> impl IntoResponse {
    if !req.position.is_finite() {
        return bad_request("position must be a finite number".to_string());
    }

    state.player.media_seek(req.position).await;
    (StatusCode::OK, Json(state.player.snapshot().await)).into_response()
}

// =============================================================================
// Remote handlers
// =============================================================================

#[derive(Deserialize)]
pub struct RemoteCommandRequest {
    pub command: Vec<String>,
    #[serde(default = "default_num_repeats")]
    pub num_repeats: u32,
    #[serde(default = "default_delay_secs")]
    pub delay_secs: f64,
}

fn default_num_repeats() -> u32 {
    crate::adapters::remote::DEFAULT_NUM_REPEATS
}

fn default_delay_secs() -> f64 {
    crate::adapters::remote::DEFAULT_DELAY.as_secs_f64()
}

/// POST /remote/command - Send named commands through the remote entity
pub async fn remote_command_handler(
    State(state): State<AppState>,
    Json(req): Json<RemoteCommandRequest>,
) -> impl IntoResponse {
    let delay = match Duration::try_from_secs_f64(req.delay_secs) {
        Ok(delay) => delay,
        Err(_) => return bad_request(format!("Invalid delay_secs: {}", req.delay_secs)),
    };

    state
        .remote
        .send_command(&req.command, req.num_repeats, delay)
        .await;

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "ok": true,
            "sent": req.command.len() as u64 * req.num_repeats as u64,
        })),
    )
        .into_response()
}

// =============================================================================
// Event stream
// =============================================================================

/// GET /events - SSE stream of bus events
pub async fn events_handler(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.bus.subscribe();

    // Lagged receivers just skip ahead
    let stream = BroadcastStream::new(rx).filter_map(|result| {
        let event = result.ok()?;
        let json = serde_json::to_string(&event).ok()?;
        Some(Ok(Event::default().data(json)))
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}
