//! HTTP and WebSocket handlers.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Json;
use axum::extract::ws::{close_code, CloseFrame, Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::watch;
use tracing::{info, warn};

use wl_log::{read_recent, LogLayout, LogLine};

use crate::{Broadcaster, FeedError, FeedMessage, FeedResult};

/// Lines returned by `/api/recent` when `count` is not given.
pub const DEFAULT_RECENT: usize = 20;

/// Source of "now" for picking today's log file.
pub type Clock = fn() -> DateTime<Utc>;

/// Shared by every request handler.
#[derive(Clone, Debug)]
pub struct FeedState {
    layout:      Arc<LogLayout>,
    broadcaster: Broadcaster,
    backlog:     usize,
    shutdown:    watch::Receiver<bool>,
    clock:       Clock,
}

impl FeedState {
    pub fn new(
        layout: LogLayout,
        broadcaster: Broadcaster,
        backlog: usize,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            layout: Arc::new(layout),
            broadcaster,
            backlog,
            shutdown,
            clock: Utc::now,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn broadcaster(&self) -> &Broadcaster {
        &self.broadcaster
    }

    pub fn today_path(&self) -> PathBuf {
        self.layout.path_at((self.clock)())
    }

    /// The last `count` lines of today's log, screenshots included.
    ///
    /// The read runs on the blocking pool.
    pub async fn recent(&self, count: usize) -> FeedResult<Vec<LogLine>> {
        let path = self.today_path();
        Ok(tokio::task::spawn_blocking(move || read_recent(&path, count)).await??)
    }
}

// ── /api/recent ───────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct RecentQuery {
    pub count: Option<usize>,
}

pub async fn recent(
    State(state): State<FeedState>,
    Query(query): Query<RecentQuery>,
) -> FeedResult<Json<Vec<LogLine>>> {
    let count = query.count.unwrap_or(DEFAULT_RECENT);
    Ok(Json(state.recent(count).await?))
}

// ── /screenshots/{file} ───────────────────────────────────────────────────────

pub async fn screenshot(State(state): State<FeedState>, Path(file): Path<String>) -> Response {
    if !is_plain_file_name(&file) {
        warn!(file, "rejected screenshot path");
        return not_found();
    }
    let path = state.layout.screenshots_dir().join(&file);
    match tokio::fs::read(&path).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, content_type(&file))], bytes).into_response(),
        Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::IsADirectory) => not_found(),
        Err(e) => FeedError::from(e).into_response(),
    }
}

/// A single path component: no separators, no `.`/`..`.
pub(crate) fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\', '\0'])
}

pub(crate) fn content_type(name: &str) -> &'static str {
    let ext = std::path::Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Screenshot not found").into_response()
}

// ── /health ───────────────────────────────────────────────────────────────────

pub async fn health(State(state): State<FeedState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "subscribers": state.broadcaster.subscriber_count(),
    }))
}

// ── /ws ───────────────────────────────────────────────────────────────────────

pub async fn live(State(state): State<FeedState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| stream_feed(socket, state))
}

/// History first, then live messages until either side hangs up.
///
/// The subscription is taken before the backlog is read, so a line appended
/// in between may arrive twice but is never missed.
async fn stream_feed(mut socket: WebSocket, state: FeedState) {
    let mut subscription = state.broadcaster.subscribe();
    let mut shutdown = state.shutdown.clone();
    info!("observer connected");

    let perceptions = state.recent(state.backlog).await.unwrap_or_else(|e| {
        warn!(error = %e, "history backlog unavailable");
        Vec::new()
    });
    if send_message(&mut socket, &FeedMessage::History { perceptions }).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Ping(payload))) => {
                        if socket.send(Message::Pong(payload)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                    _ => {}
                }
            }
            outgoing = subscription.next() => {
                let Some(message) = outgoing else { break };
                if send_message(&mut socket, &message).await.is_err() {
                    break;
                }
            }
            _ = async { let _ = shutdown.wait_for(|stop| *stop).await; } => {
                let frame = CloseFrame { code: close_code::AWAY, reason: "server shutting down".into() };
                let _ = socket.send(Message::Close(Some(frame))).await;
                break;
            }
        }
    }
    info!("observer disconnected");
}

async fn send_message(socket: &mut WebSocket, message: &FeedMessage) -> Result<(), axum::Error> {
    let payload = message.to_text().map_err(axum::Error::new)?;
    socket.send(Message::Text(payload.into())).await
}
