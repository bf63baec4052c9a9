//! Router assembly, background tailing, and the serve loop.

use std::future::Future;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::Request;
use axum::http::header::{HeaderMap, HeaderName, HeaderValue};
use axum::http::{Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use chrono::{DateTime, Utc};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::{watch, Notify};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use wl_log::LogLayout;

use crate::routes::{self, FeedState};
use crate::{Broadcaster, FeedError, FeedResult, LogTailer};

/// Live feed settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Default `0.0.0.0:3001`.
    pub bind: SocketAddr,
    /// Seconds between log polls.  Default 5.
    pub poll_interval_secs: f64,
    /// Lines sent as history to a new subscriber.  Default 20.
    pub backlog: usize,
    /// Messages a subscriber may fall behind before it is dropped.
    pub channel_capacity: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 3001)),
            poll_interval_secs: 5.0,
            backlog: 20,
            channel_capacity: 256,
        }
    }
}

impl FeedConfig {
    pub fn validate(&self) -> FeedResult<()> {
        if !(self.poll_interval_secs.is_finite() && self.poll_interval_secs > 0.0) {
            return Err(FeedError::Config(format!(
                "poll_interval_secs must be positive, got {}",
                self.poll_interval_secs
            )));
        }
        if self.channel_capacity == 0 {
            return Err(FeedError::Config("channel_capacity must be at least 1".into()));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs_f64(self.poll_interval_secs)
    }
}

pub fn router(state: FeedState) -> Router {
    Router::new()
        .route("/ws", get(routes::live))
        .route("/api/recent", get(routes::recent))
        .route("/screenshots/{file}", get(routes::screenshot))
        .route("/health", get(routes::health))
        .layer(middleware::from_fn(cors_middleware))
        .with_state(state)
}

async fn cors_middleware(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        let mut response = Response::new(axum::body::Body::empty());
        *response.status_mut() = StatusCode::NO_CONTENT;
        apply_cors_headers(response.headers_mut());
        return response;
    }

    let mut response = next.run(request).await;
    apply_cors_headers(response.headers_mut());
    response
}

fn apply_cors_headers(headers: &mut HeaderMap) {
    headers.insert(
        HeaderName::from_static("access-control-allow-origin"),
        HeaderValue::from_static("*"),
    );
    headers.insert(
        HeaderName::from_static("access-control-allow-methods"),
        HeaderValue::from_static("GET,OPTIONS"),
    );
    headers.insert(
        HeaderName::from_static("access-control-allow-headers"),
        HeaderValue::from_static("*"),
    );
}

// ── Server ────────────────────────────────────────────────────────────────────

/// The live feed over one log root.
pub struct FeedServer {
    config: FeedConfig,
    layout: LogLayout,
}

impl FeedServer {
    pub fn new(config: FeedConfig, layout: LogLayout) -> Self {
        Self { config, layout }
    }

    /// Bind `config.bind` and serve until `shutdown` resolves.
    pub async fn run<F>(self, shutdown: F) -> FeedResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.config.validate()?;
        let listener = TcpListener::bind(self.config.bind).await?;
        self.serve(listener, shutdown).await
    }

    /// Serve on an already-bound listener.
    ///
    /// When `shutdown` resolves, the tailer stops, every WebSocket subscriber
    /// is sent a Close frame, and in-flight HTTP requests are allowed to
    /// finish.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> FeedResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.config.validate()?;
        let (stop_tx, stop_rx) = watch::channel(false);
        let broadcaster = Broadcaster::new(self.config.channel_capacity);

        let wake = Arc::new(Notify::new());
        let watcher = watch_log_dir(&self.layout.perceptions_dir(), wake.clone());
        let tailer = LogTailer::new(self.layout.perceptions_dir());
        let poller = tokio::spawn(poll_loop(
            tailer,
            broadcaster.clone(),
            self.config.poll_interval(),
            wake,
            stop_rx.clone(),
        ));

        let state = FeedState::new(self.layout, broadcaster, self.config.backlog, stop_rx);
        info!(addr = %listener.local_addr()?, "live feed listening");

        let served = axum::serve(listener, router(state))
            .with_graceful_shutdown(async move {
                shutdown.await;
                info!("shutting down live feed");
                let _ = stop_tx.send(true);
            })
            .await;

        drop(watcher);
        poller.await?;
        served?;
        Ok(())
    }
}

/// Wake the poller early when a `.jsonl` file in `dir` changes.
///
/// Best effort: if the directory is missing or the platform watcher fails,
/// the interval poll alone keeps the feed going.
fn watch_log_dir(dir: &Path, wake: Arc<Notify>) -> Option<RecommendedWatcher> {
    let handler = move |event: notify::Result<notify::Event>| {
        let Ok(event) = event else { return };
        let is_log = |p: &PathBuf| p.extension().is_some_and(|ext| ext == "jsonl");
        if event.paths.iter().any(is_log) {
            wake.notify_one();
        }
    };
    let watched = notify::recommended_watcher(handler)
        .and_then(|mut watcher| watcher.watch(dir, RecursiveMode::NonRecursive).map(|()| watcher));
    match watched {
        Ok(watcher) => {
            debug!(dir = %dir.display(), "watching log directory");
            Some(watcher)
        }
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "log directory not watched; polling only");
            None
        }
    }
}

/// Poll on a fixed interval, or sooner when `wake` fires, until told to
/// stop.  The first poll is immediate.  File reads run on the blocking pool.
async fn poll_loop(
    mut tailer: LogTailer,
    broadcaster: Broadcaster,
    every: Duration,
    wake: Arc<Notify>,
    mut stop: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = wake.notified() => debug!("log directory changed"),
            _ = stop.changed() => break,
        }
        let publisher = broadcaster.clone();
        let polled = tokio::task::spawn_blocking(move || {
            publish_new_lines(&mut tailer, &publisher, Utc::now());
            tailer
        });
        match polled.await {
            Ok(back) => tailer = back,
            Err(e) => {
                warn!(error = %e, "tailer task failed; live feed stopped");
                break;
            }
        }
    }
    debug!("tailer stopped");
}

/// One poll: hand every new line to the broadcaster.  Returns how many
/// lines were published.
pub(crate) fn publish_new_lines(
    tailer: &mut LogTailer,
    broadcaster: &Broadcaster,
    now: DateTime<Utc>,
) -> usize {
    match tailer.poll(now) {
        Ok(lines) => {
            let count = lines.len();
            for line in lines {
                broadcaster.publish(line.into());
            }
            count
        }
        Err(e) => {
            warn!(error = %e, "log poll failed; retrying next interval");
            0
        }
    }
}
