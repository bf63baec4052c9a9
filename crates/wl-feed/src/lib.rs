//! `wl-feed`: live view of the perception log.
//!
//! The feed never talks to the simulation.  It watches the day's log file
//! from the outside, the same way any other reader would:
//!
//! ```text
//!  perceptions/YYYY-MM-DD.jsonl ──poll──▶ LogTailer ──▶ Broadcaster ──▶ /ws subscribers
//!                               ──read──▶ /api/recent, history backlog
//!  screenshots/<file>           ──read──▶ /screenshots/{file}
//! ```
//!
//! Polling is the source of truth: every `poll_interval_secs` the tailer
//! reads whatever complete lines were appended since its cursor.  A file
//! watcher on the log directory only wakes the tailer early.
//!
//! # Usage
//!
//! ```rust,ignore
//! let server = FeedServer::new(FeedConfig::default(), LogLayout::new("./logs"));
//! server.run(async { tokio::signal::ctrl_c().await.ok(); }).await?;
//! ```

pub mod broadcast;
pub mod error;
pub mod message;
pub mod routes;
pub mod server;
pub mod tailer;


pub use broadcast::{Broadcaster, Subscription};
pub use error::{FeedError, FeedResult};
pub use message::FeedMessage;
pub use routes::FeedState;
pub use server::{router, FeedConfig, FeedServer};
pub use tailer::LogTailer;
