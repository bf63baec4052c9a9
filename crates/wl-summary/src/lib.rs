//! `wl-summary`: what one day of perceptions adds up to.
//!
//! [`summarize`] folds a day's log lines into a [`DaySummary`]: where the
//! agent was, what it did, and how it felt, each as a share of all
//! perceptions.  [`render_narrative`] turns that into a Markdown report.
//!
//! ```rust,ignore
//! let path = LogLayout::new("./logs").day_path(date);
//! match summarize_file(&path, &SummaryConfig::default())? {
//!     Some(summary) => println!("{}", render_narrative(&summary)),
//!     None => eprintln!("no perceptions logged for {date}"),
//! }
//! ```

pub mod error;
pub mod narrative;
pub mod summary;


pub use error::{SummaryError, SummaryResult};
pub use narrative::render_narrative;
pub use summary::{summarize, summarize_file, DaySummary, Share, SummaryConfig};
