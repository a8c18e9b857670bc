//! Slack Send - Message and File Delivery
//!
//! A small client for the Slack Web API: post a message (header plus a colored
//! attachment), upload a file, or upload every file in a directory.
//!
//! # Usage
//!
//! ```no_run
//! # async fn run() -> Result<(), slack_send::SendError> {
//! let client = slack_send::SlackClient::from_env()?;
//! client.send("*Deploy*", "finished", "good", "C0123456").await?;
//! client.upload_file("report.txt", "Nightly report", "C0123456").await?;
//! # Ok(())
//! # }
//! ```

pub mod blocks;
pub mod client;
pub mod error;
pub mod message;

pub use blocks::build_block_payload;
pub use client::{ClientConfig, DEFAULT_API_URL, SlackClient, TOKEN_ENV, UploadedFile};
pub use error::SendError;
pub use message::{Attachment, Message, PostedMessage};

use tracing_subscriber::EnvFilter;

/// Installs a stderr `fmt` subscriber filtered by `RUST_LOG` (default `info`).
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
