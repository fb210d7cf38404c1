//! vidscout - direct video link finder
//!
//! An HTTP service that turns a page URL or a search query into direct media
//! links (MP4 files, HLS playlists). yt-dlp is tried first; pages it cannot
//! handle are opened in a headless browser through agent-browser.
//!
//! # Architecture
//!
//! - **Core**: Shared types, configuration, and error handling
//! - **Search**: Search provider abstraction with a SerpAPI implementation
//! - **Extract**: yt-dlp and browser extractors plus the ordered pipeline
//! - **Inference**: HuggingFace question answering over search context
//! - **Server**: axum router, SSE progress streaming, listen loop
//!
//! # Usage
//!
//! ```rust,no_run
//! use vidscout::core::{Config, ExtractTarget};
//! use vidscout::extract::ExtractionPipeline;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::load().unwrap();
//!     let pipeline = ExtractionPipeline::from_config(&config).unwrap();
//!
//!     let target = ExtractTarget::Url("https://example.com/watch".into());
//!     let response = pipeline.run(&target, None).await;
//!     println!("{:?}", response.candidates);
//! }
//! ```

pub mod core;
pub mod extract;
pub mod inference;
pub mod logging;
pub mod search;
pub mod server;

// Re-export commonly used items
pub use core::{Config, Result, VidscoutError};
pub use extract::ExtractionPipeline;
pub use server::{router, serve, AppState};
