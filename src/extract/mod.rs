//! Extraction module - finding direct media links for a page
//!
//! Contains the yt-dlp fast path, the browser fallback and the pipeline that
//! runs them in order.

pub mod browser;
pub mod media;
pub mod pipeline;
pub mod progress;
pub mod traits;
pub mod ytdlp;

pub use browser::BrowserExtractor;
pub use pipeline::ExtractionPipeline;
pub use progress::ProgressEvent;
pub use traits::MediaExtractor;
pub use ytdlp::YtDlpExtractor;
