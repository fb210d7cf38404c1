//! Browser automation module
//!
//! Wraps agent-browser CLI for the headless browser fallback.

mod executor;
mod extractor;
mod snapshot;

pub use executor::BrowserExecutor;
pub use extractor::{parse_eval_urls, BrowserExtractor, COLLECT_MEDIA_SCRIPT};
pub use snapshot::{Element, Snapshot, SnapshotData};
