//! Search module - web search backends
//!
//! Turns a free-text query into candidate page URLs.

pub mod serpapi;
pub mod traits;

pub use serpapi::SerpApiClient;
pub use traits::SearchProvider;
