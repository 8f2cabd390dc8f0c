//! HTTP Handlers

pub mod cache;
pub mod info;
pub mod speech;

pub use cache::{cache_stats, clear_cache};
pub use info::{health, service_info};
pub use speech::{batch_pregenerate, generate};
