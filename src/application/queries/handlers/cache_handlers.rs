//! Cache Query Handlers

use std::sync::Arc;

use crate::application::ports::AudioCachePort;
use crate::application::queries::cache_queries::*;

/// GetCacheStats Handler - 读取缓存统计
pub struct GetCacheStatsHandler {
    cache: Arc<dyn AudioCachePort>,
}

impl GetCacheStatsHandler {
    pub fn new(cache: Arc<dyn AudioCachePort>) -> Self {
        Self { cache }
    }

    pub fn handle(&self, _query: GetCacheStats) -> CacheStatsView {
        let stats = self.cache.stats();
        CacheStatsView {
            total_items: stats.total_entries,
            cache_dir: stats.storage_path,
        }
    }
}
