//! Cache Queries - 缓存统计查询

use std::path::PathBuf;

/// 缓存统计查询
#[derive(Debug, Clone, Copy)]
pub struct GetCacheStats;

/// 缓存统计结果
#[derive(Debug, Clone)]
pub struct CacheStatsView {
    /// 缓存条目总数
    pub total_items: usize,
    /// 持久化目录
    pub cache_dir: PathBuf,
}
