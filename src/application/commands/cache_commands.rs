//! Cache Commands - 缓存维护命令

/// 清空缓存命令
#[derive(Debug, Clone, Copy)]
pub struct ClearCache;

/// 清空缓存响应
#[derive(Debug, Clone)]
pub struct ClearedCache {
    /// 被移除的条目数
    pub removed: usize,
}
