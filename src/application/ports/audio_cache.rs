//! Audio Cache Port - 音频缓存管理
//!
//! 定义两级音频缓存（内存 + 磁盘）的抽象接口，具体实现使用 Sled

use std::path::PathBuf;
use thiserror::Error;

/// Audio Cache 错误
///
/// 仅用于缓存的打开/装载阶段；`store` 和 `clear` 对单条记录的
/// 持久化失败只记日志，不向调用方抛出
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// 缓存统计信息
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// 内存中的条目数
    pub total_entries: usize,
    /// 持久化存储位置
    pub storage_path: PathBuf,
}

/// Audio Cache Port
///
/// 两级缓存: 内存映射（热路径）+ 每个 key 一条持久化记录（跨重启）
///
/// 不变量:
/// - 缓存 key 始终由**原始**解说文本派生（见 [`cache_key_for`]），
///   不是人格增强后的文本——增强是每次调用随机的，命中返回的音频
///   永远是首次未命中时合成的那个随机变体，这是刻意设计
/// - 条目一经写入不可变，只能被 `clear` 整体清空
/// - `lookup` / `store` 同步且不挂起（持久化为尽力而为）
pub trait AudioCachePort: Send + Sync {
    /// 按原始文本查询缓存音频
    ///
    /// 只查内存映射，热路径不触达磁盘
    fn lookup(&self, text: &str) -> Option<Vec<u8>>;

    /// 缓存音频（内存 + 磁盘）
    ///
    /// 内存写入无条件生效（last-write-wins）；随后尽力持久化，
    /// 持久化失败只记日志，不回滚内存写入——代价是内存与磁盘
    /// 可能分叉，进程重启后丢失该条目
    fn store(&self, text: &str, audio: Vec<u8>);

    /// 内存中不同 key 的数量
    fn len(&self) -> usize;

    /// 缓存是否为空
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 清空全部缓存（内存 + 磁盘），返回清除的内存条目数
    ///
    /// 单条持久化记录删除失败只记日志并继续
    fn clear(&self) -> usize;

    /// 获取缓存统计信息
    fn stats(&self) -> CacheStats;
}

/// 生成缓存 key
///
/// 对字面文本取 md5 十六进制摘要。不做任何规范化：大小写、空白
/// 均参与散列，`"Nice throw!"` 和 `"nice throw!"` 是两个条目——
/// 这是有意为之（解说短语表按字面串命中），不是缺陷
pub fn cache_key_for(text: &str) -> String {
    format!("{:x}", md5::compute(text.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_key_is_stable_across_calls() {
        let a = cache_key_for("Triple twenty! Amazing!");
        let b = cache_key_for("Triple twenty! Amazing!");
        assert_eq!(a, b);
    }

    #[test]
    fn test_key_is_fixed_length_hex() {
        let key = cache_key_for("Bullseye!");
        assert_eq!(key.len(), 32);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_keys_are_case_and_whitespace_sensitive() {
        // 不做规范化：大小写或空白不同的文本各占一个条目
        assert_ne!(cache_key_for("Nice throw!"), cache_key_for("nice throw!"));
        assert_ne!(cache_key_for("Next player!"), cache_key_for("Next player! "));
    }

    #[test]
    fn test_no_collisions_over_large_corpus() {
        let mut seen = HashSet::new();
        for i in 0..10_000 {
            let text = format!("Player {} hits the {} ring for {} points", i, i % 7, i * 3);
            assert!(seen.insert(cache_key_for(&text)), "collision at {}", i);
        }
    }
}
