//! Sled 两级音频缓存 - AudioCachePort 的持久化实现
//!
//! 内存 DashMap 承担全部读路径，Sled 只作掉电保护:
//! 启动时全量扫描数据库装入内存，之后 lookup 不再触达磁盘。
//!
//! 不变量:
//! - lookup 命中返回的字节与当初 store 写入的完全一致
//! - store 先写内存再尽力持久化，持久化失败只记日志、不回滚内存
//! - 重启后重新 open 同一目录，键集合与条目数不变
//! - 无法解析或版本不符的磁盘记录在装载时跳过，不影响其余条目

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use sled::Db;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::application::ports::{cache_key_for, AudioCachePort, CacheError, CacheStats};

/// 持久化记录的格式版本，结构变更时递增
const ENTRY_VERSION: u8 = 1;

/// 写入 Sled 的缓存记录
///
/// key 冗余存一份供装载校验，source_text 保留原始文本供排障，
/// audio 为完整音频字节。版本不符的记录整条跳过，不做迁移。
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedEntry {
    version: u8,
    key: String,
    source_text: String,
    audio: Vec<u8>,
    created_at: i64,
}

/// 两级音频缓存
///
/// 并发模型: 内存层由 DashMap 提供分段锁，读写无需外部同步;
/// 持久层假定单写者(同一时刻只有一个协调器在 store/clear)。
pub struct SledAudioCache {
    db: Db,
    memory: DashMap<String, Vec<u8>>,
    path: PathBuf,
}

impl SledAudioCache {
    /// 打开(必要时创建)缓存目录并把已有记录装入内存
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, CacheError> {
        let path = path.as_ref().to_path_buf();
        let db = sled::open(&path).map_err(|e| CacheError::DatabaseError(e.to_string()))?;

        let memory = DashMap::new();
        let mut loaded = 0usize;
        let mut skipped = 0usize;

        for item in db.iter() {
            let (key, value) = match item {
                Ok(kv) => kv,
                Err(e) => {
                    tracing::warn!(error = %e, "Unreadable cache record, skipping");
                    skipped += 1;
                    continue;
                }
            };
            match bincode::deserialize::<PersistedEntry>(&value) {
                Ok(entry) if entry.version == ENTRY_VERSION => {
                    memory.insert(entry.key, entry.audio);
                    loaded += 1;
                }
                Ok(entry) => {
                    tracing::warn!(
                        key = %String::from_utf8_lossy(&key),
                        version = entry.version,
                        "Cache record has unknown format version, skipping"
                    );
                    skipped += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        key = %String::from_utf8_lossy(&key),
                        error = %e,
                        "Corrupt cache record, skipping"
                    );
                    skipped += 1;
                }
            }
        }

        tracing::info!(
            path = %path.display(),
            loaded,
            skipped,
            "Audio cache initialized"
        );

        Ok(Self { db, memory, path })
    }

    /// 包装为 Arc 便于共享
    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 强制把挂起的写刷到磁盘
    pub fn flush(&self) -> Result<(), CacheError> {
        self.db
            .flush()
            .map_err(|e| CacheError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}

impl AudioCachePort for SledAudioCache {
    fn lookup(&self, text: &str) -> Option<Vec<u8>> {
        let key = cache_key_for(text);
        let hit = self.memory.get(&key).map(|entry| entry.value().clone());
        match &hit {
            Some(audio) => {
                tracing::debug!(key = %key, size = audio.len(), "Cache hit");
            }
            None => {
                tracing::debug!(key = %key, "Cache miss");
            }
        }
        hit
    }

    fn store(&self, text: &str, audio: Vec<u8>) {
        let key = cache_key_for(text);
        self.memory.insert(key.clone(), audio.clone());

        let entry = PersistedEntry {
            version: ENTRY_VERSION,
            key: key.clone(),
            source_text: text.to_string(),
            audio,
            created_at: chrono::Utc::now().timestamp(),
        };
        let bytes = match bincode::serialize(&entry) {
            Ok(bytes) => bytes,
            Err(e) => {
                // 内存副本已经可用，持久化失败只降级为掉电后丢失
                tracing::error!(key = %key, error = %e, "Failed to encode cache entry, kept in memory only");
                return;
            }
        };
        if let Err(e) = self.db.insert(key.as_bytes(), bytes) {
            tracing::error!(key = %key, error = %e, "Failed to persist cache entry, kept in memory only");
        } else {
            tracing::debug!(key = %key, size = entry.audio.len(), "Audio cached");
        }
    }

    fn len(&self) -> usize {
        self.memory.len()
    }

    fn clear(&self) -> usize {
        let removed = self.memory.len();
        self.memory.clear();

        // 逐条删除持久化记录，单条失败不终止整个清空
        for item in self.db.iter() {
            let key = match item {
                Ok((key, _)) => key,
                Err(e) => {
                    tracing::warn!(error = %e, "Unreadable cache record during clear, skipping");
                    continue;
                }
            };
            if let Err(e) = self.db.remove(&key) {
                tracing::error!(
                    key = %String::from_utf8_lossy(&key),
                    error = %e,
                    "Failed to delete persisted cache entry"
                );
            }
        }

        tracing::info!(removed, "Audio cache cleared");
        removed
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            total_entries: self.memory.len(),
            storage_path: self.path.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn open_cache(dir: &Path) -> SledAudioCache {
        SledAudioCache::open(dir.join("audio.sled")).unwrap()
    }

    #[test]
    fn test_store_then_lookup_returns_identical_bytes() {
        let dir = tempdir().unwrap();
        let cache = open_cache(dir.path());

        let audio = vec![0x52, 0x49, 0x46, 0x46, 0x00, 0xFF, 0x7A];
        cache.store("Nice throw!", audio.clone());

        assert_eq!(cache.lookup("Nice throw!"), Some(audio));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_lookup_unknown_text_returns_none() {
        let dir = tempdir().unwrap();
        let cache = open_cache(dir.path());

        assert_eq!(cache.lookup("never stored"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_store_same_text_twice_keeps_latest() {
        let dir = tempdir().unwrap();
        let cache = open_cache(dir.path());

        cache.store("Bullseye!", vec![1, 1, 1]);
        cache.store("Bullseye!", vec![2, 2, 2, 2]);

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.lookup("Bullseye!"), Some(vec![2, 2, 2, 2]));
    }

    #[test]
    fn test_reopen_reloads_persisted_entries() {
        let dir = tempdir().unwrap();
        let audio = vec![9u8; 512];

        {
            let cache = open_cache(dir.path());
            cache.store("Game over!", audio.clone());
            cache.store("Next player!", vec![3, 4, 5]);
            cache.flush().unwrap();
        }

        let reopened = open_cache(dir.path());
        assert_eq!(reopened.len(), 2);
        assert_eq!(reopened.lookup("Game over!"), Some(audio));
        assert_eq!(reopened.lookup("Next player!"), Some(vec![3, 4, 5]));
    }

    #[test]
    fn test_double_open_is_idempotent() {
        let dir = tempdir().unwrap();

        {
            let cache = open_cache(dir.path());
            cache.store("What a comeback!", vec![7; 64]);
            cache.flush().unwrap();
        }

        let first = open_cache(dir.path());
        let size = first.len();
        let hit = first.lookup("What a comeback!");
        drop(first);

        let second = open_cache(dir.path());
        assert_eq!(second.len(), size);
        assert_eq!(second.lookup("What a comeback!"), hit);
    }

    #[test]
    fn test_clear_empties_both_tiers() {
        let dir = tempdir().unwrap();

        {
            let cache = open_cache(dir.path());
            cache.store("one", vec![1]);
            cache.store("two", vec![2]);

            assert_eq!(cache.clear(), 2);
            assert_eq!(cache.len(), 0);
            assert_eq!(cache.lookup("one"), None);
            cache.flush().unwrap();
        }

        // 持久层也被清空: 重新打开后不会装回任何条目
        let reopened = open_cache(dir.path());
        assert_eq!(reopened.len(), 0);
    }

    #[test]
    fn test_clear_on_empty_cache_returns_zero() {
        let dir = tempdir().unwrap();
        let cache = open_cache(dir.path());

        assert_eq!(cache.clear(), 0);
    }

    #[test]
    fn test_corrupt_record_is_skipped_on_load() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("audio.sled");

        {
            let cache = SledAudioCache::open(&db_path).unwrap();
            cache.store("valid entry", vec![42; 16]);
            cache.flush().unwrap();
        }
        {
            // 直接往库里塞一条无法解码的垃圾记录
            let db = sled::open(&db_path).unwrap();
            db.insert(b"bogus-key", b"definitely not bincode".as_slice())
                .unwrap();
            db.flush().unwrap();
        }

        let reopened = SledAudioCache::open(&db_path).unwrap();
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.lookup("valid entry"), Some(vec![42; 16]));
    }

    #[test]
    fn test_unknown_version_record_is_skipped_on_load() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("audio.sled");

        {
            let cache = SledAudioCache::open(&db_path).unwrap();
            cache.store("current version", vec![1, 2, 3]);
            cache.flush().unwrap();
        }
        {
            let future = PersistedEntry {
                version: ENTRY_VERSION + 1,
                key: cache_key_for("from the future"),
                source_text: "from the future".to_string(),
                audio: vec![9, 9, 9],
                created_at: 0,
            };
            let db = sled::open(&db_path).unwrap();
            db.insert(
                future.key.as_bytes(),
                bincode::serialize(&future).unwrap(),
            )
            .unwrap();
            db.flush().unwrap();
        }

        let reopened = SledAudioCache::open(&db_path).unwrap();
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.lookup("from the future"), None);
        assert_eq!(reopened.lookup("current version"), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_persisted_record_retains_source_text() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("audio.sled");
        let text = "Triple twenty! Amazing!";

        {
            let cache = SledAudioCache::open(&db_path).unwrap();
            cache.store(text, vec![0xAB; 8]);
            cache.flush().unwrap();
        }

        let db = sled::open(&db_path).unwrap();
        let raw = db.get(cache_key_for(text).as_bytes()).unwrap().unwrap();
        let entry: PersistedEntry = bincode::deserialize(&raw).unwrap();

        assert_eq!(entry.version, ENTRY_VERSION);
        assert_eq!(entry.key, cache_key_for(text));
        assert_eq!(entry.source_text, text);
        assert_eq!(entry.audio, vec![0xAB; 8]);
    }

    #[test]
    fn test_stats_reports_entry_count_and_path() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("audio.sled");
        let cache = SledAudioCache::open(&db_path).unwrap();

        cache.store("a", vec![1]);
        cache.store("b", vec![2]);

        let stats = cache.stats();
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.storage_path, db_path);
    }
}
