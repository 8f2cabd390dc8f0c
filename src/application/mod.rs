//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（AudioCache、SpeechEngine）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    // Cache commands
    ClearCache,
    ClearedCache,
    // Speech commands
    GenerateCommentary,
    GeneratedAudio,
    PregenerateBatch,
    PregenerateItem,
    PregenerateReport,
    PregenerateResult,
    PregenerateStatus,
    // Handlers
    handlers::{ClearCacheHandler, GenerateCommentaryHandler, PregenerateBatchHandler},
};

pub use error::GenerationError;

pub use ports::{
    // Audio cache
    cache_key_for,
    AudioCachePort,
    CacheError,
    CacheStats,
    // Speech engine
    EngineError,
    EngineInfo,
    SpeechEnginePort,
};

pub use queries::{
    // Cache queries
    CacheStatsView,
    GetCacheStats,
    // Handlers
    handlers::GetCacheStatsHandler,
};
