//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod audio_cache;
mod speech_engine;

pub use audio_cache::{cache_key_for, AudioCachePort, CacheError, CacheStats};
pub use speech_engine::{EngineError, EngineInfo, SpeechEnginePort};
