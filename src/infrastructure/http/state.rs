//! Application State - 依赖注入容器
//!
//! 在启动时装配一次：端口适配器进来，命令/查询处理器出去。
//! 处理器之间共享同一份端口实例（Arc），路由层只拿 AppState

use std::sync::Arc;
use std::time::Duration;

use crate::application::{
    AudioCachePort, ClearCacheHandler, GenerateCommentaryHandler, GetCacheStatsHandler,
    PregenerateBatchHandler, SpeechEnginePort,
};
use crate::domain::DrunkPersona;

/// 应用状态，持有所有端口与处理器
pub struct AppState {
    // === Ports ===
    pub audio_cache: Arc<dyn AudioCachePort>,
    pub engine: Arc<dyn SpeechEnginePort>,

    // === Command Handlers ===
    pub generate_handler: Arc<GenerateCommentaryHandler>,
    pub pregenerate_handler: PregenerateBatchHandler,
    pub clear_cache_handler: ClearCacheHandler,

    // === Query Handlers ===
    pub cache_stats_handler: GetCacheStatsHandler,
}

impl AppState {
    pub fn new(
        audio_cache: Arc<dyn AudioCachePort>,
        engine: Arc<dyn SpeechEnginePort>,
        persona: Arc<DrunkPersona>,
        speed: f32,
        synthesis_timeout: Duration,
    ) -> Self {
        let generate_handler = Arc::new(GenerateCommentaryHandler::new(
            audio_cache.clone(),
            engine.clone(),
            persona,
            speed,
            synthesis_timeout,
        ));

        let pregenerate_handler =
            PregenerateBatchHandler::new(generate_handler.clone(), audio_cache.clone());
        let clear_cache_handler = ClearCacheHandler::new(audio_cache.clone());
        let cache_stats_handler = GetCacheStatsHandler::new(audio_cache.clone());

        Self {
            audio_cache,
            engine,
            generate_handler,
            pregenerate_handler,
            clear_cache_handler,
            cache_stats_handler,
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}
