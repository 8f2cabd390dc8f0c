//! Speech Command Handlers - 生成编排
//!
//! 单条生成与批量预生成共用同一套请求策略:
//! 查缓存 → (可选)风格增强 → 合成 → 按原始文本入缓存。
//!
//! 不变量:
//! - 缓存命中绝不触发合成
//! - 缓存键永远按原始文本计算，增强后的文本只进引擎
//! - 同一键同一时刻至多一次在途合成（并发未命中被合并）
//! - 合成失败/超时不写缓存，也不在内部重试

use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::application::commands::cache_commands::*;
use crate::application::commands::speech_commands::*;
use crate::application::error::GenerationError;
use crate::application::ports::{cache_key_for, AudioCachePort, SpeechEnginePort};
use crate::domain::DrunkPersona;

/// 常用解说词，启动时预生成
const COMMON_PHRASES: &[&str] = &[
    "Nice throw!",
    "Ohhh, that's a miss!",
    "Triple twenty! Amazing!",
    "Bullseye! Holy shit!",
    "You suck at this!",
    "Are you even trying?",
    "*burps* Sorry about that...",
    "Next player!",
    "Game over!",
    "What a comeback!",
];

/// 日志预览: 只取前 50 个字符
fn preview(text: &str) -> String {
    if text.chars().count() > 50 {
        let head: String = text.chars().take(50).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

/// GenerateCommentary Handler - 生成单条解说音频
pub struct GenerateCommentaryHandler {
    cache: Arc<dyn AudioCachePort>,
    engine: Arc<dyn SpeechEnginePort>,
    persona: Arc<DrunkPersona>,
    /// 语速，来自配置（0.8-1.2）
    speed: f32,
    /// 单次合成超时
    synthesis_timeout: Duration,
    /// 每个缓存键一把在途锁；解说词表有限，条目常驻不回收
    in_flight: DashMap<String, Arc<Mutex<()>>>,
}

impl GenerateCommentaryHandler {
    pub fn new(
        cache: Arc<dyn AudioCachePort>,
        engine: Arc<dyn SpeechEnginePort>,
        persona: Arc<DrunkPersona>,
        speed: f32,
        synthesis_timeout: Duration,
    ) -> Self {
        Self {
            cache,
            engine,
            persona,
            speed,
            synthesis_timeout,
            in_flight: DashMap::new(),
        }
    }

    pub async fn handle(&self, cmd: GenerateCommentary) -> Result<GeneratedAudio, GenerationError> {
        if cmd.text.trim().is_empty() {
            return Err(GenerationError::EmptyText);
        }

        // 快路径: 无锁查缓存
        if let Some(audio) = self.cache.lookup(&cmd.text) {
            tracing::info!(text = %preview(&cmd.text), "Cache hit");
            return Ok(GeneratedAudio {
                audio,
                cache_hit: true,
            });
        }

        // 同一键只允许一次在途合成，其余请求在锁上排队
        let lock = self
            .in_flight
            .entry(cache_key_for(&cmd.text))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        // 拿到锁后复查: 先行者已写入则按命中返回
        if let Some(audio) = self.cache.lookup(&cmd.text) {
            tracing::info!(text = %preview(&cmd.text), "Cache hit after coalescing");
            return Ok(GeneratedAudio {
                audio,
                cache_hit: true,
            });
        }

        let speech_text = if cmd.use_persona {
            self.persona.enhance(&cmd.text, cmd.quality)
        } else {
            cmd.text.clone()
        };

        tracing::info!(
            text = %preview(&cmd.text),
            speech = %preview(&speech_text),
            quality = ?cmd.quality,
            "Generating commentary"
        );

        let audio = match tokio::time::timeout(
            self.synthesis_timeout,
            self.engine.synthesize(&speech_text, self.speed),
        )
        .await
        {
            Ok(Ok(audio)) => audio,
            Ok(Err(e)) => {
                tracing::error!(text = %preview(&cmd.text), error = %e, "Synthesis failed");
                return Err(GenerationError::Engine(e));
            }
            Err(_) => {
                tracing::error!(
                    text = %preview(&cmd.text),
                    timeout_secs = self.synthesis_timeout.as_secs(),
                    "Synthesis timed out"
                );
                return Err(GenerationError::Timeout(self.synthesis_timeout.as_secs()));
            }
        };

        // 按原始文本入缓存，而不是增强后的文本
        self.cache.store(&cmd.text, audio.clone());

        Ok(GeneratedAudio {
            audio,
            cache_hit: false,
        })
    }
}

/// PregenerateBatch Handler - 批量预生成
///
/// 逐条套用单条生成策略，单条失败不中断后续条目。
pub struct PregenerateBatchHandler {
    generator: Arc<GenerateCommentaryHandler>,
    cache: Arc<dyn AudioCachePort>,
}

impl PregenerateBatchHandler {
    pub fn new(generator: Arc<GenerateCommentaryHandler>, cache: Arc<dyn AudioCachePort>) -> Self {
        Self { generator, cache }
    }

    pub async fn handle(&self, cmd: PregenerateBatch) -> PregenerateReport {
        let mut results = Vec::with_capacity(cmd.items.len());

        for item in cmd.items {
            // 空白条目跳过
            if item.text.trim().is_empty() {
                continue;
            }

            let outcome = self
                .generator
                .handle(GenerateCommentary {
                    text: item.text.clone(),
                    quality: item.quality,
                    use_persona: true,
                })
                .await;

            let result = match outcome {
                Ok(GeneratedAudio {
                    cache_hit: true, ..
                }) => PregenerateResult {
                    text: item.text,
                    status: PregenerateStatus::Cached,
                    error: None,
                },
                Ok(GeneratedAudio {
                    cache_hit: false, ..
                }) => {
                    tracing::info!(text = %preview(&item.text), "Pre-generated");
                    PregenerateResult {
                        text: item.text,
                        status: PregenerateStatus::Generated,
                        error: None,
                    }
                }
                Err(e) => {
                    tracing::error!(text = %preview(&item.text), error = %e, "Failed to pre-generate");
                    PregenerateResult {
                        text: item.text,
                        status: PregenerateStatus::Failed,
                        error: Some(e.to_string()),
                    }
                }
            };
            results.push(result);
        }

        PregenerateReport {
            results,
            total_cached: self.cache.len(),
        }
    }

    /// 启动时预生成常用解说词
    pub async fn pregenerate_common(&self) -> PregenerateReport {
        let items = COMMON_PHRASES
            .iter()
            .map(|phrase| PregenerateItem {
                text: phrase.to_string(),
                quality: None,
            })
            .collect();

        let report = self.handle(PregenerateBatch { items }).await;

        let generated = report
            .results
            .iter()
            .filter(|r| r.status == PregenerateStatus::Generated)
            .count();
        let already_cached = report
            .results
            .iter()
            .filter(|r| r.status == PregenerateStatus::Cached)
            .count();
        tracing::info!(generated, already_cached, "Common phrase warm-up finished");

        report
    }
}

/// ClearCache Handler - 清空两级缓存
pub struct ClearCacheHandler {
    cache: Arc<dyn AudioCachePort>,
}

impl ClearCacheHandler {
    pub fn new(cache: Arc<dyn AudioCachePort>) -> Self {
        Self { cache }
    }

    pub fn handle(&self, _cmd: ClearCache) -> ClearedCache {
        let removed = self.cache.clear();
        ClearedCache { removed }
    }
}
