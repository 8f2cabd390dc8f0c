//! Fake 合成引擎 - 用于测试与本地开发
//!
//! 不做真实合成，按文本长度生成一段静音 WAV。
//! 可配置固定延迟与按子串注入失败，并记录合成调用次数供测试断言
//! （缓存命中不经过引擎，调用次数即未命中次数）。

use async_trait::async_trait;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::application::ports::{EngineError, EngineInfo, SpeechEnginePort};

/// Fake 引擎配置
#[derive(Debug, Clone)]
pub struct FakeEngineConfig {
    /// 模拟合成延迟（毫秒）
    pub latency_ms: u64,
    /// 输出采样率
    pub sample_rate: u32,
    /// 文本包含任一子串时返回合成失败
    pub fail_on: Vec<String>,
}

impl Default for FakeEngineConfig {
    fn default() -> Self {
        Self {
            latency_ms: 25,
            sample_rate: 22050,
            fail_on: Vec::new(),
        }
    }
}

/// Fake 合成引擎
pub struct FakeEngine {
    config: FakeEngineConfig,
    calls: AtomicUsize,
}

impl FakeEngine {
    /// 创建新的 Fake 引擎
    pub fn new(config: FakeEngineConfig) -> Self {
        tracing::info!(
            latency_ms = config.latency_ms,
            sample_rate = config.sample_rate,
            "FakeEngine initialized"
        );
        Self {
            config,
            calls: AtomicUsize::new(0),
        }
    }

    /// 使用默认配置创建
    pub fn with_defaults() -> Self {
        Self::new(FakeEngineConfig::default())
    }

    /// 合成被真正调用的次数
    pub fn synthesis_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// 按文本长度生成一段静音 WAV
    fn render_silence(&self, text: &str) -> Result<Vec<u8>, EngineError> {
        // 每个字符折算 60ms 静音，下限半秒
        let millis = (text.chars().count() as u64 * 60).max(500);
        let samples = self.config.sample_rate as u64 * millis / 1000;

        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: self.config.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec)
                .map_err(|e| EngineError::SynthesisFailed(e.to_string()))?;
            for _ in 0..samples {
                writer
                    .write_sample(0i16)
                    .map_err(|e| EngineError::SynthesisFailed(e.to_string()))?;
            }
            writer
                .finalize()
                .map_err(|e| EngineError::SynthesisFailed(e.to_string()))?;
        }
        Ok(cursor.into_inner())
    }
}

#[async_trait]
impl SpeechEnginePort for FakeEngine {
    async fn synthesize(&self, text: &str, speed: f32) -> Result<Vec<u8>, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.config.latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.latency_ms)).await;
        }

        if let Some(needle) = self
            .config
            .fail_on
            .iter()
            .find(|needle| text.contains(needle.as_str()))
        {
            return Err(EngineError::SynthesisFailed(format!(
                "injected failure on '{}'",
                needle
            )));
        }

        tracing::debug!(text_len = text.len(), speed, "FakeEngine: rendering silence");
        self.render_silence(text)
    }

    fn is_accelerated(&self) -> bool {
        false
    }

    fn describe(&self) -> EngineInfo {
        EngineInfo {
            engine: "fake",
            model: "silence".to_string(),
            device: "cpu".to_string(),
            sample_rate: Some(self.config.sample_rate),
        }
    }
}
