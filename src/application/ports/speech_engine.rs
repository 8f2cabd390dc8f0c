//! Speech Engine Port - 语音合成引擎抽象
//!
//! 定义语音合成的抽象接口，具体后端在 infrastructure/adapters 层
//! （Piper 本地进程、远程 HTTP 服务、测试用 Fake）

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// 合成引擎错误
#[derive(Debug, Error)]
pub enum EngineError {
    /// 后端不可达（远程服务连不上、本地二进制缺失等）
    #[error("Engine unavailable: {0}")]
    Unavailable(String),

    /// 合成请求超时
    #[error("Synthesis timed out")]
    Timeout,

    /// 后端报告的合成失败
    #[error("Synthesis failed: {0}")]
    SynthesisFailed(String),

    /// 后端返回了无法解析的内容
    #[error("Invalid engine response: {0}")]
    InvalidResponse(String),
}

/// 引擎描述信息（/health 里原样上报）
#[derive(Debug, Clone, Serialize)]
pub struct EngineInfo {
    /// 引擎标识（piper / http / fake）
    pub engine: &'static str,
    /// 模型或服务标识
    pub model: String,
    /// 运行设备描述
    pub device: String,
    /// 输出采样率（若已知）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,
}

/// Speech Engine Port
///
/// 外部语音合成能力的抽象接口。合成可能耗时数秒，也可能失败；
/// 超时由编排层统一施加，后端只需在自身 IO 上尽早报错
#[async_trait]
pub trait SpeechEnginePort: Send + Sync {
    /// 将文本合成为 WAV 音频字节
    ///
    /// `speed` 为语速（0.8-1.2，越低越拖沓，醉汉语感用低值）
    async fn synthesize(&self, text: &str, speed: f32) -> Result<Vec<u8>, EngineError>;

    /// 是否运行在加速硬件上（GPU / NPU）
    fn is_accelerated(&self) -> bool;

    /// 引擎自描述，用于健康上报
    fn describe(&self) -> EngineInfo;

    /// 检查引擎是否可用
    async fn health_check(&self) -> bool {
        true // 默认实现
    }
}
