//! Speech Commands - 解说生成相关命令

use crate::domain::ThrowQuality;

/// 生成单条解说音频命令
#[derive(Debug, Clone)]
pub struct GenerateCommentary {
    /// 解说文本（缓存键按此原始文本计算）
    pub text: String,
    /// 本次投掷的质量标签
    pub quality: Option<ThrowQuality>,
    /// 是否套用醉酒解说员风格
    pub use_persona: bool,
}

/// 生成响应
#[derive(Debug, Clone)]
pub struct GeneratedAudio {
    /// WAV 音频字节
    pub audio: Vec<u8>,
    /// 是否直接取自缓存
    pub cache_hit: bool,
}

/// 批量预生成命令
#[derive(Debug, Clone)]
pub struct PregenerateBatch {
    pub items: Vec<PregenerateItem>,
}

/// 单条预生成条目
#[derive(Debug, Clone)]
pub struct PregenerateItem {
    pub text: String,
    pub quality: Option<ThrowQuality>,
}

/// 单条预生成结果状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PregenerateStatus {
    /// 已在缓存中
    Cached,
    /// 新合成并写入缓存
    Generated,
    /// 合成失败
    Failed,
}

impl PregenerateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PregenerateStatus::Cached => "cached",
            PregenerateStatus::Generated => "generated",
            PregenerateStatus::Failed => "failed",
        }
    }
}

/// 单条预生成结果
#[derive(Debug, Clone)]
pub struct PregenerateResult {
    pub text: String,
    pub status: PregenerateStatus,
    pub error: Option<String>,
}

/// 批量预生成响应
#[derive(Debug, Clone)]
pub struct PregenerateReport {
    /// 逐条结果，顺序与请求一致（空白条目除外）
    pub results: Vec<PregenerateResult>,
    /// 完成后缓存中的条目总数
    pub total_cached: usize,
}
