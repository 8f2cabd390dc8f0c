//! 应用层错误定义
//!
//! 生成编排过程的统一错误类型

use thiserror::Error;

use crate::application::ports::EngineError;

/// 生成编排错误
#[derive(Debug, Error)]
pub enum GenerationError {
    /// 输入文本为空
    #[error("Text cannot be empty")]
    EmptyText,

    /// 合成超时
    #[error("Synthesis timed out after {0}s")]
    Timeout(u64),

    /// 合成失败
    #[error("Synthesis failed: {0}")]
    Engine(#[from] EngineError),
}
