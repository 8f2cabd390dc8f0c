//! 引擎工厂 - 按配置选择合成后端

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::application::ports::{EngineError, SpeechEnginePort};
use crate::config::{EngineConfig, EngineKind, PiperSettings};

use super::fake_engine::{FakeEngine, FakeEngineConfig};
use super::http_engine::{HttpEngine, HttpEngineConfig};
use super::piper_engine::{resolve_binary, PiperEngine, PiperEngineConfig};

/// 消除 auto 之后的确定后端
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResolvedKind {
    Piper,
    Http,
    Fake,
}

/// 根据配置创建合成引擎
///
/// kind = auto 时探测本机能力: piper 可执行文件与音色模型齐备选本地合成，
/// 否则退回远程 HTTP 服务。
pub fn create_engine(config: &EngineConfig) -> Result<Arc<dyn SpeechEnginePort>, EngineError> {
    let kind = resolve_kind(config);
    tracing::info!(kind = ?kind, "Creating speech engine");

    let engine: Arc<dyn SpeechEnginePort> = match kind {
        ResolvedKind::Piper => Arc::new(PiperEngine::new(PiperEngineConfig {
            binary: config.piper.binary.clone(),
            voice: PathBuf::from(&config.piper.voice),
        })?),
        ResolvedKind::Http => Arc::new(HttpEngine::new(
            HttpEngineConfig::new(config.http.base_url.as_str())
                .with_timeout(config.timeout_secs)
                .with_gpu(config.http.gpu),
        )?),
        ResolvedKind::Fake => Arc::new(FakeEngine::new(FakeEngineConfig {
            latency_ms: config.fake.latency_ms,
            ..Default::default()
        })),
    };
    Ok(engine)
}

fn resolve_kind(config: &EngineConfig) -> ResolvedKind {
    match config.kind {
        EngineKind::Piper => ResolvedKind::Piper,
        EngineKind::Http => ResolvedKind::Http,
        EngineKind::Fake => ResolvedKind::Fake,
        EngineKind::Auto => {
            if piper_available(&config.piper) {
                tracing::info!("Auto-detect: piper binary and voice model found, using local synthesis");
                ResolvedKind::Piper
            } else {
                tracing::info!(
                    base_url = %config.http.base_url,
                    "Auto-detect: piper unavailable, falling back to remote synthesis"
                );
                ResolvedKind::Http
            }
        }
    }
}

fn piper_available(piper: &PiperSettings) -> bool {
    resolve_binary(&piper.binary).is_some() && Path::new(&piper.voice).exists()
}
