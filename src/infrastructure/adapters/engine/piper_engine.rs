//! Piper 合成引擎 - 本地命令行合成
//!
//! 实现 SpeechEnginePort trait，调用本机 piper 可执行文件:
//! 文本写入子进程 stdin，WAV 写到临时文件后读回。
//!
//! 语速通过 piper 的 length_scale 表达（与语速成反比）；
//! 子进程启用 kill_on_drop，上层超时放弃后子进程随之被回收。

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::application::ports::{EngineError, EngineInfo, SpeechEnginePort};

/// Piper 引擎配置
#[derive(Debug, Clone)]
pub struct PiperEngineConfig {
    /// piper 可执行文件（文件路径或 PATH 中的命令名）
    pub binary: String,
    /// 音色模型文件（onnx）
    pub voice: PathBuf,
}

/// Piper 合成引擎
pub struct PiperEngine {
    /// 解析后的可执行文件路径
    binary_path: PathBuf,
    config: PiperEngineConfig,
}

impl PiperEngine {
    /// 创建新的 Piper 引擎
    ///
    /// 构造时即校验可执行文件与音色模型都存在，
    /// 避免配置错误到第一个请求才暴露。
    pub fn new(config: PiperEngineConfig) -> Result<Self, EngineError> {
        let binary_path = resolve_binary(&config.binary).ok_or_else(|| {
            EngineError::Unavailable(format!("piper binary not found: {}", config.binary))
        })?;
        if !config.voice.exists() {
            return Err(EngineError::Unavailable(format!(
                "piper voice model not found: {}",
                config.voice.display()
            )));
        }

        tracing::info!(
            binary = %binary_path.display(),
            voice = %config.voice.display(),
            "PiperEngine initialized"
        );
        Ok(Self {
            binary_path,
            config,
        })
    }

    /// 生成本次合成的临时输出路径
    fn scratch_wav_path() -> PathBuf {
        static SEQ: AtomicU64 = AtomicU64::new(0);
        let n = SEQ.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir().join(format!("barfly_piper_{}_{}.wav", std::process::id(), n))
    }
}

/// piper 的 length_scale 与语速成反比
fn length_scale_for(speed: f32) -> f32 {
    (1.0 / speed).clamp(0.5, 2.0)
}

/// 在 PATH 中查找可执行文件；带路径分隔符的输入按字面路径处理
pub(super) fn resolve_binary(bin: &str) -> Option<PathBuf> {
    if bin.contains(std::path::MAIN_SEPARATOR) {
        let p = PathBuf::from(bin);
        return if p.exists() { Some(p) } else { None };
    }

    if let Some(paths) = std::env::var_os("PATH") {
        for dir in std::env::split_paths(&paths) {
            let candidate = dir.join(bin);
            if candidate.exists() {
                return Some(candidate);
            }
        }
    }
    None
}

#[async_trait]
impl SpeechEnginePort for PiperEngine {
    async fn synthesize(&self, text: &str, speed: f32) -> Result<Vec<u8>, EngineError> {
        let out_path = Self::scratch_wav_path();
        let length_scale = length_scale_for(speed);

        tracing::debug!(
            text_len = text.len(),
            length_scale,
            out = %out_path.display(),
            "Running piper"
        );

        let mut child = Command::new(&self.binary_path)
            .arg("--model")
            .arg(&self.config.voice)
            .arg("--output_file")
            .arg(&out_path)
            .arg("--length_scale")
            .arg(format!("{:.2}", length_scale))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| EngineError::Unavailable(format!("Failed to spawn piper: {}", e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).await.map_err(|e| {
                EngineError::SynthesisFailed(format!("Failed to write text to piper: {}", e))
            })?;
            // stdin 在此关闭，piper 读到 EOF 才开始合成
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| EngineError::SynthesisFailed(e.to_string()))?;
        if !output.status.success() {
            let _ = tokio::fs::remove_file(&out_path).await;
            return Err(EngineError::SynthesisFailed(format!(
                "piper exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr)
            )));
        }

        let audio = tokio::fs::read(&out_path)
            .await
            .map_err(|e| EngineError::InvalidResponse(format!("Failed to read piper output: {}", e)))?;
        if let Err(e) = tokio::fs::remove_file(&out_path).await {
            tracing::warn!(path = %out_path.display(), error = %e, "Failed to remove scratch wav");
        }
        if audio.is_empty() {
            return Err(EngineError::InvalidResponse(
                "piper produced an empty wav".to_string(),
            ));
        }

        tracing::info!(audio_size = audio.len(), length_scale, "Local synthesis completed");
        Ok(audio)
    }

    fn is_accelerated(&self) -> bool {
        false
    }

    fn describe(&self) -> EngineInfo {
        let model = self
            .config
            .voice
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string();
        EngineInfo {
            engine: "piper",
            model,
            device: "cpu".to_string(),
            sample_rate: None,
        }
    }

    async fn health_check(&self) -> bool {
        self.binary_path.exists() && self.config.voice.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_scale_inverts_speed() {
        assert_eq!(length_scale_for(1.0), 1.0);
        assert!((length_scale_for(0.95) - 1.0526).abs() < 1e-3);
        assert!((length_scale_for(1.2) - 0.8333).abs() < 1e-3);
    }

    #[test]
    fn test_length_scale_is_clamped() {
        assert_eq!(length_scale_for(0.1), 2.0);
        assert_eq!(length_scale_for(10.0), 0.5);
    }

    #[test]
    fn test_resolve_binary_rejects_bogus_name() {
        assert!(resolve_binary("barfly-test-binary-does-not-exist").is_none());
    }

    #[test]
    fn test_resolve_binary_accepts_literal_path() {
        let exe = std::env::current_exe().unwrap();
        let resolved = resolve_binary(exe.to_str().unwrap());
        assert_eq!(resolved, Some(exe));
    }

    #[test]
    fn test_missing_binary_is_rejected() {
        let result = PiperEngine::new(PiperEngineConfig {
            binary: "barfly-test-binary-does-not-exist".to_string(),
            voice: PathBuf::from("voice.onnx"),
        });
        assert!(matches!(result, Err(EngineError::Unavailable(_))));
    }

    #[test]
    fn test_missing_voice_is_rejected() {
        // 用测试自身的可执行文件充当存在的二进制
        let exe = std::env::current_exe().unwrap();
        let result = PiperEngine::new(PiperEngineConfig {
            binary: exe.to_string_lossy().to_string(),
            voice: PathBuf::from("/nonexistent/voice.onnx"),
        });
        assert!(matches!(result, Err(EngineError::Unavailable(_))));
    }
}
