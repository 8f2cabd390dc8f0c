//! HTTP 合成引擎 - 调用外部 TTS HTTP 服务
//!
//! 实现 SpeechEnginePort trait，把合成请求转发给远端服务
//!
//! 外部 API:
//! POST {base_url}/api/tts
//! Request: {"text": "...", "speed": 0.95}  (JSON)
//! Response: audio/wav binary

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use crate::application::ports::{EngineError, EngineInfo, SpeechEnginePort};

/// 合成请求体 (JSON)
#[derive(Debug, Serialize)]
struct SynthesisRequest {
    /// 要合成的文本
    text: String,
    /// 语速（0.8-1.2）
    speed: f32,
}

/// HTTP 合成引擎配置
#[derive(Debug, Clone)]
pub struct HttpEngineConfig {
    /// 合成服务基础 URL
    pub base_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    /// 远端是否为 GPU 实例
    pub gpu: bool,
}

impl Default for HttpEngineConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5002".to_string(),
            timeout_secs: 120,
            gpu: false,
        }
    }
}

impl HttpEngineConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_gpu(mut self, gpu: bool) -> Self {
        self.gpu = gpu;
        self
    }
}

/// HTTP 合成引擎
///
/// 通过 HTTP 调用外部合成服务
pub struct HttpEngine {
    client: Client,
    config: HttpEngineConfig,
}

impl HttpEngine {
    /// 创建新的 HTTP 合成引擎
    pub fn new(config: HttpEngineConfig) -> Result<Self, EngineError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| EngineError::Unavailable(e.to_string()))?;

        tracing::info!(base_url = %config.base_url, gpu = config.gpu, "HttpEngine initialized");
        Ok(Self { client, config })
    }

    /// 使用默认配置创建引擎
    pub fn with_default_config() -> Result<Self, EngineError> {
        Self::new(HttpEngineConfig::default())
    }

    /// 获取合成 URL
    fn synthesize_url(&self) -> String {
        format!("{}/api/tts", self.config.base_url)
    }

    /// 获取健康检查 URL
    fn health_url(&self) -> String {
        format!("{}/health", self.config.base_url)
    }
}

#[async_trait]
impl SpeechEnginePort for HttpEngine {
    async fn synthesize(&self, text: &str, speed: f32) -> Result<Vec<u8>, EngineError> {
        let request = SynthesisRequest {
            text: text.to_string(),
            speed,
        };

        tracing::debug!(
            url = %self.synthesize_url(),
            text_len = request.text.len(),
            speed,
            "Sending synthesis request"
        );

        let response = self
            .client
            .post(&self.synthesize_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EngineError::Timeout
                } else if e.is_connect() {
                    EngineError::Unavailable(format!("Cannot connect to synthesis service: {}", e))
                } else {
                    EngineError::Unavailable(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(EngineError::SynthesisFailed(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        // 直接获取音频字节
        let audio = response
            .bytes()
            .await
            .map_err(|e| EngineError::InvalidResponse(format!("Failed to read audio: {}", e)))?
            .to_vec();

        if audio.is_empty() {
            return Err(EngineError::InvalidResponse(
                "Synthesis service returned an empty body".to_string(),
            ));
        }

        tracing::info!(audio_size = audio.len(), "Remote synthesis completed");
        Ok(audio)
    }

    fn is_accelerated(&self) -> bool {
        self.config.gpu
    }

    fn describe(&self) -> EngineInfo {
        EngineInfo {
            engine: "http",
            model: self.config.base_url.clone(),
            device: if self.config.gpu { "cuda" } else { "cpu" }.to_string(),
            sample_rate: None,
        }
    }

    async fn health_check(&self) -> bool {
        match self
            .client
            .get(&self.health_url())
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}
