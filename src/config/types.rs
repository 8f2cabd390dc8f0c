//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

/// 应用主配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 合成引擎配置
    #[serde(default)]
    pub engine: EngineConfig,

    /// 音频缓存配置
    #[serde(default)]
    pub cache: CacheConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            engine: EngineConfig::default(),
            cache: CacheConfig::default(),
            log: LogConfig::default(),
        }
    }
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 合成后端类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// 按本机能力自动选择
    Auto,
    /// 本地 piper 命令行合成
    Piper,
    /// 远程 HTTP 合成服务
    Http,
    /// 测试/开发用假引擎
    Fake,
}

impl EngineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineKind::Auto => "auto",
            EngineKind::Piper => "piper",
            EngineKind::Http => "http",
            EngineKind::Fake => "fake",
        }
    }
}

impl Default for EngineKind {
    fn default() -> Self {
        EngineKind::Auto
    }
}

/// 合成引擎配置
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// 后端选择
    #[serde(default)]
    pub kind: EngineKind,

    /// 语速（0.8-1.2，越低越醉态）
    #[serde(default = "default_speed")]
    pub speed: f32,

    /// 单次合成超时（秒）
    #[serde(default = "default_engine_timeout")]
    pub timeout_secs: u64,

    /// piper 后端配置
    #[serde(default)]
    pub piper: PiperSettings,

    /// HTTP 后端配置
    #[serde(default)]
    pub http: HttpSettings,

    /// Fake 后端配置
    #[serde(default)]
    pub fake: FakeSettings,
}

fn default_speed() -> f32 {
    0.95
}

fn default_engine_timeout() -> u64 {
    120
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            kind: EngineKind::default(),
            speed: default_speed(),
            timeout_secs: default_engine_timeout(),
            piper: PiperSettings::default(),
            http: HttpSettings::default(),
            fake: FakeSettings::default(),
        }
    }
}

/// piper 命令行后端配置
#[derive(Debug, Clone, Deserialize)]
pub struct PiperSettings {
    /// piper 可执行文件（文件路径或 PATH 中的命令名）
    #[serde(default = "default_piper_binary")]
    pub binary: String,

    /// 音色模型文件（onnx）
    #[serde(default = "default_piper_voice")]
    pub voice: String,
}

fn default_piper_binary() -> String {
    "piper".to_string()
}

fn default_piper_voice() -> String {
    "voices/en_US-lessac-medium.onnx".to_string()
}

impl Default for PiperSettings {
    fn default() -> Self {
        Self {
            binary: default_piper_binary(),
            voice: default_piper_voice(),
        }
    }
}

/// HTTP 合成后端配置
#[derive(Debug, Clone, Deserialize)]
pub struct HttpSettings {
    /// 合成服务基础 URL
    #[serde(default = "default_http_base_url")]
    pub base_url: String,

    /// 远端是否为 GPU 实例（只影响健康报告）
    #[serde(default)]
    pub gpu: bool,
}

fn default_http_base_url() -> String {
    "http://localhost:5002".to_string()
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            base_url: default_http_base_url(),
            gpu: false,
        }
    }
}

/// Fake 合成后端配置
#[derive(Debug, Clone, Deserialize)]
pub struct FakeSettings {
    /// 模拟合成延迟（毫秒）
    #[serde(default = "default_fake_latency")]
    pub latency_ms: u64,
}

fn default_fake_latency() -> u64 {
    25
}

impl Default for FakeSettings {
    fn default() -> Self {
        Self {
            latency_ms: default_fake_latency(),
        }
    }
}

/// 音频缓存配置
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// 缓存目录
    #[serde(default = "default_cache_dir")]
    pub dir: PathBuf,

    /// 启动时预生成常用解说词
    #[serde(default = "default_pregenerate")]
    pub pregenerate_on_startup: bool,
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("data/cache")
}

fn default_pregenerate() -> bool {
    true
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
            pregenerate_on_startup: default_pregenerate(),
        }
    }
}

impl CacheConfig {
    /// 获取 sled 数据库路径
    pub fn db_path(&self) -> PathBuf {
        self.dir.join("audio.sled")
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.engine.kind, EngineKind::Auto);
        assert_eq!(config.engine.speed, 0.95);
        assert_eq!(config.cache.dir, PathBuf::from("data/cache"));
        assert!(config.cache.pregenerate_on_startup);
    }

    #[test]
    fn test_server_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.addr(), "0.0.0.0:8000");
    }

    #[test]
    fn test_cache_db_path() {
        let config = CacheConfig::default();
        assert_eq!(config.db_path(), PathBuf::from("data/cache/audio.sled"));
    }

    #[test]
    fn test_engine_kind_parses_lowercase() {
        let kind: EngineKind = serde_json::from_str("\"piper\"").unwrap();
        assert_eq!(kind, EngineKind::Piper);
        assert_eq!(kind.as_str(), "piper");
    }
}
