//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `BARFLY_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `BARFLY_SERVER__HOST=127.0.0.1`
/// - `BARFLY_SERVER__PORT=8080`
/// - `BARFLY_ENGINE__KIND=piper`
/// - `BARFLY_ENGINE__SPEED=0.9`
/// - `BARFLY_CACHE__DIR=/data/cache`
///
/// # 返回
/// - `Ok(AppConfig)` - 成功加载的配置
/// - `Err(ConfigError)` - 加载失败
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 首先设置默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8000)?
        .set_default("engine.kind", "auto")?
        .set_default("engine.speed", 0.95)?
        .set_default("engine.timeout_secs", 120)?
        .set_default("engine.piper.binary", "piper")?
        .set_default("engine.piper.voice", "voices/en_US-lessac-medium.onnx")?
        .set_default("engine.http.base_url", "http://localhost:5002")?
        .set_default("engine.http.gpu", false)?
        .set_default("engine.fake.latency_ms", 25)?
        .set_default("cache.dir", "data/cache")?
        .set_default("cache.pregenerate_on_startup", true)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 添加配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        // 搜索默认配置文件
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 添加环境变量（最高优先级）
    // 前缀: BARFLY_
    // 层级分隔符: __ (双下划线)
    // 例如: BARFLY_ENGINE__HTTP__BASE_URL=http://tts-server:5002
    // 注意: 环境变量名会被转换为小写
    builder = builder.add_source(
        Environment::with_prefix("BARFLY")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    // 4. 构建配置
    let config = builder.build()?;

    // 5. 反序列化为 AppConfig
    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::ParseError(format!("Failed to deserialize config: {}", e)))?;

    // 6. 验证配置
    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    // 验证端口范围
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    // 验证语速范围
    if !(0.8..=1.2).contains(&config.engine.speed) {
        return Err(ConfigError::ValidationError(format!(
            "Engine speed must be within 0.8-1.2, got {}",
            config.engine.speed
        )));
    }

    // 验证合成超时
    if config.engine.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Engine timeout cannot be 0".to_string(),
        ));
    }

    // 验证 piper 配置
    if config.engine.piper.binary.is_empty() {
        return Err(ConfigError::ValidationError(
            "Piper binary cannot be empty".to_string(),
        ));
    }

    // 验证 HTTP 后端 URL
    if config.engine.http.base_url.is_empty() {
        return Err(ConfigError::ValidationError(
            "Engine HTTP base URL cannot be empty".to_string(),
        ));
    }

    // 验证缓存目录
    if config.cache.dir.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "Cache directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Engine Kind: {}", config.engine.kind.as_str());
    tracing::info!("Engine Speed: {}", config.engine.speed);
    tracing::info!("Engine Timeout: {}s", config.engine.timeout_secs);
    tracing::info!("Piper Binary: {}", config.engine.piper.binary);
    tracing::info!("Piper Voice: {}", config.engine.piper.voice);
    tracing::info!("Engine HTTP URL: {}", config.engine.http.base_url);
    tracing::info!("Cache Directory: {:?}", config.cache.dir);
    tracing::info!("Pregenerate On Startup: {}", config.cache.pregenerate_on_startup);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_speed_out_of_range() {
        let mut config = AppConfig::default();
        config.engine.speed = 1.5;
        assert!(validate_config(&config).is_err());

        config.engine.speed = 0.5;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_timeout() {
        let mut config = AppConfig::default();
        config.engine.timeout_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_empty_base_url() {
        let mut config = AppConfig::default();
        config.engine.http.base_url = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_empty_cache_dir() {
        let mut config = AppConfig::default();
        config.cache.dir = std::path::PathBuf::new();
        assert!(validate_config(&config).is_err());
    }
}
