//! Barfly - 醉酒飞镖解说 TTS 服务
//!
//! 本地局域网服务：计分板把解说词发过来，这里变换成醉汉口吻、
//! 合成音频并缓存。启动流程：配置 -> 引擎 -> 缓存 -> 预热 -> HTTP

use std::sync::Arc;
use std::time::Duration;

use barfly::config::{load_config, print_config};
use barfly::domain::DrunkPersona;
use barfly::infrastructure::adapters::create_engine;
use barfly::infrastructure::http::{AppState, HttpServer, ServerConfig};
use barfly::infrastructure::persistence::sled::SledAudioCache;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!(
        "{},barfly={},tower_http=debug",
        config.log.level, config.log.level
    );
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));
    if config.log.json {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    tracing::info!("Barfly - drunk darts commentator TTS");
    print_config(&config);

    // 确保缓存目录存在
    tokio::fs::create_dir_all(&config.cache.dir).await?;

    // 创建合成引擎（auto 模式按本地 Piper 可用性回退到远程 HTTP）
    let engine = create_engine(&config.engine)
        .map_err(|e| anyhow::anyhow!("Failed to initialize speech engine: {}", e))?;

    // 打开两级音频缓存，持久层在此全量载入内存
    let audio_cache = SledAudioCache::open(config.cache.db_path())
        .map_err(|e| anyhow::anyhow!("Failed to open audio cache: {}", e))?
        .arc();

    // 装配应用状态
    let state = AppState::new(
        audio_cache,
        engine,
        Arc::new(DrunkPersona::new()),
        config.engine.speed,
        Duration::from_secs(config.engine.timeout_secs),
    )
    .arc();

    // 预热常用短语：开局头几句不该等合成
    if config.cache.pregenerate_on_startup {
        tracing::info!("Pre-generating common phrases...");
        state.pregenerate_handler.pregenerate_common().await;
    }

    // 创建 HTTP 服务器
    let server_config = ServerConfig::new(&config.server.host, config.server.port);
    let server = HttpServer::new(server_config, state);

    tracing::info!("Starting HTTP server...");

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to listen for ctrl-c");
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
