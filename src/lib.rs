//! Barfly - 醉酒飞镖解说 TTS 服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Persona: 醉酒解说员文本变换
//!
//! 应用层 (application/):
//! - Ports: 端口定义（AudioCache, SpeechEngine）
//! - Commands: 生成解说、批量预热、清空缓存
//! - Queries: 缓存统计
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API
//! - Persistence: Sled 两级音频缓存（内存 + 持久）
//! - Adapters: Piper / HTTP / Fake 合成引擎与选择工厂

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
