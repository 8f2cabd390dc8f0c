//! 合成引擎适配器
//!
//! SpeechEnginePort 的各后端实现与选择工厂

mod factory;
mod fake_engine;
mod http_engine;
mod piper_engine;

pub use factory::create_engine;
pub use fake_engine::{FakeEngine, FakeEngineConfig};
pub use http_engine::{HttpEngine, HttpEngineConfig};
pub use piper_engine::{PiperEngine, PiperEngineConfig};
