//! Domain Layer - 领域层
//!
//! 醉酒解说员人格：纯文本逻辑，不依赖基础设施

mod persona;

pub use persona::{DrunkPersona, ThrowQuality};
