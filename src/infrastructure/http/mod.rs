//! HTTP 基础设施层
//!
//! axum 路由、处理器、中间件与服务器装配

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use error::{ApiError, ErrorResponse};
pub use routes::create_routes;
pub use server::{HttpServer, ServerConfig};
pub use state::AppState;
