/// 统一错误处理模块
pub mod error;

/// 配置模块
pub mod config;

/// 功能聚合模块
pub mod features;

/// 应用状态聚合模块
pub mod state;

/// 统一成功响应体
pub mod response;

/// 路由与全局中间件组装
pub mod router;

/// OpenAPI 文档
pub mod openapi;

/// CORS 中间件
pub mod cors;

/// 请求追踪 ID
pub mod request_id;

/// 优雅退出管理模块
pub mod shutdown;

// 导出常用类型供外部使用
pub use config::AppConfig;
pub use error::{AppError, UpstreamError};
pub use router::build_app;
pub use shutdown::{ShutdownManager, ShutdownReason};
pub use state::AppState;
