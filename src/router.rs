use axum::Router;
use tower_http::compression::CompressionLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use crate::cors::build_cors_layer;
use crate::features::{github, health, image, leetcode};
use crate::openapi::ApiDoc;
use crate::request_id::request_id_middleware;
use crate::state::AppState;

fn compression_predicate() -> impl tower_http::compression::predicate::Predicate {
    use tower_http::compression::predicate::{NotForContentType, Predicate, SizeAbove};

    // SVG 属于 image/* 但是文本，仍然压缩；其余图片与流式响应不压缩
    SizeAbove::default()
        .and(NotForContentType::GRPC)
        .and(NotForContentType::IMAGES)
        .and(NotForContentType::SSE)
        .and(NotForContentType::const_new("application/octet-stream"))
}

/// 业务路由（不含前缀与全局中间件）
pub fn api_router() -> Router<AppState> {
    Router::new()
        .merge(health::create_health_router())
        .merge(github::create_github_router())
        .merge(leetcode::create_leetcode_router())
        .merge(image::create_image_router())
}

/// 组装完整应用：前缀路由、Swagger、request_id、CORS 与压缩
pub fn build_app(state: AppState, config: &AppConfig) -> Router {
    let prefix = config.api.prefix.trim_end_matches('/');
    let routes = if prefix.is_empty() {
        api_router()
    } else {
        Router::new().nest(prefix, api_router())
    };

    let mut app = routes
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state);

    if let Some(cors) = build_cors_layer(&config.cors) {
        tracing::info!("CORS 已启用");
        app = app.layer(cors);
    }

    app.layer(CompressionLayer::new().compress_when(compression_predicate()))
        // 最外层：错误响应与日志都能拿到 request_id
        .layer(axum::middleware::from_fn(request_id_middleware))
}
