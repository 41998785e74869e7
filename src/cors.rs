use std::time::Duration;

use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::config::CorsConfig;

/// 配置列表的解析结果：`*` 表示任意，其余为逐项解析成功的值
enum Allowed<T> {
    Any,
    List(Vec<T>),
}

fn parse_list<T>(
    label: &str,
    values: &[String],
    parse: impl Fn(&str) -> Option<T>,
) -> Allowed<T> {
    let mut out = Vec::new();
    for raw in values {
        let value = raw.trim();
        if value.is_empty() {
            continue;
        }
        if value == "*" {
            return Allowed::Any;
        }
        match parse(value) {
            Some(v) => out.push(v),
            None => tracing::warn!("CORS {} 含无效值: {}", label, value),
        }
    }
    Allowed::List(out)
}

/// 根据配置构建 CORS 中间件；未启用或没有可用 Origin 时返回 `None`。
///
/// 徽章通常被嵌入第三方页面，只需要简单 GET，因此不支持携带凭据。
pub fn build_cors_layer(cors: &CorsConfig) -> Option<CorsLayer> {
    if !cors.enabled {
        return None;
    }

    let origins = match parse_list("allowed_origins", &cors.allowed_origins, |v| {
        HeaderValue::from_str(v).ok()
    }) {
        Allowed::Any => AllowOrigin::any(),
        Allowed::List(list) if list.is_empty() => {
            tracing::warn!("CORS 已启用但 allowed_origins 为空，已跳过启用");
            return None;
        }
        Allowed::List(list) => AllowOrigin::list(list),
    };

    let methods = match parse_list("allowed_methods", &cors.allowed_methods, |v| {
        Method::from_bytes(v.to_ascii_uppercase().as_bytes()).ok()
    }) {
        Allowed::Any => AllowMethods::any(),
        // 未配置时只放行只读方法
        Allowed::List(list) if list.is_empty() => {
            AllowMethods::list([Method::GET, Method::HEAD])
        }
        Allowed::List(list) => AllowMethods::list(list),
    };

    let headers = match parse_list("allowed_headers", &cors.allowed_headers, |v| {
        HeaderName::from_bytes(v.to_ascii_lowercase().as_bytes()).ok()
    }) {
        Allowed::Any => AllowHeaders::any(),
        Allowed::List(list) => AllowHeaders::list(list),
    };

    let mut layer = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(methods)
        .allow_headers(headers);

    if let Some(secs) = cors.max_age_secs
        && secs > 0
    {
        layer = layer.max_age(Duration::from_secs(secs));
    }

    Some(layer)
}
