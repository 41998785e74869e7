use axum::{Router, routing::get};
use chrono::{SecondsFormat, Utc};

use crate::response::ApiResponse;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/health",
    summary = "健康检查",
    description = "用于探活的健康检查端点，`data` 为服务端当前 UTC 时间（RFC 3339）。",
    responses((status = 200, description = "服务健康", body = ApiResponse<String>)),
    tag = "Health"
)]
pub async fn health_check() -> ApiResponse<String> {
    ApiResponse::ok(
        "Server is healthy",
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    )
}

pub fn create_health_router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

#[cfg(test)]
mod tests {
    use super::health_check;
    use axum::response::IntoResponse;

    #[tokio::test]
    async fn health_returns_envelope_with_timestamp() {
        let resp = health_check().await.into_response();
        assert_eq!(resp.status(), axum::http::StatusCode::OK);

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("read body");
        let v: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(v["status"], 200);
        let ts = v["data"].as_str().expect("data is a string");
        assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok(), "{ts}");
    }
}
