use axum::{
    Json,
    http::{StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// 应用统一错误类型
#[derive(Error, Debug, utoipa::ToSchema)]
pub enum AppError {
    /// 上游（GitHub / LeetCode）失败，对外统一为内部错误
    #[error("上游错误: {0}")]
    Upstream(#[from] UpstreamError),

    /// 参数校验错误
    #[error("参数校验错误: {0}")]
    Validation(String),

    /// 内部服务器错误
    #[error("内部错误: {0}")]
    Internal(String),
}

/// 上游拉取错误类型
#[derive(Error, Debug, utoipa::ToSchema)]
pub enum UpstreamError {
    /// 网络不可达 / 连接失败 / 超时
    #[error("上游不可用: {0}")]
    Unavailable(String),

    /// 非 2xx 状态或响应体无法解析
    #[error("上游响应无效: {0}")]
    Malformed(String),

    /// 上游返回的业务错误（GraphQL errors 等）
    #[error("上游业务错误: {0}")]
    Application(String),
}

/// 错误响应体，与成功响应的 `{message, prettyMessage, status}` 结构保持一致。
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    #[schema(example = "Internal Server Error")]
    pub message: String,
    pub pretty_message: String,
    #[schema(example = 500)]
    pub status: u16,
    /// 稳定的错误码，用于程序化处理。
    #[schema(example = "UPSTREAM_FAILURE")]
    pub code: String,
    /// 可选：请求追踪 ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn stable_code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "BAD_REQUEST",
            AppError::Upstream(_) => "UPSTREAM_FAILURE",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn pretty_message(&self) -> String {
        match self {
            // 上游细节只进日志，不出边界
            AppError::Upstream(_) | AppError::Internal(_) => {
                "The server encountered an unexpected condition which prevented it from fulfilling the request."
                    .to_string()
            }
            AppError::Validation(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::warn!("请求失败: {}", self);
        }

        let body = ErrorEnvelope {
            message: status
                .canonical_reason()
                .unwrap_or("Error")
                .to_string(),
            pretty_message: self.pretty_message(),
            status: status.as_u16(),
            code: self.stable_code().to_string(),
            request_id: crate::request_id::current_request_id(),
        };

        let mut res = Json(body).into_response();
        *res.status_mut() = status;
        res.headers_mut().insert(
            axum::http::header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        res
    }
}

// =============== Error conversions for common external errors ===============

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            UpstreamError::Malformed(err.to_string())
        } else if let Some(status) = err.status() {
            UpstreamError::Malformed(format!("HTTP {status}"))
        } else {
            UpstreamError::Unavailable(err.to_string())
        }
    }
}

impl From<serde_json::Error> for UpstreamError {
    fn from(err: serde_json::Error) -> Self {
        UpstreamError::Malformed(err.to_string())
    }
}
