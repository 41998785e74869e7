use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// 统一成功响应体：`{message, prettyMessage, status, data}`
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    #[schema(example = "OK")]
    pub message: String,
    pub pretty_message: String,
    #[schema(example = 200)]
    pub status: u16,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(pretty_message: impl Into<String>, data: T) -> Self {
        Self {
            message: "OK".to_string(),
            pretty_message: pretty_message.into(),
            status: StatusCode::OK.as_u16(),
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}
