//! 上游响应的公共解码：GitHub 与 LeetCode 共用同一套 GraphQL 信封与状态码处理。

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::UpstreamError;

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlEnvelope<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlError {
    pub message: String,
}

impl<T> GraphQlEnvelope<T> {
    /// 第一条业务错误转为 `UpstreamError::Application`；没有错误时交出 `data`。
    pub(crate) fn into_data(self, label: &str) -> Result<Option<T>, UpstreamError> {
        if let Some(first) = self.errors.into_iter().next() {
            tracing::warn!("{} 业务错误: {}", label, first.message);
            return Err(UpstreamError::Application(first.message));
        }
        Ok(self.data)
    }
}

/// 校验状态码并解析 JSON；非 2xx 与解析失败都归为 Malformed。
pub(crate) async fn decode_success<T: DeserializeOwned>(
    resp: reqwest::Response,
    label: &str,
) -> Result<T, UpstreamError> {
    let status = resp.status();
    if !status.is_success() {
        tracing::warn!("{} 返回非成功状态: {}", label, status);
        return Err(UpstreamError::Malformed(format!("{label} HTTP {status}")));
    }
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| {
        tracing::warn!("{} 响应解析失败: {}", label, e);
        UpstreamError::from(e)
    })
}

#[cfg(test)]
mod tests {
    use super::GraphQlEnvelope;
    use crate::error::UpstreamError;

    #[test]
    fn envelope_without_errors_yields_data() {
        let env: GraphQlEnvelope<u32> = serde_json::from_str(r#"{"data": 7}"#).expect("parse");
        assert_eq!(env.into_data("test").expect("no errors"), Some(7));
    }

    #[test]
    fn first_graphql_error_wins_over_data() {
        let env: GraphQlEnvelope<u32> = serde_json::from_str(
            r#"{"data": 7, "errors": [{"message": "first"}, {"message": "second"}]}"#,
        )
        .expect("parse");
        match env.into_data("test") {
            Err(UpstreamError::Application(msg)) => assert_eq!(msg, "first"),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
