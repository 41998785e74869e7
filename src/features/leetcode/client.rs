use serde_json::json;

use crate::config::LeetCodeConfig;
use crate::error::{AppError, UpstreamError};
use crate::features::upstream::{GraphQlEnvelope, decode_success};

use super::models::{JudgeStats, SessionProgressData};

const SESSION_PROGRESS_QUERY: &str = r#"
query userSessionProgress($username: String!) {
    allQuestionsCount {
        difficulty
        count
    }
    matchedUser(username: $username) {
        profile {
            ranking
        }
        submitStats {
            acSubmissionNum {
                difficulty
                count
                submissions
            }
            totalSubmissionNum {
                difficulty
                count
                submissions
            }
        }
    }
}"#;

/// LeetCode GraphQL 客户端（无需认证，固定超时）
#[derive(Clone)]
pub struct LeetCodeClient {
    client: reqwest::Client,
    endpoint: String,
}

impl LeetCodeClient {
    pub fn new(cfg: &LeetCodeConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(cfg.timeout_duration())
            .user_agent(cfg.user_agent.as_str())
            .build()
            .map_err(|e| AppError::Internal(format!("初始化 LeetCode HTTP Client 失败: {e}")))?;
        Ok(Self {
            client,
            endpoint: cfg.graphql_endpoint.clone(),
        })
    }

    pub async fn fetch_judge_stats(&self, username: &str) -> Result<JudgeStats, UpstreamError> {
        let body = json!({
            "query": SESSION_PROGRESS_QUERY,
            "variables": { "username": username },
            "operationName": "userSessionProgress",
        });

        let resp = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| {
                tracing::warn!("LeetCode 请求失败 username={}: {}", username, e);
            })?;
        let envelope: GraphQlEnvelope<SessionProgressData> =
            decode_success(resp, "LeetCode GraphQL").await?;

        envelope
            .into_data("LeetCode GraphQL")?
            .and_then(SessionProgressData::into_judge_stats)
            .ok_or_else(|| UpstreamError::Application(format!("LeetCode 用户不存在: {username}")))
    }
}
