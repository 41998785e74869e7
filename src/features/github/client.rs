use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde_json::json;

use crate::config::GitHubConfig;
use crate::error::{AppError, UpstreamError};
use crate::features::upstream::{GraphQlEnvelope, decode_success};

use super::models::{LanguageHistogram, ProfileStats, RepoSummary, UserData};

const CONTRIBUTIONS_QUERY: &str = r#"
query($login: String!) {
    user(login: $login) {
        contributionsCollection {
            totalCommitContributions
            totalPullRequestContributions
            totalIssueContributions
            contributionCalendar {
                totalContributions
                weeks {
                    contributionDays {
                        contributionCount
                        date
                        weekday
                    }
                }
            }
        }
    }
}"#;

/// GitHub 上游客户端：GraphQL 贡献日历 + REST 仓库列表。
///
/// 每次调用只发一次请求，不重试；重试策略由调用方决定。
#[derive(Clone)]
pub struct GitHubClient {
    client: reqwest::Client,
    token: Option<String>,
    graphql_endpoint: String,
    rest_base_url: String,
}

impl GitHubClient {
    pub fn new(cfg: &GitHubConfig) -> Result<Self, AppError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );

        let client = reqwest::Client::builder()
            // GitHub API 拒绝无 User-Agent 的请求
            .user_agent(concat!("realm-stats/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| AppError::Internal(format!("初始化 GitHub HTTP Client 失败: {e}")))?;

        Ok(Self {
            client,
            token: cfg.effective_token(),
            graphql_endpoint: cfg.graphql_endpoint.clone(),
            rest_base_url: cfg.rest_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// 拉取贡献汇总与最近一年的贡献日历
    pub async fn fetch_profile_stats(&self, login: &str) -> Result<ProfileStats, UpstreamError> {
        let body = json!({
            "query": CONTRIBUTIONS_QUERY,
            "variables": { "login": login },
        });

        let mut req = self.client.post(&self.graphql_endpoint).json(&body);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await.inspect_err(|e| {
            tracing::warn!("GitHub GraphQL 请求失败 login={}: {}", login, e);
        })?;
        let envelope: GraphQlEnvelope<UserData> = decode_success(resp, "GitHub GraphQL").await?;

        let user = envelope
            .into_data("GitHub GraphQL")?
            .and_then(|d| d.user)
            .ok_or_else(|| UpstreamError::Application(format!("GitHub 用户不存在: {login}")))?;

        let stats = user.contributions_collection.into_profile_stats();
        tracing::debug!(
            "GitHub 贡献拉取完成 login={} days={} total={}",
            login,
            stats.contributions_by_day.len(),
            stats.total_contributions
        );
        Ok(stats)
    }

    /// 拉取用户仓库列表并统计主语言
    pub async fn fetch_repo_languages(
        &self,
        login: &str,
    ) -> Result<LanguageHistogram, UpstreamError> {
        let url = format!("{}/users/{}/repos", self.rest_base_url, login);
        let mut req = self.client.get(&url);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await.inspect_err(|e| {
            tracing::warn!("GitHub 仓库列表请求失败 login={}: {}", login, e);
        })?;
        let repos: Vec<RepoSummary> = decode_success(resp, "GitHub REST").await?;

        let hist = LanguageHistogram::from_languages(repos.iter().map(|r| r.language.as_deref()));
        tracing::debug!(
            "GitHub 仓库语言统计完成 login={} repos={} tagged={}",
            login,
            repos.len(),
            hist.total()
        );
        Ok(hist)
    }
}
