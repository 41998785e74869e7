use std::collections::BTreeMap;
use std::time::Instant;

use axum::{
    Router,
    extract::{Query, State},
    routing::get,
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::features::metrics::engine;
use crate::features::resolve_identity;
use crate::response::ApiResponse;
use crate::state::AppState;

use super::models::ProfileStats;

/// 仅需用户名的查询参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UsernameQuery {
    #[serde(default)]
    pub username: Option<String>,
}

/// 语言占比：`{语言: 百分比}`，百分比截断到两位小数
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(transparent)]
#[schema(example = json!({"Rust": 66.66, "Go": 33.33}))]
pub struct LanguagePercentages(pub BTreeMap<String, f64>);

#[utoipa::path(
    get,
    path = "/stats",
    summary = "GitHub 贡献统计",
    description = "拉取最近一年的贡献日历与提交/PR/Issue 汇总。未传 username 时使用配置的默认用户。",
    params(
        ("username" = Option<String>, Query, description = "GitHub 用户名")
    ),
    responses(
        (status = 200, description = "统计数据", body = ApiResponse<ProfileStats>),
        (status = 400, description = "用户名非法", body = crate::error::ErrorEnvelope),
        (status = 500, description = "上游失败", body = crate::error::ErrorEnvelope)
    ),
    tag = "GitHub"
)]
pub async fn get_profile_stats(
    State(state): State<AppState>,
    Query(q): Query<UsernameQuery>,
) -> Result<ApiResponse<ProfileStats>, AppError> {
    let username = resolve_identity(
        q.username.as_deref(),
        Some(&*state.github_default_username),
    )?;

    let t0 = Instant::now();
    let stats = state.github.fetch_profile_stats(&username).await?;
    tracing::debug!(
        "GitHub 贡献统计完成 login={} days={} 耗时={:?}",
        username,
        stats.contributions_by_day.len(),
        t0.elapsed()
    );

    Ok(ApiResponse::ok("Fetched GitHub stats successfully", stats))
}

#[utoipa::path(
    get,
    path = "/languages",
    summary = "GitHub 仓库语言占比",
    description = "统计公开仓库的主语言分布，忽略未标注语言的仓库。",
    params(
        ("username" = Option<String>, Query, description = "GitHub 用户名")
    ),
    responses(
        (status = 200, description = "语言占比", body = ApiResponse<LanguagePercentages>),
        (status = 400, description = "用户名非法", body = crate::error::ErrorEnvelope),
        (status = 500, description = "上游失败", body = crate::error::ErrorEnvelope)
    ),
    tag = "GitHub"
)]
pub async fn get_languages(
    State(state): State<AppState>,
    Query(q): Query<UsernameQuery>,
) -> Result<ApiResponse<LanguagePercentages>, AppError> {
    let username = resolve_identity(
        q.username.as_deref(),
        Some(&*state.github_default_username),
    )?;

    let hist = state.github.fetch_repo_languages(&username).await?;
    let shares = engine::language_shares(&hist);

    Ok(ApiResponse::ok(
        "Fetched language percentages successfully",
        LanguagePercentages(engine::shares_as_map(&shares)),
    ))
}

pub fn create_github_router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(get_profile_stats))
        .route("/languages", get(get_languages))
}
