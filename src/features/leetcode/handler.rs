use axum::{
    Router,
    extract::{Query, State},
    routing::get,
};

use crate::error::AppError;
use crate::features::github::handler::UsernameQuery;
use crate::features::resolve_identity;
use crate::response::ApiResponse;
use crate::state::AppState;

use super::models::JudgeStats;

#[utoipa::path(
    get,
    path = "/leetcode",
    summary = "LeetCode 解题统计",
    description = "按难度汇总已解题数、题库总数、通过率与全站排名。未配置默认用户时必须传 username。",
    params(
        ("username" = Option<String>, Query, description = "LeetCode 用户名")
    ),
    responses(
        (status = 200, description = "解题统计", body = ApiResponse<JudgeStats>),
        (status = 400, description = "缺少或非法的用户名", body = crate::error::ErrorEnvelope),
        (status = 500, description = "上游失败", body = crate::error::ErrorEnvelope)
    ),
    tag = "LeetCode"
)]
pub async fn get_judge_stats(
    State(state): State<AppState>,
    Query(q): Query<UsernameQuery>,
) -> Result<ApiResponse<JudgeStats>, AppError> {
    let username = resolve_identity(
        q.username.as_deref(),
        state.leetcode_default_username.as_deref(),
    )?;
    let stats = state.leetcode.fetch_judge_stats(&username).await?;
    Ok(ApiResponse::ok("Fetched LeetCode stats successfully", stats))
}

pub fn create_leetcode_router() -> Router<AppState> {
    Router::new().route("/leetcode", get(get_judge_stats))
}
