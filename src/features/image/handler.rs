use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    Router,
    extract::{Query, State},
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use tracing::Instrument;

use crate::error::{AppError, UpstreamError};
use crate::features::metrics::engine;
use crate::features::resolve_identity;
use crate::state::AppState;

use super::cache::{BadgeKind, CachedArtifact, RenderCache, RenderKey};
use super::renderer;
use super::theme::RenderTheme;

pub(crate) const SVG_CONTENT_TYPE: &str = "image/svg+xml; charset=utf-8";

/// 徽章查询参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BadgeQuery {
    #[serde(default)]
    username: Option<String>,
    /// 前景色标识，如 red / lightBlue
    #[serde(default)]
    color: Option<String>,
    /// 背景色标识：black / neutral / white
    #[serde(default)]
    background: Option<String>,
}

impl BadgeQuery {
    fn theme(&self) -> RenderTheme {
        RenderTheme::resolve(self.color.as_deref(), self.background.as_deref())
    }
}

fn svg_response(artifact: CachedArtifact) -> Response {
    let mut res = String::from(&*artifact.svg).into_response();
    res.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(SVG_CONTENT_TYPE),
    );
    res
}

/// 在独立任务中完成「拉取 → 渲染 → 写回」。
///
/// 客户端断开时 axum 会丢弃 handler future，但已发出的上游请求仍会跑完
/// （或超时），结果照常写入槽位，供下一次请求命中。
async fn render_detached<T, Fut, R>(
    cache: Arc<RenderCache>,
    key: RenderKey,
    fetch: Fut,
    render: R,
) -> Result<CachedArtifact, AppError>
where
    T: Send + 'static,
    Fut: Future<Output = Result<T, UpstreamError>> + Send + 'static,
    R: FnOnce(T) -> String + Send + 'static,
{
    let task = tokio::spawn(
        async move { cache.get_or_render(key, || fetch, render).await }.in_current_span(),
    );
    task.await
        .map_err(|e| AppError::Internal(format!("徽章渲染任务异常退出: {e}")))?
        .map_err(AppError::from)
}

#[utoipa::path(
    get,
    path = "/stats/svg",
    summary = "GitHub 贡献徽章",
    description = "渲染四项贡献汇总与最近 7 天活跃柱状图的 SVG 徽章。结果经过约 1 秒的单槽位缓存。",
    params(
        ("username" = Option<String>, Query, description = "GitHub 用户名"),
        ("color" = Option<String>, Query, description = "前景色：red|blue|lightBlue|green|yellow|orange|purple|pink|white|black，默认 red"),
        ("background" = Option<String>, Query, description = "背景色：black|neutral|white，默认 black")
    ),
    responses(
        (status = 200, description = "SVG 徽章（image/svg+xml）"),
        (status = 400, description = "用户名非法", body = crate::error::ErrorEnvelope),
        (status = 500, description = "上游失败", body = crate::error::ErrorEnvelope)
    ),
    tag = "Badge"
)]
pub async fn render_profile_badge(
    State(state): State<AppState>,
    Query(q): Query<BadgeQuery>,
) -> Result<Response, AppError> {
    let username = resolve_identity(
        q.username.as_deref(),
        Some(&*state.github_default_username),
    )?;
    let theme = q.theme();
    let key = RenderKey::new(BadgeKind::Profile, username.as_str(), theme);

    let t0 = Instant::now();
    let github = Arc::clone(&state.github);
    let login = username.clone();
    let label = username.clone();
    let artifact = render_detached(
        Arc::clone(&state.render_cache),
        key,
        async move { github.fetch_profile_stats(&login).await },
        move |stats| renderer::render_profile_svg(&label, &stats, &theme),
    )
    .await?;
    tracing::debug!("贡献徽章 login={} 耗时={:?}", username, t0.elapsed());

    Ok(svg_response(artifact))
}

#[utoipa::path(
    get,
    path = "/languages/svg",
    summary = "GitHub 语言占比徽章",
    description = "按占比降序渲染仓库语言分布，高度随语言数增长。",
    params(
        ("username" = Option<String>, Query, description = "GitHub 用户名"),
        ("color" = Option<String>, Query, description = "前景色，默认 red"),
        ("background" = Option<String>, Query, description = "背景色，默认 black")
    ),
    responses(
        (status = 200, description = "SVG 徽章（image/svg+xml）"),
        (status = 400, description = "用户名非法", body = crate::error::ErrorEnvelope),
        (status = 500, description = "上游失败", body = crate::error::ErrorEnvelope)
    ),
    tag = "Badge"
)]
pub async fn render_languages_badge(
    State(state): State<AppState>,
    Query(q): Query<BadgeQuery>,
) -> Result<Response, AppError> {
    let username = resolve_identity(
        q.username.as_deref(),
        Some(&*state.github_default_username),
    )?;
    let theme = q.theme();
    let key = RenderKey::new(BadgeKind::Languages, username.as_str(), theme);

    let t0 = Instant::now();
    let github = Arc::clone(&state.github);
    let login = username.clone();
    let label = username.clone();
    let artifact = render_detached(
        Arc::clone(&state.render_cache),
        key,
        async move { github.fetch_repo_languages(&login).await },
        move |hist| {
            let shares = engine::language_shares(&hist);
            renderer::render_languages_svg(&label, &shares, &theme)
        },
    )
    .await?;
    tracing::debug!("语言徽章 login={} 耗时={:?}", username, t0.elapsed());

    Ok(svg_response(artifact))
}

#[utoipa::path(
    get,
    path = "/leetcode/svg",
    summary = "LeetCode 解题徽章",
    description = "渲染排名、总进度、分难度进度与通过率。",
    params(
        ("username" = Option<String>, Query, description = "LeetCode 用户名"),
        ("color" = Option<String>, Query, description = "前景色，默认 red"),
        ("background" = Option<String>, Query, description = "背景色，默认 black")
    ),
    responses(
        (status = 200, description = "SVG 徽章（image/svg+xml）"),
        (status = 400, description = "缺少或非法的用户名", body = crate::error::ErrorEnvelope),
        (status = 500, description = "上游失败", body = crate::error::ErrorEnvelope)
    ),
    tag = "Badge"
)]
pub async fn render_judge_badge(
    State(state): State<AppState>,
    Query(q): Query<BadgeQuery>,
) -> Result<Response, AppError> {
    let username = resolve_identity(
        q.username.as_deref(),
        state.leetcode_default_username.as_deref(),
    )?;
    let theme = q.theme();
    let key = RenderKey::new(BadgeKind::LeetCode, username.as_str(), theme);

    let leetcode = Arc::clone(&state.leetcode);
    let login = username.clone();
    let artifact = render_detached(
        Arc::clone(&state.render_cache),
        key,
        async move { leetcode.fetch_judge_stats(&login).await },
        move |stats| renderer::render_judge_svg(&username, &stats, &theme),
    )
    .await?;

    Ok(svg_response(artifact))
}

pub fn create_image_router() -> Router<AppState> {
    Router::new()
        .route("/stats/svg", get(render_profile_badge))
        .route("/languages/svg", get(render_languages_badge))
        .route("/leetcode/svg", get(render_judge_badge))
}
