use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::features::github::client::GitHubClient;
use crate::features::image::cache::RenderCache;
use crate::features::leetcode::client::LeetCodeClient;

/// 聚合的应用共享状态
#[derive(Clone)]
pub struct AppState {
    pub github: Arc<GitHubClient>,
    pub leetcode: Arc<LeetCodeClient>,
    /// 所有徽章共用的单槽位渲染缓存
    pub render_cache: Arc<RenderCache>,
    /// GitHub 路由缺省用户名
    pub github_default_username: Arc<str>,
    /// LeetCode 路由缺省用户名（未配置时要求显式传参）
    pub leetcode_default_username: Option<Arc<str>>,
}

impl AppState {
    /// 按配置构建上游客户端与渲染缓存
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let github = GitHubClient::new(&config.github)?;
        let leetcode = LeetCodeClient::new(&config.leetcode)?;

        Ok(Self {
            github: Arc::new(github),
            leetcode: Arc::new(leetcode),
            render_cache: Arc::new(RenderCache::new(config.render_cache.ttl())),
            github_default_username: Arc::from(config.github.default_username.as_str()),
            leetcode_default_username: config
                .leetcode
                .default_username
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(Arc::from),
        })
    }
}
