use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// 全局配置单例
static CONFIG: OnceCell<AppConfig> = OnceCell::new();

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    pub host: String,
    /// 监听端口
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// API 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API 路由前缀
    pub prefix: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            prefix: "/api".to_string(),
        }
    }
}

/// CORS 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// 是否启用 CORS
    #[serde(default = "CorsConfig::default_enabled")]
    pub enabled: bool,
    /// 允许的 Origin 列表（支持 "*" 表示任意）
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    /// 允许的方法列表（支持 "*" 表示任意）
    #[serde(default)]
    pub allowed_methods: Vec<String>,
    /// 允许的请求头列表（支持 "*" 表示任意）
    #[serde(default)]
    pub allowed_headers: Vec<String>,
    /// 预检缓存时间（秒）
    #[serde(default)]
    pub max_age_secs: Option<u64>,
}

impl CorsConfig {
    fn default_enabled() -> bool {
        false
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
            allowed_origins: Vec::new(),
            allowed_methods: Vec::new(),
            allowed_headers: Vec::new(),
            max_age_secs: None,
        }
    }
}

/// GitHub 上游配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// 访问令牌（Bearer）。为空时回退读取 `GITHUB_TOKEN` 环境变量
    #[serde(default)]
    pub token: String,
    /// 未传 username 时使用的默认用户
    #[serde(default = "GitHubConfig::default_username")]
    pub default_username: String,
    /// GraphQL 端点
    #[serde(default = "GitHubConfig::default_graphql_endpoint")]
    pub graphql_endpoint: String,
    /// REST API 基地址（仓库列表）
    #[serde(default = "GitHubConfig::default_rest_base_url")]
    pub rest_base_url: String,
}

impl GitHubConfig {
    fn default_username() -> String {
        "risv1".to_string()
    }
    fn default_graphql_endpoint() -> String {
        "https://api.github.com/graphql".to_string()
    }
    fn default_rest_base_url() -> String {
        "https://api.github.com".to_string()
    }

    /// 实际生效的令牌：配置优先，其次 `GITHUB_TOKEN`
    pub fn effective_token(&self) -> Option<String> {
        if !self.token.trim().is_empty() {
            return Some(self.token.trim().to_string());
        }
        std::env::var("GITHUB_TOKEN")
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            default_username: Self::default_username(),
            graphql_endpoint: Self::default_graphql_endpoint(),
            rest_base_url: Self::default_rest_base_url(),
        }
    }
}

/// LeetCode 上游配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeetCodeConfig {
    /// 未传 username 时使用的默认用户（留空则要求显式传参）
    #[serde(default)]
    pub default_username: Option<String>,
    /// GraphQL 端点
    #[serde(default = "LeetCodeConfig::default_graphql_endpoint")]
    pub graphql_endpoint: String,
    /// 请求超时（秒）
    #[serde(default = "LeetCodeConfig::default_timeout")]
    pub timeout_secs: u64,
    /// 请求使用的 User-Agent
    #[serde(default = "LeetCodeConfig::default_user_agent")]
    pub user_agent: String,
}

impl LeetCodeConfig {
    fn default_graphql_endpoint() -> String {
        "https://leetcode.com/graphql".to_string()
    }
    fn default_timeout() -> u64 {
        10
    }
    fn default_user_agent() -> String {
        "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:131.0) Gecko/20100101 Firefox/131.0"
            .to_string()
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for LeetCodeConfig {
    fn default() -> Self {
        Self {
            default_username: None,
            graphql_endpoint: Self::default_graphql_endpoint(),
            timeout_secs: Self::default_timeout(),
            user_agent: Self::default_user_agent(),
        }
    }
}

/// 徽章渲染缓存配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderCacheConfig {
    /// 缓存过期阈值（毫秒）。只用于合并瞬时突发请求，不宜调大
    #[serde(default = "RenderCacheConfig::default_ttl_ms")]
    pub ttl_ms: u64,
}

impl RenderCacheConfig {
    fn default_ttl_ms() -> u64 {
        1000
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }
}

impl Default for RenderCacheConfig {
    fn default() -> Self {
        Self {
            ttl_ms: Self::default_ttl_ms(),
        }
    }
}

/// 优雅退出配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShutdownConfig {
    /// 优雅退出超时时间（秒）
    #[serde(default = "ShutdownConfig::default_timeout")]
    pub timeout_secs: u64,
}

impl ShutdownConfig {
    fn default_timeout() -> u64 {
        30
    }

    /// 获取优雅退出超时时间
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            timeout_secs: Self::default_timeout(),
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub api: ApiConfig,
    /// CORS 配置
    #[serde(default)]
    pub cors: CorsConfig,
    /// GitHub 上游配置
    #[serde(default)]
    pub github: GitHubConfig,
    /// LeetCode 上游配置
    #[serde(default)]
    pub leetcode: LeetCodeConfig,
    /// 徽章缓存配置
    #[serde(default)]
    pub render_cache: RenderCacheConfig,
    /// 优雅退出配置
    #[serde(default)]
    pub shutdown: ShutdownConfig,
}

impl AppConfig {
    /// 从配置文件加载配置（文件可缺省），支持环境变量覆盖
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::get_config_path();

        tracing::info!("正在从 {:?} 加载配置文件", config_path);

        let builder = ConfigBuilder::builder()
            .add_source(File::from(config_path).required(false))
            // 支持环境变量覆盖，例如：APP_GITHUB__DEFAULT_USERNAME
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = builder.try_deserialize()?;

        tracing::debug!(
            "配置加载完成: github.token 已设置 = {}",
            config.github.effective_token().is_some()
        );

        Ok(config)
    }

    /// 获取全局配置单例
    pub fn global() -> &'static AppConfig {
        CONFIG.get().expect("配置未初始化，请先调用 init_global()")
    }

    /// 初始化全局配置
    pub fn init_global() -> Result<(), ConfigError> {
        let config = Self::load()?;
        CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("配置已经被初始化".to_string()))?;
        Ok(())
    }

    /// 获取配置文件路径
    fn get_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    /// 获取服务器监听地址
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::AppConfig;

    #[test]
    fn defaults_cover_every_section() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server_addr(), "0.0.0.0:8000");
        assert_eq!(cfg.api.prefix, "/api");
        assert_eq!(cfg.github.default_username, "risv1");
        assert_eq!(cfg.leetcode.timeout_secs, 10);
        assert_eq!(cfg.render_cache.ttl_ms, 1000);
    }

    #[test]
    fn partial_toml_falls_back_to_section_defaults() {
        let cfg: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                "[github]\ndefault_username = \"alice\"\n",
                config::FileFormat::Toml,
            ))
            .build()
            .expect("build config")
            .try_deserialize()
            .expect("deserialize config");
        assert_eq!(cfg.github.default_username, "alice");
        assert_eq!(cfg.github.graphql_endpoint, "https://api.github.com/graphql");
        assert_eq!(cfg.server.port, 8000);
    }
}
