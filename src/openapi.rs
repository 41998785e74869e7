use utoipa::openapi::server::{ServerBuilder, ServerVariableBuilder};
use utoipa::{Modify, OpenApi};

/// 所有业务路由都挂在 `config.api.prefix` 之下，Swagger UI 通过 server 变量切换前缀。
struct ApiServers;

impl Modify for ApiServers {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let api = ServerBuilder::new()
            .url("{api_prefix}")
            .description(Some("业务接口（默认 /api）"))
            .parameter(
                "api_prefix",
                ServerVariableBuilder::new()
                    .default_value("/api")
                    .description(Some("对应 config.api.prefix（可通过 APP_API__PREFIX 覆盖）")),
            )
            .build();

        openapi.servers = Some(vec![api]);
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::features::health::handler::health_check,
        crate::features::github::handler::get_profile_stats,
        crate::features::github::handler::get_languages,
        crate::features::leetcode::handler::get_judge_stats,
        crate::features::image::handler::render_profile_badge,
        crate::features::image::handler::render_languages_badge,
        crate::features::image::handler::render_judge_badge,
    ),
    components(
        schemas(
            crate::error::ErrorEnvelope,
            crate::features::github::models::ProfileStats,
            crate::features::github::models::DayContribution,
            crate::features::github::handler::LanguagePercentages,
            crate::features::leetcode::models::JudgeStats,
            crate::features::image::theme::AccentColor,
            crate::features::image::theme::BackgroundColor,
        )
    ),
    modifiers(&ApiServers),
    tags(
        (name = "Health", description = "Health APIs"),
        (name = "GitHub", description = "GitHub contribution and language statistics"),
        (name = "LeetCode", description = "LeetCode problem-solving statistics"),
        (name = "Badge", description = "Rendered SVG badges"),
    ),
    info(
        title = "Realm Stats API",
        version = "0.1.0",
        description = "Developer profile statistics and SVG badges (Axum)"
    )
)]
pub struct ApiDoc;
