pub mod cache;
pub mod handler;
pub mod renderer;
pub mod theme;

pub use cache::{BadgeKind, CachedArtifact, RenderCache, RenderKey};
pub use handler::create_image_router;
pub use renderer::{render_judge_svg, render_languages_svg, render_profile_svg};
pub use theme::{AccentColor, BackgroundColor, RenderTheme};
