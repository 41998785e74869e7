pub mod client;
pub mod handler;
pub mod models;

pub use client::GitHubClient;
pub use handler::create_github_router;
pub use models::{DayContribution, LanguageHistogram, ProfileStats};
