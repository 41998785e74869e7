pub mod client;
pub mod handler;
pub mod models;

pub use client::LeetCodeClient;
pub use handler::create_leetcode_router;
pub use models::JudgeStats;
