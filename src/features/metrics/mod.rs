pub mod engine;

pub use engine::{LanguageShare, RECENT_WINDOW_DAYS};
