// Answer cache module
// Author: kelexine (https://github.com/kelexine)

pub mod manager;
pub mod models;

pub use manager::{normalize, AnswerCache};
pub use models::CacheStats;
