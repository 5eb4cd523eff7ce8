// painvestex - question answering over Google's Generative Language API
// Author: kelexine (https://github.com/kelexine)

pub mod assistant;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod genai;
pub mod metrics;
pub mod server;
pub mod utils;
