//! Utility functions and helpers.
//!
//! - `logging`: Tracing initialization and API key redaction.
//! - `retry`: Backoff-driven retries that respect upstream `retryDelay` hints.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod logging;
pub mod retry;
