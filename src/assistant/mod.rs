//! Question answering: classification, answer cache, and generation.
//!
//! [`Assistant`] owns the resolved model, the answer cache, and the
//! generator used on cache misses. One instance is shared by all requests.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod generator;
pub mod prompt;

pub use generator::AnswerGenerator;
pub use prompt::{build_prompt, is_greeting, IDENTITY_REPLY};

use crate::cache::AnswerCache;
use crate::config::AssistantConfig;
use crate::error::{Result, ServiceError};
use crate::genai::ModelRef;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Where an answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerSource {
    Identity,
    Cache,
    Generated,
}

impl AnswerSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerSource::Identity => "identity",
            AnswerSource::Cache => "cache",
            AnswerSource::Generated => "generated",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub text: String,
    pub source: AnswerSource,
}

pub struct Assistant {
    model: Option<ModelRef>,
    generator: Arc<dyn AnswerGenerator>,
    cache: AnswerCache,
    max_output_tokens: u32,
}

impl Assistant {
    /// `model` is `None` when startup resolution found nothing usable; the
    /// assistant then refuses every non-greeting question.
    pub fn new(
        model: Option<ModelRef>,
        generator: Arc<dyn AnswerGenerator>,
        config: &AssistantConfig,
    ) -> Self {
        Self {
            model,
            generator,
            cache: AnswerCache::new(),
            max_output_tokens: config.max_output_tokens,
        }
    }

    pub fn model(&self) -> Option<&ModelRef> {
        self.model.as_ref()
    }

    pub fn cache(&self) -> &AnswerCache {
        &self.cache
    }

    /// Answer a question.
    ///
    /// Order: greeting check, model availability, cache lookup, generation.
    /// Generated answers are cached under the normalized question.
    pub async fn answer(&self, question: &str) -> Result<Answer> {
        if is_greeting(question) {
            debug!("Question classified as greeting");
            return Ok(Answer {
                text: IDENTITY_REPLY.to_string(),
                source: AnswerSource::Identity,
            });
        }

        let model = self.model.as_ref().ok_or(ServiceError::NoModel)?;

        if let Some(text) = self.cache.get(question) {
            crate::metrics::record_answer_cache("hit");
            return Ok(Answer {
                text,
                source: AnswerSource::Cache,
            });
        }
        crate::metrics::record_answer_cache("miss");

        let prompt = build_prompt(question);
        let start = Instant::now();
        let result = self
            .generator
            .generate(model, &prompt, self.max_output_tokens)
            .await;
        crate::metrics::record_generator_call(
            model.name(),
            result.is_ok(),
            start.elapsed().as_secs_f64(),
        );

        let text = result?;
        info!(
            "Generated answer with {} in {:?} ({} chars)",
            model,
            start.elapsed(),
            text.len()
        );

        self.cache.insert(question, text.clone());
        crate::metrics::update_answer_cache_entries(self.cache.len());

        Ok(Answer {
            text,
            source: AnswerSource::Generated,
        })
    }
}
