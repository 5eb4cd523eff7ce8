// Answer generator seam
// Author: kelexine (https://github.com/kelexine)

use crate::error::Result;
use crate::genai::ModelRef;
use async_trait::async_trait;

/// Produces answer text for a prompt using a resolved model.
///
/// Implemented by [`crate::genai::GenerativeClient`] for the real upstream API.
/// Every failure is a [`crate::error::ServiceError`]; callers do not
/// distinguish provider error subtypes.
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    async fn generate(
        &self,
        model: &ModelRef,
        prompt: &str,
        max_output_tokens: u32,
    ) -> Result<String>;
}
