// Generative Language API client module
// Author: kelexine (https://github.com/kelexine)

mod client;
pub mod models;

pub use client::{select_model, GenerativeClient};

use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::Zeroizing;

/// Generation method a model advertises in `supportedGenerationMethods`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GenerationMethod {
    /// Legacy PaLM text completion (`:generateText`).
    GenerateText,
    /// Gemini content generation (`:generateContent`).
    #[default]
    GenerateContent,
}

impl GenerationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationMethod::GenerateText => "generateText",
            GenerationMethod::GenerateContent => "generateContent",
        }
    }
}

impl fmt::Display for GenerationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A model resolved at startup, together with the method it is called with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRef {
    name: String,
    method: GenerationMethod,
}

impl ModelRef {
    pub fn new(name: impl Into<String>, method: GenerationMethod) -> Self {
        Self {
            name: name.into(),
            method,
        }
    }

    /// Resource name as returned by the API, e.g. `models/text-bison-001`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn method(&self) -> GenerationMethod {
        self.method
    }
}

impl fmt::Display for ModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// API key for the Generative Language API. Wiped from memory on drop.
#[derive(Clone)]
pub struct ApiKey(Zeroizing<String>);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(Zeroizing::new(key.into()))
    }

    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}
