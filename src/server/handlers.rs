// HTTP request handlers
// Author: kelexine (https://github.com/kelexine)

use super::routes::AppState;
use crate::error::ServiceError;
use crate::utils::logging::sanitize;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Instant;
use tracing::{error, info, warn};

/// Body of `POST /medical`.
#[derive(Debug, Default, Deserialize)]
pub struct MedicalRequest {
    #[serde(default)]
    pub question: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MedicalResponse {
    pub response: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub checks: HashMap<String, HealthCheck>,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheck {
    pub status: String,
    pub message: String,
}

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let mut checks = HashMap::new();
    let mut overall_status = HealthStatus::Healthy;

    let model_check = match state.assistant.model() {
        Some(model) => HealthCheck {
            status: "ok".to_string(),
            message: format!("Model: {} ({})", model, model.method()),
        },
        None => {
            overall_status = HealthStatus::Degraded;
            HealthCheck {
                status: "error".to_string(),
                message: "No suitable AI model found".to_string(),
            }
        }
    };
    checks.insert("model_resolution".to_string(), model_check);

    let cache = state.assistant.cache();
    let stats = cache.stats();
    checks.insert(
        "answer_cache".to_string(),
        HealthCheck {
            status: "ok".to_string(),
            message: format!(
                "{} entries, {} hits, {} misses",
                cache.len(),
                stats.hits,
                stats.misses
            ),
        },
    );

    Json(HealthResponse {
        status: overall_status,
        checks,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Handler for `POST /medical`.
///
/// The body is parsed by hand rather than with the `Json` extractor so that
/// every malformed payload, and a body that could not be buffered, maps onto
/// the service's own error bodies.
pub async fn medical_handler(
    State(state): State<AppState>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Response {
    let start = Instant::now();

    let (response, source) = match answer_question(&state, body).await {
        Ok(answer) => {
            let source = answer.source.as_str();
            (
                Json(MedicalResponse { response: answer.text }).into_response(),
                source,
            )
        }
        Err(e) => {
            let message = sanitize(&e.to_string());
            if e.is_client_error() {
                warn!("Rejected /medical request: {}", message);
            } else {
                error!("Failed to answer /medical request: {}", message);
            }
            (e.into_response(), "error")
        }
    };

    let status = response.status().as_u16();
    crate::metrics::record_request("POST", "/medical", status, source, start.elapsed().as_secs_f64());
    info!("POST /medical -> {} ({}) in {:?}", status, source, start.elapsed());

    response
}

async fn answer_question(
    state: &AppState,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<crate::assistant::Answer, ServiceError> {
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ServiceError::PayloadTooLarge(rejection.body_text())
        } else {
            ServiceError::MissingInput
        }
    })?;
    let question = parse_question(&body)?;
    state.assistant.answer(&question).await
}

/// Extract the question from a raw request body.
///
/// Absent, unparseable, or empty JSON (`null`, `false`, `0`, `""`, `[]`,
/// `{}`), a body that is not an object, and a non-string `question` are all
/// [`ServiceError::MissingInput`]. A missing or null `question` is the empty
/// string.
pub fn parse_question(body: &[u8]) -> Result<String, ServiceError> {
    let value: Value = serde_json::from_slice(body).map_err(|_| ServiceError::MissingInput)?;

    if is_empty_value(&value) || !value.is_object() {
        return Err(ServiceError::MissingInput);
    }

    let request: MedicalRequest =
        serde_json::from_value(value).map_err(|_| ServiceError::MissingInput)?;

    Ok(request.question.unwrap_or_default())
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Handler for `GET /metrics` (Prometheus text format)
pub async fn metrics_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        crate::metrics::gather_metrics(),
    )
}
