//! Response classification and single-attempt execution.
//!
//! # Design
//! `classify` is pure: it turns one `HttpResponse` into either the success
//! payload or a classified `ApiError`. Status decides first (429 is rate
//! limiting whatever the body says, anything but 200 is a network error),
//! then the JSON `ok` field decides, because a 200 status does not imply
//! success. The body of a non-200 response is never parsed, so a 503 with an
//! HTML error page is `Network(Status(503))`, not `MalformedJson`. `execute`
//! adds the I/O around it and never retries.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::{ApiError, NetworkError};
use crate::http::{HttpRequest, HttpResponse};

/// The JSON object of a successful reply, without its `ok` field.
pub type Payload = Map<String, Value>;

/// Executes one request descriptor.
///
/// Implementations return `Err` only when no HTTP response was obtained; any
/// status code, including errors, is an `Ok(HttpResponse)`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, NetworkError>;
}

/// Classify a raw response.
pub fn classify(response: &HttpResponse) -> Result<Payload, ApiError> {
    match response.status {
        200 => {}
        429 => {
            let retry_after = response
                .header("retry-after")
                .and_then(|v| v.trim().parse().ok());
            return Err(ApiError::TooManyRequests { retry_after });
        }
        status => return Err(NetworkError::Status(status).into()),
    }

    let value: Value = serde_json::from_slice(&response.body)
        .map_err(|e| ApiError::MalformedJson(e.to_string()))?;
    let Value::Object(mut object) = value else {
        return Err(ApiError::MalformedJson(
            "top-level value is not an object".to_string(),
        ));
    };

    match object.remove("ok") {
        Some(Value::Bool(true)) => Ok(object),
        Some(Value::Bool(false)) => Err(ApiError::from_platform_code(
            object.get("error").and_then(Value::as_str),
        )),
        Some(_) => Err(ApiError::MalformedJson("`ok` is not a boolean".to_string())),
        None => Err(ApiError::MalformedJson("missing `ok` field".to_string())),
    }
}

/// Execute a built request and classify the outcome.
///
/// A failed build is forwarded unchanged, so the caller's failure path fires
/// with the network classification the builder already assigned.
pub async fn execute<T>(
    transport: &T,
    request: Result<HttpRequest, ApiError>,
) -> Result<Payload, ApiError>
where
    T: Transport + ?Sized,
{
    let request = request?;
    let response = transport.send(request).await.map_err(|e| {
        tracing::warn!(error = %e, "request did not complete");
        ApiError::from(e)
    })?;
    tracing::debug!(status = response.status, bytes = response.body.len(), "response received");

    let outcome = classify(&response);
    match &outcome {
        Err(ApiError::TooManyRequests { retry_after }) => {
            tracing::warn!(?retry_after, "rate limited");
        }
        Err(e) => tracing::debug!(error = %e, "call failed"),
        Ok(_) => {}
    }
    outcome
}
