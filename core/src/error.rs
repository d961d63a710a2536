//! Error types for the admin API client.
//!
//! # Design
//! Every non-2xx response becomes a typed variant carrying the parsed
//! `{ detail }` payload. The status codes callers branch on (401, 403, 404,
//! 400/422, 409) get dedicated variants; everything else lands in `Http`.

use serde::Deserialize;
use serde_json::Value;

use crate::http::HttpResponse;

/// One field-level validation message, `{ loc, msg }`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FieldError {
    #[serde(default)]
    pub loc: Vec<Value>,
    pub msg: String,
}

impl FieldError {
    /// The last `loc` element, which names the offending field.
    pub fn field(&self) -> Option<String> {
        self.loc.last().map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}

/// The backend's error payload: a single message or a list of field errors.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Message(String),
    Fields(Vec<FieldError>),
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: ErrorDetail,
}

impl ErrorDetail {
    /// Parse an error response body. Non-JSON bodies are kept as text.
    pub fn from_body(body: &str) -> Self {
        if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
            return parsed.detail;
        }
        let text = body.trim();
        if text.is_empty() {
            ErrorDetail::Message("Request failed".to_string())
        } else {
            ErrorDetail::Message(text.to_string())
        }
    }

    /// Text suitable for inline display; field messages are joined by ", ".
    pub fn display_text(&self) -> String {
        match self {
            ErrorDetail::Message(msg) => msg.clone(),
            ErrorDetail::Fields(fields) => fields
                .iter()
                .map(|f| f.msg.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    pub fn fields(&self) -> &[FieldError] {
        match self {
            ErrorDetail::Message(_) => &[],
            ErrorDetail::Fields(fields) => fields,
        }
    }
}

impl std::fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display_text())
    }
}

/// Errors returned by the client, services and workflows.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("unauthorized: {detail}")]
    Unauthorized { detail: ErrorDetail },

    #[error("forbidden: {detail}")]
    Forbidden { detail: ErrorDetail },

    #[error("not found: {detail}")]
    NotFound { detail: ErrorDetail },

    /// 400 or 422.
    #[error("validation failed ({status}): {detail}")]
    Validation { status: u16, detail: ErrorDetail },

    #[error("conflict: {detail}")]
    Conflict { detail: ErrorDetail },

    #[error("HTTP {status}: {detail}")]
    Http { status: u16, detail: ErrorDetail },

    /// No response was received.
    #[error("transport error: {0}")]
    Transport(String),

    #[error("deserialization failed: {0}")]
    Deserialization(String),

    #[error("serialization failed: {0}")]
    Serialization(String),

    /// An image was rejected before upload.
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

impl ApiError {
    /// Map a non-2xx response to its typed variant.
    pub fn from_response(response: &HttpResponse) -> Self {
        let detail = ErrorDetail::from_body(&response.body);
        match response.status {
            401 => ApiError::Unauthorized { detail },
            403 => ApiError::Forbidden { detail },
            404 => ApiError::NotFound { detail },
            400 | 422 => ApiError::Validation {
                status: response.status,
                detail,
            },
            409 => ApiError::Conflict { detail },
            status => ApiError::Http { status, detail },
        }
    }

    /// HTTP status, when a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::Forbidden { .. } => Some(403),
            ApiError::NotFound { .. } => Some(404),
            ApiError::Validation { status, .. } | ApiError::Http { status, .. } => Some(*status),
            ApiError::Conflict { .. } => Some(409),
            _ => None,
        }
    }

    pub fn detail(&self) -> Option<&ErrorDetail> {
        match self {
            ApiError::Unauthorized { detail }
            | ApiError::Forbidden { detail }
            | ApiError::NotFound { detail }
            | ApiError::Validation { detail, .. }
            | ApiError::Conflict { detail }
            | ApiError::Http { detail, .. } => Some(detail),
            _ => None,
        }
    }

    /// A 401 means the stored session is no longer valid.
    pub fn requires_logout(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }
}
