use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Unauthorized,
    Forbidden,
    NotFound,
    Validation,
    RateLimited,
    Internal,
}

impl ErrorCode {
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            400 | 409 | 422 => Self::Validation,
            429 => Self::RateLimited,
            _ => Self::Internal,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    /// Decodes an error response. The API answers either `{"detail": ".."}`
    /// or a map of field names to message lists; anything else is kept raw.
    pub fn from_response(status: u16, body: &str) -> Self {
        let code = ErrorCode::from_status(status);
        let message = match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(map)) => match map.get("detail").and_then(Value::as_str) {
                Some(detail) => detail.to_string(),
                None => map
                    .iter()
                    .map(|(field, errors)| format!("{field}: {}", flatten_messages(errors)))
                    .collect::<Vec<_>>()
                    .join("; "),
            },
            Ok(Value::String(text)) => text,
            _ if body.trim().is_empty() => format!("HTTP {status}"),
            _ => body.trim().to_string(),
        };
        Self { code, message }
    }
}

fn flatten_messages(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(flatten_messages)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}
