//! # Response Formatting
//!
//! Response bodies are flat JSON objects whose keys depend on the resource,
//! e.g. `{"message": "...", "company": {...}}`.

use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{Map, Value};

use super::errors::{ApiError, ApiResult};

/// JSON object response built key by key
#[derive(Debug, Clone, Default)]
pub struct Envelope(Map<String, Value>);

impl Envelope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `message` entry
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.0.insert("message".to_string(), Value::String(message.into()));
        self
    }

    /// Add `key` holding the serialized `value`
    pub fn with(mut self, key: &str, value: impl Serialize) -> ApiResult<Self> {
        let value = serde_json::to_value(value).map_err(|e| ApiError::Encode(e.to_string()))?;
        self.0.insert(key.to_string(), value);
        Ok(self)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        Json(self.into_value()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_keys() {
        let body = Envelope::new()
            .message("Company created successfully")
            .with("company", json!({"id": 1}))
            .unwrap()
            .into_value();

        assert_eq!(
            body,
            json!({"message": "Company created successfully", "company": {"id": 1}})
        );
    }

    #[test]
    fn test_list_envelope() {
        let body = Envelope::new()
            .with("realEstate", Vec::<Value>::new())
            .unwrap()
            .into_value();
        assert_eq!(body, json!({"realEstate": []}));
    }
}
