//! Decoded responses.
//!
//! The service answers with JSON on success but with plain text (or nothing)
//! on many failures, so a body is either structured or raw and callers have
//! to discriminate before indexing into it.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ApiError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    /// Parses `raw` as JSON, keeping the text when it is not.
    pub fn decode(raw: String) -> Self {
        match serde_json::from_str(&raw) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Text(raw),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(v) => Some(v),
            ResponseBody::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseBody::Json(_) => None,
            ResponseBody::Text(t) => Some(t),
        }
    }

    /// Top-level field of a JSON object body.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.as_json().and_then(|v| v.get(name))
    }

    /// Top-level string field of a JSON object body.
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(Value::as_str)
    }
}

/// Status code plus decoded body of one exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: ResponseBody,
}

impl ApiResponse {
    /// Deserializes a JSON body into `T`.
    pub fn json_as<T: DeserializeOwned>(&self) -> Result<T> {
        match &self.body {
            ResponseBody::Json(value) => {
                serde_json::from_value(value.clone()).map_err(|e| ApiError::Deserialization(e.to_string()))
            }
            ResponseBody::Text(text) => Err(ApiError::UnexpectedBody {
                status: self.status,
                body: text.clone(),
            }),
        }
    }
}
