// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Success response envelopes.
//!
//! Every success body carries `"status": "success"`; list responses add a
//! `count`, single-record responses a `data` field. `/health` is the one
//! raw body without the envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

// =============================================================================
// Envelope
// =============================================================================

/// The standard success envelope.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    /// Always `success`.
    pub status: &'static str,
    /// Item count for list responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    /// The payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl Envelope<()> {
    /// A bare `{"status":"success"}` acknowledgement.
    pub fn success() -> Self {
        Self {
            status: "success",
            count: None,
            data: None,
        }
    }
}

impl<T: Serialize> Envelope<T> {
    /// Wraps a single record.
    pub fn data(value: T) -> Self {
        Self {
            status: "success",
            count: None,
            data: Some(value),
        }
    }
}

impl<T: Serialize> Envelope<Vec<T>> {
    /// Wraps a list with its count.
    pub fn list(items: Vec<T>) -> Self {
        Self {
            status: "success",
            count: Some(items.len()),
            data: Some(items),
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

// =============================================================================
// Content Acceptance
// =============================================================================

/// The `POST /api/events/content` response: the acknowledgement plus the
/// derived metadata.
#[derive(Debug, Serialize)]
pub struct ContentAccepted {
    /// Always `success`.
    pub status: &'static str,
    /// Derived keywords.
    pub keywords: Vec<String>,
    /// Derived category.
    pub category: String,
    /// Derived style.
    pub style: String,
}

impl ContentAccepted {
    /// Builds the acknowledgement from an enriched event.
    pub fn new(keywords: Vec<String>, category: String, style: String) -> Self {
        Self {
            status: "success",
            keywords,
            category,
            style,
        }
    }
}

impl IntoResponse for ContentAccepted {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_success() {
        let json = serde_json::to_value(Envelope::success()).unwrap();
        assert_eq!(json, serde_json::json!({"status": "success"}));
    }

    #[test]
    fn test_data_envelope() {
        let json = serde_json::to_value(Envelope::data(42)).unwrap();
        assert_eq!(json, serde_json::json!({"status": "success", "data": 42}));
    }

    #[test]
    fn test_list_envelope_counts() {
        let json = serde_json::to_value(Envelope::list(vec!["a", "b"])).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": "success", "count": 2, "data": ["a", "b"]})
        );
    }

    #[test]
    fn test_empty_list_envelope() {
        let json = serde_json::to_value(Envelope::list(Vec::<String>::new())).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": "success", "count": 0, "data": []})
        );
    }

    #[test]
    fn test_content_accepted_shape() {
        let response = ContentAccepted::new(
            vec!["image".to_string(), "sunset".to_string()],
            "image".to_string(),
            "general".to_string(),
        );
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["keywords"][1], "sunset");
        assert_eq!(json["style"], "general");
    }
}
