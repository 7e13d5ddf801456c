// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Event ingestion handlers.
//!
//! Each endpoint decodes the event, lets the processor stamp and forward
//! it, and answers 200 once the bus publish succeeded. Store writes behind
//! the publish are best-effort and never fail the request.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use pulse_core::error::PulseError;
use pulse_core::event::{ContentCreated, InteractionEvent, RemixEvent, ViewEvent};

use crate::error::{ApiError, ApiResult};
use crate::response::{ContentAccepted, Envelope};
use crate::state::AppState;

/// Maps a processor failure onto the endpoint's error contract: invalid
/// input is the caller's fault, everything else is a 500 with a stable
/// message.
fn ingest_error(error: PulseError, what: &str) -> ApiError {
    match error {
        PulseError::InvalidInput { message } => ApiError::bad_request(message),
        _ => ApiError::internal(format!("Failed to process {what}")),
    }
}

fn decode<T>(body: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(ApiError::bad_request(rejection.body_text())),
    }
}

/// `POST /api/events/interaction`
pub async fn ingest_interaction(
    State(state): State<AppState>,
    body: Result<Json<InteractionEvent>, JsonRejection>,
) -> ApiResult<Envelope<()>> {
    let event = decode(body)?;

    state
        .processor
        .process_interaction(event)
        .await
        .map_err(|e| ingest_error(e, "interaction"))?;

    Ok(Envelope::success())
}

/// `POST /api/events/content`
///
/// The response echoes the derived keywords, category, and style.
pub async fn ingest_content(
    State(state): State<AppState>,
    body: Result<Json<ContentCreated>, JsonRejection>,
) -> ApiResult<ContentAccepted> {
    let event = decode(body)?;

    let enriched = state
        .processor
        .process_content(event)
        .await
        .map_err(|e| ingest_error(e, "content metadata"))?;

    Ok(ContentAccepted::new(
        enriched.keywords,
        enriched.category.unwrap_or_default(),
        enriched.style.unwrap_or_default(),
    ))
}

/// `POST /api/events/view`
pub async fn ingest_view(
    State(state): State<AppState>,
    body: Result<Json<ViewEvent>, JsonRejection>,
) -> ApiResult<Envelope<()>> {
    let event = decode(body)?;

    state
        .processor
        .process_view(event)
        .await
        .map_err(|e| ingest_error(e, "view"))?;

    Ok(Envelope::success())
}

/// `POST /api/events/remix`
pub async fn ingest_remix(
    State(state): State<AppState>,
    body: Result<Json<RemixEvent>, JsonRejection>,
) -> ApiResult<Envelope<()>> {
    let event = decode(body)?;

    state
        .processor
        .process_remix(event)
        .await
        .map_err(|e| ingest_error(e, "remix"))?;

    Ok(Envelope::success())
}

// =============================================================================
// Tests
// =============================================================================
