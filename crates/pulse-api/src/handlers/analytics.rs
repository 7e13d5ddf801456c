// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Analytics read handlers.

use std::collections::HashMap;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use pulse_core::aggregate::{Recommendation, TrendingScore};
use pulse_core::types::{PostId, UserId};
use pulse_engine::{ContentTypeMetrics, CreatorMetrics, DashboardMetrics, EngagementTrend};
use pulse_store::DocumentStore;

use crate::error::{ApiError, ApiResult};
use crate::response::Envelope;
use crate::state::AppState;

fn decode_query<T>(query: Result<Query<T>, QueryRejection>) -> ApiResult<T> {
    match query {
        Ok(Query(value)) => Ok(value),
        Err(rejection) => Err(ApiError::bad_request(rejection.body_text())),
    }
}

/// Validates a limit-style parameter against its documented range.
fn bounded(value: Option<i64>, default: i64, max: i64, what: &str) -> ApiResult<usize> {
    let value = value.unwrap_or(default);
    if value <= 0 || value > max {
        return Err(ApiError::bad_request(format!(
            "Invalid {what} parameter. Must be between 1 and {max}"
        )));
    }
    Ok(value as usize)
}

// =============================================================================
// Trending
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct TrendingQuery {
    limit: Option<i64>,
    /// Optional content-type filter for the feed.
    #[serde(rename = "type")]
    content_type: Option<String>,
}

/// `GET /api/analytics/trending?limit=[1..100]&type=<content_type>`
pub async fn trending(
    State(state): State<AppState>,
    query: Result<Query<TrendingQuery>, QueryRejection>,
) -> ApiResult<Envelope<Vec<TrendingScore>>> {
    let query = decode_query(query)?;
    let limit = bounded(query.limit, 20, 100, "limit")?;

    let posts = match query.content_type.as_deref() {
        Some(content_type) => {
            state
                .analytics
                .trending_by_content_type(content_type, limit)
                .await?
        }
        None => state.analytics.trending_with_content(limit).await?,
    };

    Ok(Envelope::list(posts))
}

// =============================================================================
// Post Stats
// =============================================================================

/// `GET /api/analytics/post/{id}/stats`
pub async fn post_stats(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Envelope<TrendingScore>> {
    if id.is_empty() {
        return Err(ApiError::bad_request("Post ID is required"));
    }

    let stats = state
        .store
        .get_post_stats(&PostId::new(&id))
        .await?
        .ok_or_else(|| ApiError::not_found("Post"))?;

    Ok(Envelope::data(stats))
}

// =============================================================================
// Recommendations
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    limit: Option<i64>,
}

/// `GET /api/analytics/user/{id}/recommendations?limit=[1..50]`
pub async fn user_recommendations(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<LimitQuery>, QueryRejection>,
) -> ApiResult<Envelope<Vec<Recommendation>>> {
    if id.is_empty() {
        return Err(ApiError::bad_request("User ID is required"));
    }

    let query = decode_query(query)?;
    let limit = bounded(query.limit, 10, 50, "limit")?;

    let recommendations = state
        .store
        .get_user_recommendations(&UserId::new(&id), limit)
        .await?;

    Ok(Envelope::list(recommendations))
}

// =============================================================================
// Dashboard
// =============================================================================

/// `GET /api/analytics/dashboard/metrics`
pub async fn dashboard_metrics(
    State(state): State<AppState>,
) -> ApiResult<Envelope<DashboardMetrics>> {
    let metrics = state.analytics.dashboard_metrics().await?;
    Ok(Envelope::data(metrics))
}

/// `GET /api/analytics/dashboard/top-creators?limit=[1..50]`
pub async fn top_creators(
    State(state): State<AppState>,
    query: Result<Query<LimitQuery>, QueryRejection>,
) -> ApiResult<Envelope<Vec<CreatorMetrics>>> {
    let query = decode_query(query)?;
    let limit = bounded(query.limit, 10, 50, "limit")?;

    let creators = state.analytics.top_creators(limit).await?;
    Ok(Envelope::list(creators))
}

/// `GET /api/analytics/dashboard/content-types`
pub async fn content_types(
    State(state): State<AppState>,
) -> ApiResult<Envelope<HashMap<String, ContentTypeMetrics>>> {
    let breakdown = state.analytics.content_type_breakdown().await?;
    Ok(Envelope::data(breakdown))
}

#[derive(Debug, Deserialize)]
pub struct TrendsQuery {
    days: Option<i64>,
}

/// `GET /api/analytics/dashboard/trends?days=[1..30]`
pub async fn engagement_trends(
    State(state): State<AppState>,
    query: Result<Query<TrendsQuery>, QueryRejection>,
) -> ApiResult<Envelope<Vec<EngagementTrend>>> {
    let query = decode_query(query)?;
    let days = bounded(query.days, 7, 30, "days")?;

    let trends = state.analytics.engagement_trends(days as u32).await?;
    Ok(Envelope::list(trends))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_defaults() {
        assert_eq!(bounded(None, 20, 100, "limit").unwrap(), 20);
        assert_eq!(bounded(Some(5), 20, 100, "limit").unwrap(), 5);
        assert_eq!(bounded(Some(100), 20, 100, "limit").unwrap(), 100);
    }

    #[test]
    fn test_bounded_rejects_out_of_range() {
        assert!(bounded(Some(0), 20, 100, "limit").is_err());
        assert!(bounded(Some(-3), 20, 100, "limit").is_err());
        assert!(bounded(Some(101), 20, 100, "limit").is_err());

        let error = bounded(Some(200), 7, 30, "days").unwrap_err();
        assert_eq!(
            error.to_string(),
            "Invalid days parameter. Must be between 1 and 30"
        );
    }
}
