// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The trending-score engine.
//!
//! All scoring in Pulse funnels through this module so the weights and
//! decay constants exist exactly once. Two variants are provided:
//!
//! - [`trending_score`] - the canonical formula: weighted engagement with
//!   exponential time decay, a velocity component, and a recency bonus.
//! - [`instant_score`] - the raw weighted sum used by the hot-path
//!   increment helpers. It omits decay, velocity, and recency; the
//!   periodic refresher reconciles it to the canonical value.
//!
//! # Formula
//!
//! ```text
//! hours_age  = max(0.1, now − created_at)
//! base       = 0.1·views + 1·likes + 2·comments + 3·shares + 5·remixes
//! velocity   = (likes + comments + shares + remixes) / hours_age
//! decay      = 1 / (1 + 0.03·hours_age)          (≈ 23 h half-life)
//! recency    = 10 · max(0, 1 − hours_age / 24)
//! score      = base·decay + 5·velocity + recency
//! ```

use chrono::{DateTime, Utc};

use crate::aggregate::TrendingScore;

// =============================================================================
// Constants
// =============================================================================

/// Weight of a view in the base score.
pub const VIEW_WEIGHT: f64 = 0.1;
/// Weight of a like in the base score.
pub const LIKE_WEIGHT: f64 = 1.0;
/// Weight of a comment in the base score.
pub const COMMENT_WEIGHT: f64 = 2.0;
/// Weight of a share in the base score.
pub const SHARE_WEIGHT: f64 = 3.0;
/// Weight of a remix in the base score.
pub const REMIX_WEIGHT: f64 = 5.0;

/// Exponential decay constant; yields a half-life of roughly 23 hours.
pub const DECAY_LAMBDA: f64 = 0.03;

/// The recency bonus at age zero.
pub const RECENCY_MAX_BONUS: f64 = 10.0;
/// Hours over which the recency bonus ramps linearly to zero.
pub const RECENCY_WINDOW_HOURS: f64 = 24.0;

/// Weight of the velocity component in the final score.
pub const VELOCITY_WEIGHT: f64 = 5.0;

/// Minimum post age used in the formula; younger posts behave as this age.
pub const MIN_AGE_HOURS: f64 = 0.1;

// =============================================================================
// Scoring Functions
// =============================================================================

/// Returns the post age in hours, clamped to [`MIN_AGE_HOURS`].
pub fn hours_since(created_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let hours = now.signed_duration_since(created_at).num_seconds() as f64 / 3600.0;
    hours.max(MIN_AGE_HOURS)
}

/// The weighted base score over all counters, views included.
pub fn base_score(score: &TrendingScore) -> f64 {
    score.view_count as f64 * VIEW_WEIGHT
        + score.like_count as f64 * LIKE_WEIGHT
        + score.comment_count as f64 * COMMENT_WEIGHT
        + score.share_count as f64 * SHARE_WEIGHT
        + score.remix_count as f64 * REMIX_WEIGHT
}

/// The hot-path approximation: the raw weighted sum with no decay.
///
/// Used when bumping an aggregate inline on an increment; the refresher
/// replaces it with the canonical [`trending_score`] on its next pass.
#[inline]
pub fn instant_score(score: &TrendingScore) -> f64 {
    base_score(score)
}

/// Non-view engagement per hour at the given age.
pub fn engagement_velocity(score: &TrendingScore, hours_age: f64) -> f64 {
    score.total_engagement() as f64 / hours_age
}

/// The multiplicative time-decay factor at the given age.
pub fn time_decay(hours_age: f64) -> f64 {
    1.0 / (1.0 + DECAY_LAMBDA * hours_age)
}

/// The recency bonus at the given age.
pub fn recency_bonus(hours_age: f64) -> f64 {
    RECENCY_MAX_BONUS * (1.0 - hours_age / RECENCY_WINDOW_HOURS).max(0.0)
}

/// The canonical trending score for an aggregate whose post was created at
/// `created_at`, evaluated at `now`.
pub fn trending_score(score: &TrendingScore, created_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let hours_age = hours_since(created_at, now);

    base_score(score) * time_decay(hours_age)
        + VELOCITY_WEIGHT * engagement_velocity(score, hours_age)
        + recency_bonus(hours_age)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PostId;
    use chrono::Duration;

    fn counts(views: u64, likes: u64, comments: u64, shares: u64, remixes: u64) -> TrendingScore {
        let mut score = TrendingScore::new(PostId::new("p"));
        score.view_count = views;
        score.like_count = likes;
        score.comment_count = comments;
        score.share_count = shares;
        score.remix_count = remixes;
        score
    }

    fn assert_close(actual: f64, expected: f64, epsilon: f64) {
        assert!(
            (actual - expected).abs() < epsilon,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_moderate_content_scenario() {
        // 15 views, 8 likes, age 2h:
        //   base = 0.1·15 + 8 = 9.5
        //   velocity = 8 / 2 = 4
        //   decay = 1 / 1.06
        //   recency = 10 · (1 − 2/24)
        let score = counts(15, 8, 0, 0, 0);
        let now = Utc::now();
        let created = now - Duration::hours(2);

        let result = trending_score(&score, created, now);
        assert_close(result, 38.13, 0.05);
    }

    #[test]
    fn test_base_score_weights() {
        let score = counts(10, 3, 2, 1, 1);
        assert_close(base_score(&score), 1.0 + 3.0 + 4.0 + 3.0 + 5.0, 1e-9);
    }

    #[test]
    fn test_weight_additivity() {
        // One extra like raises the base by exactly 1.0 at identical age.
        let a = counts(100, 10, 5, 2, 1);
        let b = counts(100, 11, 5, 2, 1);
        assert_close(base_score(&b) - base_score(&a), LIKE_WEIGHT, 1e-9);

        // A like→comment swap at equal total engagement raises base by 1.0.
        let c = counts(100, 9, 6, 2, 1);
        assert_eq!(a.total_engagement(), c.total_engagement());
        assert_close(base_score(&c) - base_score(&a), 1.0, 1e-9);
    }

    #[test]
    fn test_age_clamp() {
        let now = Utc::now();
        assert_close(hours_since(now, now), MIN_AGE_HOURS, 1e-9);
        assert_close(
            hours_since(now + Duration::hours(5), now),
            MIN_AGE_HOURS,
            1e-9,
        );
        assert_close(hours_since(now - Duration::hours(3), now), 3.0, 1e-3);
    }

    #[test]
    fn test_recency_bonus_endpoints() {
        assert_close(recency_bonus(0.0), 10.0, 1e-9);
        assert_close(recency_bonus(12.0), 5.0, 1e-9);
        assert_close(recency_bonus(24.0), 0.0, 1e-9);
        assert_close(recency_bonus(48.0), 0.0, 1e-9);
    }

    #[test]
    fn test_time_decay_strictly_decreasing() {
        let mut previous = time_decay(MIN_AGE_HOURS);
        for age in [1.0, 2.0, 6.0, 12.0, 24.0, 48.0, 96.0] {
            let decay = time_decay(age);
            assert!(decay < previous);
            previous = decay;
        }
    }

    #[test]
    fn test_score_monotonic_past_recency_window() {
        // With identical counts and both ages past 24 h, the younger post
        // always scores higher.
        let score = counts(500, 50, 20, 10, 5);
        let now = Utc::now();

        let mut previous = f64::INFINITY;
        for age_hours in [24, 30, 48, 72, 168, 720] {
            let created = now - Duration::hours(age_hours);
            let result = trending_score(&score, created, now);
            assert!(
                result < previous,
                "score must decrease with age (age={age_hours}h)"
            );
            previous = result;
        }
    }

    #[test]
    fn test_instant_score_matches_base() {
        let score = counts(100, 20, 5, 3, 2);
        assert_close(instant_score(&score), base_score(&score), 1e-9);
    }

    #[test]
    fn test_zero_counts_score_is_recency_only() {
        let score = counts(0, 0, 0, 0, 0);
        let now = Utc::now();
        let result = trending_score(&score, now, now);
        // base and velocity are zero, so only the recency bonus remains.
        assert_close(result, recency_bonus(MIN_AGE_HOURS), 1e-9);
    }
}
