// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The viral-probability heuristic.
//!
//! A deterministic, piecewise-linear mapping from engagement signals to a
//! probability band. This intentionally replaces an ML model: the mapping
//! is cheap, explainable, and stable under replayed events.
//!
//! ```text
//! viral_score = (1·views + 2·likes + 3·comments + 5·shares + 4·remixes
//!                + velocity·10) · 1/(1 + minutes/60)
//! ```
//!
//! The score is bucketed into a probability, boosted for high velocity
//! (clamped to 1.0), paired with a confidence band driven by total
//! activity, and a predicted peak ETA driven by velocity.

use crate::aggregate::{ViralForecast, ViralSignals};

// =============================================================================
// Constants
// =============================================================================

/// View weight in the viral engagement score.
pub const VIRAL_VIEW_WEIGHT: f64 = 1.0;
/// Like weight in the viral engagement score.
pub const VIRAL_LIKE_WEIGHT: f64 = 2.0;
/// Comment weight in the viral engagement score.
pub const VIRAL_COMMENT_WEIGHT: f64 = 3.0;
/// Share weight in the viral engagement score.
pub const VIRAL_SHARE_WEIGHT: f64 = 5.0;
/// Remix weight in the viral engagement score.
pub const VIRAL_REMIX_WEIGHT: f64 = 4.0;

/// Multiplier applied to engagement velocity before bucketing.
pub const VELOCITY_FACTOR: f64 = 10.0;

// =============================================================================
// Heuristic
// =============================================================================

/// Computes the viral forecast for the given signals.
///
/// The returned probability and confidence are always within [0, 1] and
/// the peak ETA is always positive.
pub fn forecast(signals: &ViralSignals) -> ViralForecast {
    let engagement = signals.view_count as f64 * VIRAL_VIEW_WEIGHT
        + signals.like_count as f64 * VIRAL_LIKE_WEIGHT
        + signals.comment_count as f64 * VIRAL_COMMENT_WEIGHT
        + signals.share_count as f64 * VIRAL_SHARE_WEIGHT
        + signals.remix_count as f64 * VIRAL_REMIX_WEIGHT;

    let velocity_factor = signals.engagement_velocity * VELOCITY_FACTOR;

    let time_decay = if signals.minutes_elapsed > 0 {
        1.0 / (1.0 + signals.minutes_elapsed as f64 / 60.0)
    } else {
        1.0
    };

    let viral_score = (engagement + velocity_factor) * time_decay;

    let probability = boost_probability(bucket_probability(viral_score), signals.engagement_velocity);

    ViralForecast {
        viral_probability: probability,
        confidence: confidence(signals.total_activity()),
        predicted_peak_minutes: predicted_peak_minutes(signals.engagement_velocity),
    }
}

/// Maps a viral score to its probability bucket.
fn bucket_probability(viral_score: f64) -> f64 {
    if viral_score > 200.0 {
        0.95
    } else if viral_score > 150.0 {
        0.85
    } else if viral_score > 100.0 {
        0.75
    } else if viral_score > 70.0 {
        0.65
    } else if viral_score > 50.0 {
        0.55
    } else if viral_score > 30.0 {
        0.40
    } else if viral_score > 20.0 {
        0.30
    } else if viral_score > 10.0 {
        0.20
    } else if viral_score > 5.0 {
        0.10
    } else {
        0.05
    }
}

/// Boosts the probability for fast-moving posts, clamped to 1.0.
fn boost_probability(probability: f64, velocity: f64) -> f64 {
    if velocity > 20.0 {
        (probability * 1.2).min(1.0)
    } else if velocity > 10.0 {
        (probability * 1.1).min(1.0)
    } else {
        probability
    }
}

/// Maps total observed activity to a confidence band.
fn confidence(total_activity: u64) -> f64 {
    if total_activity > 1000 {
        0.95
    } else if total_activity > 500 {
        0.90
    } else if total_activity > 100 {
        0.85
    } else if total_activity > 50 {
        0.75
    } else if total_activity > 10 {
        0.65
    } else {
        0.50
    }
}

/// Maps engagement velocity to a predicted minutes-to-peak.
fn predicted_peak_minutes(velocity: f64) -> u32 {
    if velocity > 20.0 {
        15
    } else if velocity > 10.0 {
        30
    } else if velocity > 5.0 {
        45
    } else if velocity > 2.0 {
        90
    } else {
        120
    }
}

// =============================================================================
// Tests
// =============================================================================
