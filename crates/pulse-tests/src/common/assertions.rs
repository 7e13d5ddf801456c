// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Assertion helpers.

use pulse_core::aggregate::TrendingScore;

/// Asserts two floats are within `epsilon` of each other.
pub fn assert_close(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "expected {expected} ± {epsilon}, got {actual}"
    );
}

/// Asserts aggregates are in non-increasing score order.
pub fn assert_sorted_by_score_desc(scores: &[TrendingScore]) {
    for window in scores.windows(2) {
        assert!(
            window[0].score >= window[1].score,
            "scores out of order: {} ({}) before {} ({})",
            window[0].post_id,
            window[0].score,
            window[1].post_id,
            window[1].score
        );
    }
}
