// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # pulse-tests
//!
//! Shared builders, fixtures, and mocks for testing Pulse components, plus
//! the cross-crate integration tests under `tests/`.

#![deny(unsafe_code)]

pub mod common;
