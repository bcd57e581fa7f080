// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The verification layer: invariant errors and runtime contracts.
//!
//! Two complementary approaches to catching bugs:
//!
//! 1. **Invariant errors** (`InvariantError`) returned by the stages whose
//!    inputs can be corrupted upstream. These abort the run in every build.
//!
//! 2. **Runtime contracts** that panic in debug builds when a stage's own output
//!    breaks a property it promises. Zero-cost in release, but catch bugs while
//!    the tests run.

mod types;
pub mod contracts;

pub use types::*;
