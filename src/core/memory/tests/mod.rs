// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! Memory Bus Tests
//!
//! - `bus`: routing, alignment, range checks and fault recording
//! - `trace`: access trace recording
//! - `helpers`: Common test utilities

use super::*;

mod helpers;
