// Copyright 2026 Paramprobe Contributors
// SPDX-License-Identifier: Apache-2.0

//! Paramprobe library — concurrent form-field prober.
//!
//! This library crate exposes the core modules for integration testing.

#![allow(clippy::new_without_default)]

pub mod extract;
pub mod fetch;
pub mod pipeline;
pub mod sink;
pub mod transform;
