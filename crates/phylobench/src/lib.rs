// Dweve PhyloBench - Cross-Platform Phylogenetics Benchmarking
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! PhyloBench
//!
//! Benchmark statistics and cross-platform aggregation for HyPhy runs on
//! two platforms: the natively invoked binary and the WebAssembly build
//! running in a browser.
//!
//! ## Pipeline
//!
//! 1. [`harness::BenchmarkRunner`] runs the trials of one configuration and
//!    reduces them with [`harness::compute_statistics`] into a
//!    [`BenchmarkRecord`].
//! 2. [`loader`] reads the persisted records of each platform, skipping
//!    malformed files.
//! 3. [`harness::aggregate`] joins both platforms per (dataset, method) and
//!    derives the sandboxed overhead against the native baseline.
//! 4. [`reporters`] render the JSON summary, the Markdown comparison and
//!    the flat CSV export.
//!
//! ## Usage
//!
//! ```no_run
//! use phylobench::core::{AggregateConfig, Platform};
//! use phylobench::loader::load_platform;
//! use phylobench::reporters::{render_markdown, CrossPlatformReport};
//! use std::path::Path;
//!
//! # fn main() -> phylobench::Result<()> {
//! let native = load_platform(Some(Path::new("results/native")), Platform::Native)?;
//! let wasm = load_platform(Some(Path::new("results/wasm")), Platform::Wasm)?;
//! let report = CrossPlatformReport::build(
//!     native.records,
//!     wasm.records,
//!     &AggregateConfig::default(),
//!     chrono::Utc::now(),
//! );
//! println!("{}", render_markdown(&report));
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod error;
pub mod harness;
pub mod loader;
pub mod reporters;

pub use crate::core::{
    AggregateConfig, BenchmarkRecord, ConfigurationKey, CpuSetting, Iteration, Platform,
    RunConfig, StatisticsSummary,
};
pub use error::{BenchError, Result};
pub use reporters::CrossPlatformReport;
