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

//! Benchmark harness.
//!
//! # Modules
//!
//! - `statistics`: Reduction of trial outcomes to summary statistics
//! - `runner`: Sequential trial execution and record assembly
//! - `aggregator`: Cross-platform join and overhead derivation

pub mod aggregator;
pub mod runner;
pub mod statistics;

pub use aggregator::{
    aggregate, index_records, overhead_pct, record_precedence, summarize_overhead, Aggregation,
    ComparisonRow, MeanCell, OverheadSummary, ScalingRow, ScalingTable,
};
pub use runner::{
    probe_version, probe_version_within, BenchmarkRunner, NativeExecutor, RunSpec,
    SandboxSession, TrialExecutor, VERSION_PROBE_TIMEOUT,
};
pub use statistics::{compute_statistics, summarize_samples};
