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

//! PhyloBench CLI library for command-line parsing and execution.
//!
//! # Commands
//!
//! - **run**: Benchmark one method on one alignment with the native tool
//!   and write the resulting record
//! - **aggregate**: Load native and sandboxed records and write the
//!   Markdown, CSV and JSON comparison reports
//!
//! # Examples
//!
//! ```no_run
//! use phylobench_cli::commands::{aggregate, AggregateOptions};
//!
//! # fn main() -> Result<(), phylobench_cli::error::CliError> {
//! let options = AggregateOptions {
//!     native_dir: Some("results/native".into()),
//!     wasm_dir: Some("results/wasm".into()),
//!     output_md: "summary.md".into(),
//!     output_csv: "summary.csv".into(),
//!     output_json: "summary.json".into(),
//!     ..AggregateOptions::default()
//! };
//! aggregate(&options)?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod commands;
pub mod error;
