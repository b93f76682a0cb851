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

//! JSON export for cross-platform reports.

use crate::core::BenchmarkRecord;
use crate::error::Result;
use crate::harness::aggregator::{ComparisonRow, OverheadSummary};
use crate::reporters::types::CrossPlatformReport;
use crate::reporters::write_output;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSummary<'a> {
    title: &'a str,
    generated: String,
    total_benchmarks: usize,
    native_benchmarks: usize,
    wasm_benchmarks: usize,
    datasets: Vec<String>,
    methods: Vec<String>,
    cpu_configs: Vec<String>,
    browsers: Vec<String>,
    comparisons: Vec<JsonComparison<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    overhead_summary: Option<JsonOverhead>,
    native: &'a [BenchmarkRecord],
    wasm: &'a [BenchmarkRecord],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonComparison<'a> {
    dataset: &'a str,
    method: &'a str,
    problem_size: String,
    native_baseline_ms: Option<f64>,
    native_parallel_ms: Option<f64>,
    wasm_ms: Option<f64>,
    overhead_pct: Option<f64>,
}

impl<'a> From<&'a ComparisonRow> for JsonComparison<'a> {
    fn from(row: &'a ComparisonRow) -> Self {
        Self {
            dataset: &row.dataset,
            method: &row.method,
            problem_size: row.problem_size_label(),
            native_baseline_ms: row.native_baseline.value(),
            native_parallel_ms: row.native_parallel.value(),
            wasm_ms: row.sandboxed.value(),
            overhead_pct: row.overhead_pct,
        }
    }
}

#[derive(Serialize)]
struct JsonOverhead {
    count: usize,
    mean: f64,
    min: f64,
    max: f64,
}

impl From<&OverheadSummary> for JsonOverhead {
    fn from(summary: &OverheadSummary) -> Self {
        Self {
            count: summary.count,
            mean: summary.mean,
            min: summary.min,
            max: summary.max,
        }
    }
}

/// Renders the structured summary as pretty-printed JSON.
pub fn render_json(report: &CrossPlatformReport) -> Result<String> {
    let summary = JsonSummary {
        title: &report.title,
        generated: report.generated_label(),
        total_benchmarks: report.total_records(),
        native_benchmarks: report.native.len(),
        wasm_benchmarks: report.sandboxed.len(),
        datasets: report.datasets(),
        methods: report.methods(),
        cpu_configs: report.cpu_configs(),
        browsers: report.browsers(),
        comparisons: report.aggregation.rows.iter().map(JsonComparison::from).collect(),
        overhead_summary: report.aggregation.overhead.as_ref().map(JsonOverhead::from),
        native: &report.native,
        wasm: &report.sandboxed,
    };

    Ok(serde_json::to_string_pretty(&summary)?)
}

/// Exports the structured summary to `path`.
pub fn export_json(report: &CrossPlatformReport, path: &Path) -> Result<()> {
    let json = render_json(report)?;
    write_output(path, &json)
}
