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

//! Aggregate command - joins native and WASM results into reports

use crate::error::Result;
use chrono::Utc;
use phylobench::core::config::{DEFAULT_BASELINE_CPU, DEFAULT_BROWSER};
use phylobench::loader::{load_partitioned, load_platform, LoadedRecords};
use phylobench::reporters::markdown::format_overhead;
use phylobench::reporters::{export_csv, export_json, export_markdown, DEFAULT_TITLE};
use phylobench::{AggregateConfig, CpuSetting, CrossPlatformReport, Platform};
use std::path::PathBuf;
use tracing::warn;

/// Arguments of the `aggregate` subcommand.
#[derive(Debug, Clone)]
pub struct AggregateOptions {
    pub native_dir: Option<PathBuf>,
    pub wasm_dir: Option<PathBuf>,
    pub input_dir: Option<PathBuf>,
    pub baseline_cpu: CpuSetting,
    pub browser: String,
    pub title: String,
    pub output_md: PathBuf,
    pub output_csv: PathBuf,
    pub output_json: PathBuf,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            native_dir: None,
            wasm_dir: None,
            input_dir: None,
            baseline_cpu: DEFAULT_BASELINE_CPU,
            browser: DEFAULT_BROWSER.to_string(),
            title: DEFAULT_TITLE.to_string(),
            output_md: PathBuf::from("summary.md"),
            output_csv: PathBuf::from("summary.csv"),
            output_json: PathBuf::from("summary.json"),
        }
    }
}

/// What an aggregation run loaded and produced.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateSummary {
    pub native: usize,
    pub sandboxed: usize,
    pub skipped: usize,
    pub comparisons: usize,
}

/// Loads all records, aggregates them and writes the three reports.
///
/// # Errors
///
/// Returns `Err` if the configuration is invalid, an existing results path
/// cannot be listed, or a report cannot be written.
pub fn aggregate(options: &AggregateOptions) -> Result<AggregateSummary> {
    let config = AggregateConfig::new()
        .with_baseline_cpu(options.baseline_cpu)
        .with_browser(options.browser.clone());
    config.validate()?;

    let mut native = load_platform(options.native_dir.as_deref(), Platform::Native)?;
    let mut sandboxed = load_platform(options.wasm_dir.as_deref(), Platform::Wasm)?;
    if let Some(dir) = &options.input_dir {
        let legacy = load_partitioned(Some(dir))?;
        native.extend(legacy.native);
        sandboxed.extend(legacy.sandboxed);
    }

    let skipped = report_skipped(&native) + report_skipped(&sandboxed);
    println!(
        "Loaded {} native and {} WASM benchmark results",
        native.len(),
        sandboxed.len()
    );

    let report = CrossPlatformReport::build(native.records, sandboxed.records, &config, Utc::now())
        .with_title(options.title.clone());

    export_markdown(&report, &options.output_md)?;
    export_csv(&report, &options.output_csv)?;
    export_json(&report, &options.output_json)?;

    let comparisons = report
        .aggregation
        .overhead
        .as_ref()
        .map_or(0, |summary| summary.count);
    if let Some(summary) = &report.aggregation.overhead {
        println!(
            "Average WASM overhead: {} across {} comparisons",
            format_overhead(Some(summary.mean)),
            summary.count
        );
    }
    println!("Markdown report: {}", options.output_md.display());
    println!("CSV report: {}", options.output_csv.display());
    println!("JSON report: {}", options.output_json.display());

    Ok(AggregateSummary {
        native: report.native.len(),
        sandboxed: report.sandboxed.len(),
        skipped,
        comparisons,
    })
}

fn report_skipped(loaded: &LoadedRecords) -> usize {
    for file in &loaded.skipped {
        warn!("Skipped {}: {}", file.path.display(), file.reason);
    }
    loaded.skipped.len()
}
