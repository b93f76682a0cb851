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

//! Property-based tests for statistics and report determinism.
//!
//! - Standard error is the standard deviation over √n
//! - A single sample has zero spread
//! - Reports do not depend on record discovery order
//! - Rendering twice yields identical output

use chrono::{TimeZone, Utc};
use phylobench::core::{
    AggregateConfig, BenchmarkRecord, CpuSetting, Iteration, Platform, StatisticsSummary,
};
use phylobench::harness::{compute_statistics, overhead_pct};
use phylobench::reporters::{render_csv, render_json, render_markdown, CrossPlatformReport};
use proptest::prelude::*;

// ===== Generators =====

fn elapsed_ms() -> impl Strategy<Value = f64> {
    1.0f64..100_000.0
}

fn record_for(
    platform: Platform,
    dataset: &str,
    method: &str,
    axis: usize,
    times: &[f64],
) -> BenchmarkRecord {
    let iterations: Vec<Iteration> = times
        .iter()
        .enumerate()
        .map(|(i, &t)| Iteration::succeeded(i as u32 + 1, t))
        .collect();
    let statistics = compute_statistics(&iterations);
    let (cpu, browser) = match platform {
        Platform::Native => (Some(CpuSetting::from_count(axis as u32)), None),
        Platform::Wasm => (None, Some(["chromium", "firefox", "webkit"][axis % 3].to_string())),
    };

    BenchmarkRecord {
        platform,
        dataset: dataset.to_string(),
        method: method.to_string(),
        cpu,
        browser,
        sequences: 10,
        sites: 300,
        iterations,
        statistics,
        system_info: None,
        hyphy_version: None,
        timestamp: None,
    }
}

/// A second record for the same key; empty `times` yields a failed run.
fn duplicate_for(
    platform: Platform,
    dataset: &str,
    method: &str,
    axis: usize,
    times: &[f64],
    sequences: u64,
) -> BenchmarkRecord {
    let mut record = record_for(platform, dataset, method, axis, times);
    record.sequences = sequences;
    record
}

type Duplicate = Option<(Vec<f64>, u64)>;

fn duplicates(len: usize) -> impl Strategy<Value = Vec<Duplicate>> {
    prop::collection::vec(
        prop::option::of((prop::collection::vec(elapsed_ms(), 0..3), 10u64..12)),
        len,
    )
}

/// Records on both platforms, with some keys carrying a second record.
fn record_sets() -> impl Strategy<Value = (Vec<BenchmarkRecord>, Vec<BenchmarkRecord>)> {
    let datasets = ["bglobin", "camelid", "h3"];
    let methods = ["fel", "meme"];
    let mut native = Vec::new();
    let mut wasm = Vec::new();
    for dataset in datasets {
        for method in methods {
            for axis in [0usize, 1, 4] {
                native.push((dataset, method, axis));
            }
            for axis in 0..3usize {
                wasm.push((dataset, method, axis));
            }
        }
    }

    let native_len = native.len();
    let wasm_len = wasm.len();
    (
        prop::collection::vec(prop::collection::vec(elapsed_ms(), 1..4), native_len),
        prop::collection::vec(prop::collection::vec(elapsed_ms(), 1..4), wasm_len),
        prop::collection::vec(any::<bool>(), native_len),
        prop::collection::vec(any::<bool>(), wasm_len),
        duplicates(native_len),
        duplicates(wasm_len),
    )
        .prop_map(
            move |(native_times, wasm_times, native_keep, wasm_keep, native_dups, wasm_dups)| {
                let natives =
                    build_set(Platform::Native, &native, native_times, native_keep, native_dups);
                let wasms = build_set(Platform::Wasm, &wasm, wasm_times, wasm_keep, wasm_dups);
                (natives, wasms)
            },
        )
}

fn build_set(
    platform: Platform,
    keys: &[(&str, &str, usize)],
    times: Vec<Vec<f64>>,
    keep: Vec<bool>,
    dups: Vec<Duplicate>,
) -> Vec<BenchmarkRecord> {
    let mut records = Vec::new();
    let rows = keys.iter().zip(times).zip(keep).zip(dups);
    for (((&(dataset, method, axis), times), keep), dup) in rows {
        if keep {
            records.push(record_for(platform, dataset, method, axis, &times));
        }
        if let Some((dup_times, sequences)) = dup {
            records.push(duplicate_for(platform, dataset, method, axis, &dup_times, sequences));
        }
    }
    records
}

fn render_all(native: Vec<BenchmarkRecord>, wasm: Vec<BenchmarkRecord>) -> (String, String, String) {
    let report = CrossPlatformReport::build(
        native,
        wasm,
        &AggregateConfig::default(),
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
    );
    (
        render_markdown(&report),
        render_csv(&report).unwrap(),
        render_json(&report).unwrap(),
    )
}

// ===== Statistics Properties =====

proptest! {
    #[test]
    fn prop_standard_error_is_std_dev_over_root_n(times in prop::collection::vec(elapsed_ms(), 1..30)) {
        let iterations: Vec<Iteration> = times
            .iter()
            .enumerate()
            .map(|(i, &t)| Iteration::succeeded(i as u32 + 1, t))
            .collect();

        let summary = compute_statistics(&iterations);
        let stats = summary.measured().unwrap();
        let expected = stats.std_dev / (stats.n as f64).sqrt();

        prop_assert_eq!(stats.n, times.len());
        prop_assert!((stats.standard_error - expected).abs() <= 1e-9 * expected.max(1.0));
        prop_assert!(stats.min <= stats.median && stats.median <= stats.max);
        prop_assert!(stats.min <= stats.mean + 1e-9 && stats.mean <= stats.max + 1e-9);
    }

    #[test]
    fn prop_single_sample_has_zero_spread(t in elapsed_ms()) {
        let summary = compute_statistics(&[Iteration::succeeded(1, t)]);
        let stats = summary.measured().unwrap();

        prop_assert_eq!(stats.std_dev, 0.0);
        prop_assert_eq!(stats.standard_error, 0.0);
        prop_assert_eq!(stats.mean, t);
    }

    #[test]
    fn prop_no_success_means_no_mean(count in 1usize..10) {
        let iterations: Vec<Iteration> = (1..=count as u32)
            .map(|i| Iteration { iteration: i, runtime_ms: 0.0, success: false, exit_code: Some(1), error: None })
            .collect();

        let summary = compute_statistics(&iterations);
        prop_assert_eq!(summary.sample_count(), 0);
        prop_assert!(summary.mean().is_none());
        let is_failed = matches!(summary, StatisticsSummary::Failed { .. });
        prop_assert!(is_failed);
    }

    #[test]
    fn prop_overhead_sign_follows_difference(base in elapsed_ms(), wasm in elapsed_ms()) {
        let pct = overhead_pct(Some(base), Some(wasm)).unwrap();
        prop_assert_eq!(pct > 0.0, wasm > base);
    }
}

// ===== Determinism Properties =====

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_reports_independent_of_discovery_order(
        (sets, native_order, wasm_order) in record_sets().prop_flat_map(|(native, wasm)| {
            let n = native.len();
            let w = wasm.len();
            (
                Just((native, wasm)),
                Just((0..n).collect::<Vec<_>>()).prop_shuffle(),
                Just((0..w).collect::<Vec<_>>()).prop_shuffle(),
            )
        })
    ) {
        let (native, wasm) = sets;
        let shuffled_native: Vec<_> = native_order.iter().map(|&i| native[i].clone()).collect();
        let shuffled_wasm: Vec<_> = wasm_order.iter().map(|&i| wasm[i].clone()).collect();

        let original = render_all(native, wasm);
        let shuffled = render_all(shuffled_native, shuffled_wasm);

        prop_assert_eq!(original, shuffled);
    }

    #[test]
    fn prop_rendering_is_idempotent((native, wasm) in record_sets()) {
        let first = render_all(native.clone(), wasm.clone());
        let second = render_all(native, wasm);
        prop_assert_eq!(first, second);
    }
}
