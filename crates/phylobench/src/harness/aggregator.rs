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

//! Cross-platform aggregation.
//!
//! Indexes native and sandboxed records by [`ConfigurationKey`], joins each
//! (dataset, method) pair on the configured baseline, and derives the
//! sandboxed overhead. Records are only read; every output value is new.

use crate::core::{
    AggregateConfig, BenchmarkRecord, ConfigAxis, ConfigurationKey, CpuSetting, Platform,
    ProblemSize,
};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Records indexed by configuration, one per key.
pub type RecordIndex<'a> = BTreeMap<ConfigurationKey, &'a BenchmarkRecord>;

/// A joined mean value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeanCell {
    /// No record for this configuration.
    Missing,
    /// A record exists but none of its iterations succeeded.
    Failed,
    /// Mean elapsed milliseconds.
    Measured(f64),
}

impl MeanCell {
    fn of(record: Option<&&BenchmarkRecord>) -> Self {
        match record {
            None => MeanCell::Missing,
            Some(record) => record
                .mean()
                .map(MeanCell::Measured)
                .unwrap_or(MeanCell::Failed),
        }
    }

    /// The mean, if one was measured.
    pub fn value(&self) -> Option<f64> {
        match self {
            MeanCell::Measured(mean) => Some(*mean),
            MeanCell::Missing | MeanCell::Failed => None,
        }
    }
}

/// One (dataset, method) pair joined across platforms.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    pub dataset: String,
    pub method: String,
    pub problem_size: Option<ProblemSize>,
    /// Native mean at the baseline parallelism.
    pub native_baseline: MeanCell,
    /// Native mean at the parallel setting.
    pub native_parallel: MeanCell,
    /// Sandboxed mean on the configured runtime.
    pub sandboxed: MeanCell,
    /// Relative sandboxed overhead in percent.
    pub overhead_pct: Option<f64>,
}

impl ComparisonRow {
    pub fn problem_size_label(&self) -> String {
        self.problem_size
            .map(|size| size.label())
            .unwrap_or_else(|| "-".to_string())
    }
}

/// Overhead statistics across all rows where overhead is defined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverheadSummary {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

/// Means of every configuration of one method on one platform.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalingTable {
    pub platform: Platform,
    pub method: String,
    /// Column axes, sorted.
    pub axes: Vec<ConfigAxis>,
    pub rows: Vec<ScalingRow>,
}

/// One dataset's means across a [`ScalingTable`]'s axes.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalingRow {
    pub dataset: String,
    pub cells: Vec<MeanCell>,
}

/// Output of one aggregation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    /// Distinct (dataset, method) pairs, sorted.
    pub pairs: Vec<(String, String)>,
    /// One row per pair, in pair order.
    pub rows: Vec<ComparisonRow>,
    pub overhead: Option<OverheadSummary>,
    pub native_scaling: Vec<ScalingTable>,
    pub sandboxed_scaling: Vec<ScalingTable>,
}

/// Indexes records by their key on `platform`.
///
/// When several records share a key, the most recently timestamped one
/// wins; an untimestamped record is older than any timestamped one. Ties
/// go to the larger sample, then to the smaller mean, then to
/// [`record_precedence`]'s content order.
pub fn index_records(records: &[BenchmarkRecord], platform: Platform) -> RecordIndex<'_> {
    let mut index: RecordIndex<'_> = BTreeMap::new();

    for record in records {
        let key = record.key_on(platform);
        match index.get(&key) {
            Some(current) if !supersedes(record, current) => {
                debug!("Ignoring duplicate {} record for {:?}", platform, key);
            }
            Some(_) => {
                debug!("Replacing older {} record for {:?}", platform, key);
                index.insert(key, record);
            }
            None => {
                index.insert(key, record);
            }
        }
    }

    index
}

fn supersedes(candidate: &BenchmarkRecord, current: &BenchmarkRecord) -> bool {
    record_precedence(candidate, current) == Ordering::Greater
}

/// Orders records sharing a key from least to most preferred.
///
/// Later timestamp, then larger sample, then smaller mean. Records equal on
/// all three are ordered by their remaining content, so only identical
/// records compare equal.
pub fn record_precedence(a: &BenchmarkRecord, b: &BenchmarkRecord) -> Ordering {
    a.timestamp
        .cmp(&b.timestamp)
        .then_with(|| {
            a.statistics
                .sample_count()
                .cmp(&b.statistics.sample_count())
        })
        .then_with(|| match (a.mean(), b.mean()) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            _ => Ordering::Equal,
        })
        .then_with(|| a.sequences.cmp(&b.sequences))
        .then_with(|| a.sites.cmp(&b.sites))
        .then_with(|| canonical_form(a).cmp(&canonical_form(b)))
}

fn canonical_form(record: &BenchmarkRecord) -> String {
    serde_json::to_string(record).unwrap_or_default()
}

/// Relative overhead of `sandboxed` over `baseline`, in percent.
///
/// Defined only when both means exist and the baseline is nonzero.
pub fn overhead_pct(baseline: Option<f64>, sandboxed: Option<f64>) -> Option<f64> {
    match (baseline, sandboxed) {
        (Some(base), Some(wasm)) if base != 0.0 => Some((wasm - base) / base * 100.0),
        _ => None,
    }
}

/// Mean, min and max of the defined overheads; `None` if there are none.
pub fn summarize_overhead(rows: &[ComparisonRow]) -> Option<OverheadSummary> {
    let values: Vec<f64> = rows.iter().filter_map(|row| row.overhead_pct).collect();
    if values.is_empty() {
        return None;
    }

    Some(OverheadSummary {
        count: values.len(),
        mean: values.iter().sum::<f64>() / values.len() as f64,
        min: values.iter().copied().fold(f64::INFINITY, f64::min),
        max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    })
}

/// Joins native and sandboxed records into comparison rows.
///
/// # Arguments
///
/// * `native` - Native records, any order
/// * `sandboxed` - Sandboxed records, any order
/// * `config` - Baseline, parallel and runtime selection
pub fn aggregate(
    native: &[BenchmarkRecord],
    sandboxed: &[BenchmarkRecord],
    config: &AggregateConfig,
) -> Aggregation {
    let native_index = index_records(native, Platform::Native);
    let sandboxed_index = index_records(sandboxed, Platform::Wasm);

    let pairs: Vec<(String, String)> = native_index
        .keys()
        .chain(sandboxed_index.keys())
        .map(|key| (key.dataset.clone(), key.method.clone()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let sizes = resolve_problem_sizes(&native_index, &sandboxed_index);

    let rows: Vec<ComparisonRow> = pairs
        .iter()
        .map(|(dataset, method)| {
            let cpu_cell = |cpu: CpuSetting| {
                MeanCell::of(native_index.get(&ConfigurationKey::native(
                    dataset.as_str(),
                    method.as_str(),
                    cpu,
                )))
            };
            let native_baseline = cpu_cell(config.baseline_cpu);
            let native_parallel = cpu_cell(config.parallel_cpu);
            let sandboxed = MeanCell::of(sandboxed_index.get(&ConfigurationKey::sandboxed(
                dataset.as_str(),
                method.as_str(),
                config.browser.as_str(),
            )));

            ComparisonRow {
                dataset: dataset.clone(),
                method: method.clone(),
                problem_size: sizes.get(dataset).copied(),
                native_baseline,
                native_parallel,
                sandboxed,
                overhead_pct: overhead_pct(native_baseline.value(), sandboxed.value()),
            }
        })
        .collect();

    let overhead = summarize_overhead(&rows);

    Aggregation {
        pairs,
        rows,
        overhead,
        native_scaling: scaling_tables(&native_index, Platform::Native),
        sandboxed_scaling: scaling_tables(&sandboxed_index, Platform::Wasm),
    }
}

/// First known problem size per dataset, native records before sandboxed.
fn resolve_problem_sizes(
    native: &RecordIndex<'_>,
    sandboxed: &RecordIndex<'_>,
) -> BTreeMap<String, ProblemSize> {
    let mut sizes = BTreeMap::new();
    for (key, record) in native.iter().chain(sandboxed.iter()) {
        let size = record.problem_size();
        if !size.is_unknown() {
            sizes.entry(key.dataset.clone()).or_insert(size);
        }
    }
    sizes
}

/// Builds one table per method listing every configuration observed.
pub fn scaling_tables(index: &RecordIndex<'_>, platform: Platform) -> Vec<ScalingTable> {
    let mut by_method: BTreeMap<&str, (BTreeSet<&ConfigAxis>, BTreeSet<&str>)> = BTreeMap::new();
    for key in index.keys() {
        let (axes, datasets) = by_method.entry(key.method.as_str()).or_default();
        axes.insert(&key.axis);
        datasets.insert(key.dataset.as_str());
    }

    by_method
        .into_iter()
        .map(|(method, (axes, datasets))| {
            let axes: Vec<ConfigAxis> = axes.into_iter().cloned().collect();
            let rows = datasets
                .into_iter()
                .map(|dataset| ScalingRow {
                    dataset: dataset.to_string(),
                    cells: axes
                        .iter()
                        .map(|axis| {
                            MeanCell::of(index.get(&ConfigurationKey {
                                dataset: dataset.to_string(),
                                method: method.to_string(),
                                axis: axis.clone(),
                            }))
                        })
                        .collect(),
                })
                .collect();

            ScalingTable {
                platform,
                method: method.to_string(),
                axes,
                rows,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::statistics::summarize_samples;
    use crate::core::StatisticsSummary;
    use chrono::{TimeZone, Utc};

    fn record(platform: Platform, dataset: &str, method: &str, mean: Option<f64>) -> BenchmarkRecord {
        let statistics = match mean.and_then(|m| summarize_samples(&[m])) {
            Some(stats) => StatisticsSummary::Measured(stats),
            None => StatisticsSummary::all_failed(),
        };
        BenchmarkRecord {
            platform,
            dataset: dataset.to_string(),
            method: method.to_string(),
            cpu: None,
            browser: None,
            sequences: 17,
            sites: 432,
            iterations: Vec::new(),
            statistics,
            system_info: None,
            hyphy_version: None,
            timestamp: None,
        }
    }

    fn native(dataset: &str, method: &str, cpu: CpuSetting, mean: f64) -> BenchmarkRecord {
        let mut r = record(Platform::Native, dataset, method, Some(mean));
        r.cpu = Some(cpu);
        r
    }

    fn wasm(dataset: &str, method: &str, browser: &str, mean: f64) -> BenchmarkRecord {
        let mut r = record(Platform::Wasm, dataset, method, Some(mean));
        r.browser = Some(browser.to_string());
        r
    }

    #[test]
    fn test_overhead_sign() {
        assert_eq!(overhead_pct(Some(100.0), Some(150.0)), Some(50.0));
        assert_eq!(overhead_pct(Some(100.0), Some(80.0)), Some(-20.0));
        assert_eq!(overhead_pct(Some(0.0), Some(80.0)), None);
        assert_eq!(overhead_pct(None, Some(80.0)), None);
        assert_eq!(overhead_pct(Some(100.0), None), None);
    }

    #[test]
    fn test_join_on_baseline() {
        let natives = vec![
            native("bglobin", "fel", CpuSetting::Count(1), 100.0),
            native("bglobin", "fel", CpuSetting::All, 40.0),
        ];
        let wasms = vec![wasm("bglobin", "fel", "chromium", 130.0)];

        let agg = aggregate(&natives, &wasms, &AggregateConfig::default());

        assert_eq!(agg.pairs, vec![("bglobin".to_string(), "fel".to_string())]);
        let row = &agg.rows[0];
        assert_eq!(row.native_baseline, MeanCell::Measured(100.0));
        assert_eq!(row.native_parallel, MeanCell::Measured(40.0));
        assert_eq!(row.sandboxed, MeanCell::Measured(130.0));
        assert!((row.overhead_pct.unwrap() - 30.0).abs() < 1e-9);
        assert_eq!(row.problem_size_label(), "17×432");
    }

    #[test]
    fn test_zero_and_all_share_parallel_key() {
        let from_zero: BenchmarkRecord = serde_json::from_value(serde_json::json!({
            "dataset": "bglobin",
            "method": "fel",
            "cpu": 0,
            "statistics": {"n": 1, "mean": 55.0}
        }))
        .unwrap();

        let agg = aggregate(&[from_zero], &[], &AggregateConfig::default());
        assert_eq!(agg.rows[0].native_parallel, MeanCell::Measured(55.0));
    }

    #[test]
    fn test_missing_baseline_has_no_overhead() {
        let natives = vec![native("camelid", "meme", CpuSetting::All, 40.0)];
        let wasms = vec![
            wasm("camelid", "meme", "chromium", 130.0),
            wasm("bglobin", "fel", "chromium", 90.0),
        ];

        let agg = aggregate(&natives, &wasms, &AggregateConfig::default());

        assert_eq!(agg.rows.len(), 2);
        assert!(agg.rows.iter().all(|row| row.overhead_pct.is_none()));
        assert_eq!(agg.rows[0].native_baseline, MeanCell::Missing);
        assert!(agg.overhead.is_none());
    }

    #[test]
    fn test_failed_record_is_distinct_from_missing() {
        let mut failed = record(Platform::Native, "bglobin", "fel", None);
        failed.cpu = Some(CpuSetting::Count(1));
        let wasms = vec![wasm("bglobin", "fel", "chromium", 130.0)];

        let agg = aggregate(&[failed], &wasms, &AggregateConfig::default());
        assert_eq!(agg.rows[0].native_baseline, MeanCell::Failed);
        assert_eq!(agg.rows[0].native_parallel, MeanCell::Missing);
        assert_eq!(agg.rows[0].overhead_pct, None);
    }

    #[test]
    fn test_only_default_browser_joins() {
        let natives = vec![native("bglobin", "fel", CpuSetting::Count(1), 100.0)];
        let wasms = vec![wasm("bglobin", "fel", "firefox", 200.0)];

        let agg = aggregate(&natives, &wasms, &AggregateConfig::default());
        assert_eq!(agg.rows[0].sandboxed, MeanCell::Missing);

        let firefox = AggregateConfig::default().with_browser("firefox");
        let agg = aggregate(&natives, &wasms, &firefox);
        assert_eq!(agg.rows[0].overhead_pct, Some(100.0));
    }

    #[test]
    fn test_overhead_summary() {
        let natives = vec![
            native("a", "fel", CpuSetting::Count(1), 100.0),
            native("b", "fel", CpuSetting::Count(1), 100.0),
            native("c", "fel", CpuSetting::Count(1), 100.0),
        ];
        let wasms = vec![
            wasm("a", "fel", "chromium", 150.0),
            wasm("b", "fel", "chromium", 80.0),
        ];

        let summary = aggregate(&natives, &wasms, &AggregateConfig::default())
            .overhead
            .unwrap();
        assert_eq!(summary.count, 2);
        assert!((summary.mean - 15.0).abs() < 1e-9);
        assert!((summary.min + 20.0).abs() < 1e-9);
        assert!((summary.max - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_pairs_sorted() {
        let natives = vec![
            native("zika", "slac", CpuSetting::Count(1), 1.0),
            native("bglobin", "meme", CpuSetting::Count(1), 1.0),
            native("bglobin", "fel", CpuSetting::Count(1), 1.0),
        ];
        let agg = aggregate(&natives, &[], &AggregateConfig::default());
        let datasets: Vec<_> = agg.pairs.iter().map(|(d, m)| format!("{}/{}", d, m)).collect();
        assert_eq!(datasets, vec!["bglobin/fel", "bglobin/meme", "zika/slac"]);
    }

    #[test]
    fn test_duplicate_keeps_latest() {
        let mut old = native("bglobin", "fel", CpuSetting::Count(1), 100.0);
        old.timestamp = Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
        let mut new = native("bglobin", "fel", CpuSetting::Count(1), 120.0);
        new.timestamp = Some(Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap());
        let undated = native("bglobin", "fel", CpuSetting::Count(1), 90.0);

        for order in [
            vec![old.clone(), new.clone(), undated.clone()],
            vec![undated.clone(), new.clone(), old.clone()],
        ] {
            let index = index_records(&order, Platform::Native);
            assert_eq!(index.len(), 1);
            assert_eq!(index.values().next().unwrap().mean(), Some(120.0));
        }
    }

    #[test]
    fn test_duplicate_choice_ignores_input_order() {
        let stamp = Some(Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap());
        let mut a = native("bglobin", "fel", CpuSetting::Count(1), 100.0);
        a.timestamp = stamp;
        let mut b = a.clone();
        b.sequences = 20;

        let forward = [a.clone(), b.clone()];
        let backward = [b.clone(), a.clone()];
        let key = a.key_on(Platform::Native);

        let first = index_records(&forward, Platform::Native)[&key].clone();
        let second = index_records(&backward, Platform::Native)[&key].clone();
        assert_eq!(first, second);
        assert_eq!(first.sequences, 20);
    }

    #[test]
    fn test_failed_duplicates_differ_only_by_reason() {
        let mut a = record(Platform::Native, "bglobin", "fel", None);
        a.cpu = Some(CpuSetting::Count(1));
        let mut b = a.clone();
        b.statistics = StatisticsSummary::Failed {
            reason: "timeout".to_string(),
        };

        assert_ne!(record_precedence(&a, &b), Ordering::Equal);
        assert_eq!(record_precedence(&a, &b), record_precedence(&b, &a).reverse());
        assert_eq!(record_precedence(&a, &a.clone()), Ordering::Equal);

        let key = a.key_on(Platform::Native);
        let forward = [a.clone(), b.clone()];
        let backward = [b, a];
        assert_eq!(
            index_records(&forward, Platform::Native)[&key],
            index_records(&backward, Platform::Native)[&key]
        );
    }

    #[test]
    fn test_scaling_tables() {
        let natives = vec![
            native("bglobin", "fel", CpuSetting::Count(1), 100.0),
            native("bglobin", "fel", CpuSetting::Count(4), 35.0),
            native("camelid", "fel", CpuSetting::All, 20.0),
        ];
        let agg = aggregate(&natives, &[], &AggregateConfig::default());

        assert_eq!(agg.native_scaling.len(), 1);
        let table = &agg.native_scaling[0];
        assert_eq!(
            table.axes,
            vec![
                ConfigAxis::Cpu(CpuSetting::Count(1)),
                ConfigAxis::Cpu(CpuSetting::Count(4)),
                ConfigAxis::Cpu(CpuSetting::All),
            ]
        );
        assert_eq!(table.rows[1].dataset, "camelid");
        assert_eq!(
            table.rows[1].cells,
            vec![MeanCell::Missing, MeanCell::Missing, MeanCell::Measured(20.0)]
        );
        assert!(agg.sandboxed_scaling.is_empty());
    }
}
