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

//! Benchmark data model.
//!
//! Records are stored as camelCase JSON, one file per benchmark
//! configuration. Every optional field has exactly one documented
//! fallback, applied here at decode time rather than at each use site.

use crate::core::config::DEFAULT_BROWSER;
use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Failure reason recorded when no iteration of a run succeeded.
pub const ALL_ITERATIONS_FAILED: &str = "all iterations failed";

/// Execution platform a record was produced on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Directly invoked process.
    #[default]
    Native,
    /// Browser-hosted WebAssembly build.
    Wasm,
}

impl Platform {
    /// Returns the lowercase tag used in records and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Native => "native",
            Platform::Wasm => "wasm",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parallelism degree of a native run.
///
/// `0` and `"all"` both mean "every available core" and are folded into
/// [`CpuSetting::All`] by [`CpuSetting::from_count`] and [`FromStr`], the
/// only two ways a setting is constructed from outside data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum CpuSetting {
    /// A fixed number of cores (always positive).
    Count(u32),
    /// All available cores.
    #[default]
    All,
}

impl CpuSetting {
    /// Canonicalizes a raw core count; `0` maps to [`CpuSetting::All`].
    pub fn from_count(count: u32) -> Self {
        if count == 0 {
            CpuSetting::All
        } else {
            CpuSetting::Count(count)
        }
    }

    /// Returns the explicit core count, or `None` for all cores.
    pub fn count(&self) -> Option<u32> {
        match self {
            CpuSetting::Count(n) => Some(*n),
            CpuSetting::All => None,
        }
    }
}

impl fmt::Display for CpuSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CpuSetting::Count(n) => write!(f, "{}", n),
            CpuSetting::All => f.write_str("all"),
        }
    }
}

impl FromStr for CpuSetting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(CpuSetting::All);
        }
        trimmed
            .parse::<u32>()
            .map(CpuSetting::from_count)
            .map_err(|_| format!("invalid CPU setting '{}': expected a count or 'all'", s))
    }
}

impl Serialize for CpuSetting {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CpuSetting::Count(n) => serializer.serialize_u32(*n),
            CpuSetting::All => serializer.serialize_str("all"),
        }
    }
}

impl<'de> Deserialize<'de> for CpuSetting {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawCpu {
            Int(i64),
            Text(String),
        }

        match RawCpu::deserialize(deserializer)? {
            RawCpu::Int(n) => u32::try_from(n)
                .map(CpuSetting::from_count)
                .map_err(|_| de::Error::custom(format!("CPU count out of range: {}", n))),
            RawCpu::Text(s) => s.parse().map_err(de::Error::custom),
        }
    }
}

/// Platform-specific configuration axis.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConfigAxis {
    /// Native parallelism degree.
    Cpu(CpuSetting),
    /// Sandboxed runtime (browser) identifier.
    Runtime(String),
}

impl fmt::Display for ConfigAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigAxis::Cpu(cpu) => write!(f, "{}", cpu),
            ConfigAxis::Runtime(name) => f.write_str(name),
        }
    }
}

/// Identifies one benchmark configuration.
///
/// Ordering is lexicographic over (dataset, method, axis).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConfigurationKey {
    pub dataset: String,
    pub method: String,
    pub axis: ConfigAxis,
}

impl ConfigurationKey {
    /// Key for a native configuration.
    pub fn native(dataset: impl Into<String>, method: impl Into<String>, cpu: CpuSetting) -> Self {
        Self {
            dataset: dataset.into(),
            method: method.into(),
            axis: ConfigAxis::Cpu(cpu),
        }
    }

    /// Key for a sandboxed configuration.
    pub fn sandboxed(
        dataset: impl Into<String>,
        method: impl Into<String>,
        runtime: impl Into<String>,
    ) -> Self {
        Self {
            dataset: dataset.into(),
            method: method.into(),
            axis: ConfigAxis::Runtime(runtime.into()),
        }
    }
}

/// Alignment dimensions of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProblemSize {
    pub sequences: u64,
    pub sites: u64,
}

impl ProblemSize {
    /// True when neither dimension is known.
    pub fn is_unknown(&self) -> bool {
        self.sequences == 0 && self.sites == 0
    }

    /// Report label, e.g. `17×432`.
    pub fn label(&self) -> String {
        format!("{}×{}", self.sequences, self.sites)
    }
}

/// Why a single trial failed.
#[derive(Debug, Clone, PartialEq)]
pub enum FailureDetail {
    /// The process exited with a non-zero status.
    ExitStatus(i32),
    /// The trial could not run or raised an error.
    Error(String),
}

/// A failed trial, with whatever elapsed time was observed.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialFailure {
    pub elapsed_ms: f64,
    pub detail: FailureDetail,
}

impl TrialFailure {
    pub fn exit_status(elapsed_ms: f64, code: i32) -> Self {
        Self {
            elapsed_ms,
            detail: FailureDetail::ExitStatus(code),
        }
    }

    pub fn error(elapsed_ms: f64, message: impl Into<String>) -> Self {
        Self {
            elapsed_ms,
            detail: FailureDetail::Error(message.into()),
        }
    }
}

/// Outcome of one trial: elapsed milliseconds on success.
pub type TrialOutcome = Result<f64, TrialFailure>;

/// One timed attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Iteration {
    /// 1-based ordinal.
    pub iteration: u32,
    #[serde(default)]
    pub runtime_ms: f64,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Iteration {
    /// A successful attempt.
    pub fn succeeded(iteration: u32, runtime_ms: f64) -> Self {
        Self {
            iteration,
            runtime_ms,
            success: true,
            exit_code: None,
            error: None,
        }
    }

    /// Records a trial outcome under the given ordinal.
    pub fn from_outcome(iteration: u32, outcome: TrialOutcome) -> Self {
        match outcome {
            Ok(runtime_ms) => Self::succeeded(iteration, runtime_ms),
            Err(failure) => {
                let (exit_code, error) = match failure.detail {
                    FailureDetail::ExitStatus(code) => (Some(code), None),
                    FailureDetail::Error(message) => (None, Some(message)),
                };
                Self {
                    iteration,
                    runtime_ms: failure.elapsed_ms,
                    success: false,
                    exit_code,
                    error,
                }
            }
        }
    }
}

/// Statistics over the successful samples of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleStatistics {
    /// Number of successful iterations (always at least one).
    pub n: usize,
    pub mean: f64,
    /// Sample standard deviation (n-1 denominator).
    pub std_dev: f64,
    pub standard_error: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    /// `std_dev / mean * 100`, absent when the mean is not positive.
    pub coefficient_of_variation: Option<f64>,
}

/// Summary of a run's iterations.
///
/// A run with no successful iteration carries a reason instead of numbers,
/// so a mean can never coexist with a zero sample count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSummary", into = "RawSummary")]
pub enum StatisticsSummary {
    Measured(SampleStatistics),
    Failed { reason: String },
}

impl StatisticsSummary {
    /// Summary for a run in which every iteration failed.
    pub fn all_failed() -> Self {
        StatisticsSummary::Failed {
            reason: ALL_ITERATIONS_FAILED.to_string(),
        }
    }

    pub fn sample_count(&self) -> usize {
        match self {
            StatisticsSummary::Measured(stats) => stats.n,
            StatisticsSummary::Failed { .. } => 0,
        }
    }

    pub fn mean(&self) -> Option<f64> {
        self.measured().map(|stats| stats.mean)
    }

    pub fn measured(&self) -> Option<&SampleStatistics> {
        match self {
            StatisticsSummary::Measured(stats) => Some(stats),
            StatisticsSummary::Failed { .. } => None,
        }
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            StatisticsSummary::Measured(_) => None,
            StatisticsSummary::Failed { reason } => Some(reason),
        }
    }
}

/// Wire layout of [`StatisticsSummary`].
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSummary {
    #[serde(default)]
    n: usize,
    #[serde(default)]
    mean: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    std_dev: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    standard_error: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    median: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cv: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl TryFrom<RawSummary> for StatisticsSummary {
    type Error = String;

    fn try_from(raw: RawSummary) -> Result<Self, Self::Error> {
        if raw.n == 0 {
            return Ok(StatisticsSummary::Failed {
                reason: raw.error.unwrap_or_else(|| ALL_ITERATIONS_FAILED.to_string()),
            });
        }

        let mean = raw
            .mean
            .ok_or_else(|| format!("statistics report n={} but no mean", raw.n))?;
        let std_dev = raw.std_dev.unwrap_or(0.0);
        let standard_error = raw
            .standard_error
            .unwrap_or_else(|| std_dev / (raw.n as f64).sqrt());
        let coefficient_of_variation = raw
            .cv
            .or_else(|| (mean > 0.0).then(|| std_dev / mean * 100.0));

        Ok(StatisticsSummary::Measured(SampleStatistics {
            n: raw.n,
            mean,
            std_dev,
            standard_error,
            min: raw.min.unwrap_or(mean),
            max: raw.max.unwrap_or(mean),
            median: raw.median.unwrap_or(mean),
            coefficient_of_variation,
        }))
    }
}

impl From<StatisticsSummary> for RawSummary {
    fn from(summary: StatisticsSummary) -> Self {
        match summary {
            StatisticsSummary::Measured(stats) => RawSummary {
                n: stats.n,
                mean: Some(stats.mean),
                std_dev: Some(stats.std_dev),
                standard_error: Some(stats.standard_error),
                min: Some(stats.min),
                max: Some(stats.max),
                median: Some(stats.median),
                cv: stats.coefficient_of_variation,
                error: None,
            },
            StatisticsSummary::Failed { reason } => RawSummary {
                n: 0,
                mean: None,
                std_dev: None,
                standard_error: None,
                min: None,
                max: None,
                median: None,
                cv: None,
                error: Some(reason),
            },
        }
    }
}

/// Host environment a record was produced on.
///
/// Keys stay snake_case, as the native runner has always written them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SystemInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_release: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub architecture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hyphy_version: Option<String>,
}

impl SystemInfo {
    /// Describes the current host.
    pub fn collect(tool_version: Option<String>) -> Self {
        Self {
            platform: Some(std::env::consts::OS.to_string()),
            platform_release: None,
            architecture: Some(std::env::consts::ARCH.to_string()),
            processor: None,
            cpu_count: std::thread::available_parallelism()
                .ok()
                .map(|n| n.get() as u64),
            hyphy_version: tool_version,
        }
    }
}

/// One persisted benchmark configuration result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkRecord {
    /// Defaults to native for untagged records.
    #[serde(default)]
    pub platform: Platform,
    pub dataset: String,
    pub method: String,
    /// Native axis; absent means all cores.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<CpuSetting>,
    /// Sandboxed axis; absent means [`DEFAULT_BROWSER`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser: Option<String>,
    #[serde(default)]
    pub sequences: u64,
    #[serde(default)]
    pub sites: u64,
    #[serde(default)]
    pub iterations: Vec<Iteration>,
    pub statistics: StatisticsSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_info: Option<SystemInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hyphy_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl BenchmarkRecord {
    /// Composite key, with the axis chosen by the record's platform.
    pub fn key(&self) -> ConfigurationKey {
        self.key_on(self.platform)
    }

    /// Composite key as seen from the given platform's result set.
    pub fn key_on(&self, platform: Platform) -> ConfigurationKey {
        let axis = match platform {
            Platform::Native => ConfigAxis::Cpu(self.cpu.unwrap_or_default()),
            Platform::Wasm => ConfigAxis::Runtime(
                self.browser
                    .clone()
                    .unwrap_or_else(|| DEFAULT_BROWSER.to_string()),
            ),
        };
        ConfigurationKey {
            dataset: self.dataset.clone(),
            method: self.method.clone(),
            axis,
        }
    }

    pub fn problem_size(&self) -> ProblemSize {
        ProblemSize {
            sequences: self.sequences,
            sites: self.sites,
        }
    }

    pub fn mean(&self) -> Option<f64> {
        self.statistics.mean()
    }
}
