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

//! Statistics computation over timed trials.
//!
//! Reduces the iterations of one benchmark configuration to a
//! [`StatisticsSummary`]. Only successful iterations contribute samples;
//! failed ones stay in the record for diagnostics.

use crate::core::{Iteration, SampleStatistics, StatisticsSummary};

/// Computes the summary of a run's iterations.
///
/// # Arguments
///
/// * `iterations` - Ordered trial attempts
///
/// # Returns
///
/// [`StatisticsSummary::Failed`] when no iteration succeeded, otherwise
/// the statistics of the successful elapsed times.
pub fn compute_statistics(iterations: &[Iteration]) -> StatisticsSummary {
    let samples: Vec<f64> = iterations
        .iter()
        .filter(|it| it.success)
        .map(|it| it.runtime_ms)
        .collect();

    match summarize_samples(&samples) {
        Some(stats) => StatisticsSummary::Measured(stats),
        None => StatisticsSummary::all_failed(),
    }
}

/// Computes sample statistics, or `None` for an empty sample.
///
/// The standard deviation uses the unbiased (n-1) estimator and is zero
/// for a single sample.
pub fn summarize_samples(samples: &[f64]) -> Option<SampleStatistics> {
    if samples.is_empty() {
        return None;
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;

    let std_dev = if n > 1 {
        let sum_sq: f64 = sorted.iter().map(|x| (x - mean) * (x - mean)).sum();
        (sum_sq / (n - 1) as f64).sqrt()
    } else {
        0.0
    };

    let median = if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    };

    Some(SampleStatistics {
        n,
        mean,
        std_dev,
        standard_error: std_dev / (n as f64).sqrt(),
        min: sorted[0],
        max: sorted[n - 1],
        median,
        coefficient_of_variation: (mean > 0.0).then(|| std_dev / mean * 100.0),
    })
}
