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

//! Report data structures.

use crate::core::{AggregateConfig, BenchmarkRecord, ConfigAxis, CpuSetting, Platform};
use crate::harness::aggregator::{aggregate, record_precedence, Aggregation};
use chrono::{DateTime, SecondsFormat, Utc};
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Default report title.
pub const DEFAULT_TITLE: &str = "HyPhy Cross-Platform Benchmark Results";

/// Everything the reporters render: both record sets and their join.
///
/// Records are held in key order, so the rendered output does not depend
/// on the order they were loaded in.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossPlatformReport {
    pub title: String,
    pub generated: DateTime<Utc>,
    pub config: AggregateConfig,
    pub native: Vec<BenchmarkRecord>,
    pub sandboxed: Vec<BenchmarkRecord>,
    pub aggregation: Aggregation,
}

impl CrossPlatformReport {
    /// Sorts both record sets and runs the aggregation pass.
    pub fn build(
        mut native: Vec<BenchmarkRecord>,
        mut sandboxed: Vec<BenchmarkRecord>,
        config: &AggregateConfig,
        generated: DateTime<Utc>,
    ) -> Self {
        native.sort_by(|a, b| record_order(a, b, Platform::Native));
        sandboxed.sort_by(|a, b| record_order(a, b, Platform::Wasm));
        let aggregation = aggregate(&native, &sandboxed, config);

        Self {
            title: DEFAULT_TITLE.to_string(),
            generated,
            config: config.clone(),
            native,
            sandboxed,
            aggregation,
        }
    }

    /// Sets a custom title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Generation timestamp as rendered in every report.
    pub fn generated_label(&self) -> String {
        self.generated.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    pub fn total_records(&self) -> usize {
        self.native.len() + self.sandboxed.len()
    }

    /// Records of both platforms, native first, each tagged with its set.
    pub fn all_records(&self) -> impl Iterator<Item = (Platform, &BenchmarkRecord)> {
        self.native
            .iter()
            .map(|r| (Platform::Native, r))
            .chain(self.sandboxed.iter().map(|r| (Platform::Wasm, r)))
    }

    /// Distinct datasets, sorted.
    pub fn datasets(&self) -> Vec<String> {
        self.all_records()
            .map(|(_, r)| r.dataset.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct methods, sorted.
    pub fn methods(&self) -> Vec<String> {
        self.all_records()
            .map(|(_, r)| r.method.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct native CPU settings, in core-count order with "all" last.
    pub fn cpu_configs(&self) -> Vec<String> {
        self.native
            .iter()
            .map(|r| r.cpu.unwrap_or_default())
            .collect::<BTreeSet<CpuSetting>>()
            .into_iter()
            .map(|cpu| cpu.to_string())
            .collect()
    }

    /// Distinct sandboxed runtimes, sorted.
    pub fn browsers(&self) -> Vec<String> {
        self.sandboxed
            .iter()
            .filter_map(|r| match r.key_on(Platform::Wasm).axis {
                ConfigAxis::Runtime(name) => Some(name),
                ConfigAxis::Cpu(_) => None,
            })
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

fn record_order(a: &BenchmarkRecord, b: &BenchmarkRecord, platform: Platform) -> Ordering {
    a.key_on(platform)
        .cmp(&b.key_on(platform))
        .then_with(|| record_precedence(a, b))
}
