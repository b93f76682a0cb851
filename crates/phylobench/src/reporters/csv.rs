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

//! CSV export: one row per benchmark record.

use crate::error::{BenchError, Result};
use crate::reporters::types::CrossPlatformReport;
use crate::reporters::write_output;
use std::path::Path;

/// Column order of the flat export.
pub const CSV_HEADER: [&str; 12] = [
    "platform", "dataset", "method", "config", "sequences", "sites", "mean_ms", "std_ms",
    "se_ms", "min_ms", "max_ms", "n",
];

fn number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Renders every record of both platforms as CSV.
///
/// The `config` column holds the CPU setting for native rows and the
/// runtime identifier for sandboxed rows.
pub fn render_csv(report: &CrossPlatformReport) -> Result<String> {
    let mut wtr = ::csv::WriterBuilder::new().from_writer(Vec::new());
    wtr.write_record(CSV_HEADER)?;

    for (platform, record) in report.all_records() {
        let stats = record.statistics.measured();
        wtr.write_record([
            platform.to_string(),
            record.dataset.clone(),
            record.method.clone(),
            record.key_on(platform).axis.to_string(),
            record.sequences.to_string(),
            record.sites.to_string(),
            number(stats.map(|s| s.mean)),
            number(stats.map(|s| s.std_dev)),
            number(stats.map(|s| s.standard_error)),
            number(stats.map(|s| s.min)),
            number(stats.map(|s| s.max)),
            record.statistics.sample_count().to_string(),
        ])?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| BenchError::Serialization(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| BenchError::Serialization(e.to_string()))
}

/// Exports the flat CSV to `path`.
pub fn export_csv(report: &CrossPlatformReport, path: &Path) -> Result<()> {
    write_output(path, &render_csv(report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AggregateConfig, BenchmarkRecord};
    use chrono::Utc;
    use serde_json::json;

    fn record(value: serde_json::Value) -> BenchmarkRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_render_csv_rows() {
        let native = vec![
            record(json!({
                "dataset": "bglobin", "method": "fel", "cpu": 0, "sequences": 17, "sites": 432,
                "statistics": {"n": 3, "mean": 105.0, "stdDev": 5.0, "standardError": 2.5,
                               "min": 100.0, "max": 110.0}
            })),
            record(json!({
                "dataset": "bglobin", "method": "fel", "cpu": 1,
                "statistics": {"n": 0, "mean": null, "error": "All iterations failed"}
            })),
        ];
        let wasm = vec![record(json!({
            "platform": "wasm", "browser": "firefox", "dataset": "bglobin", "method": "fel",
            "statistics": {"n": 1, "mean": 130.0}
        }))];
        let report = CrossPlatformReport::build(native, wasm, &AggregateConfig::default(), Utc::now());

        let csv = render_csv(&report).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "platform,dataset,method,config,sequences,sites,mean_ms,std_ms,se_ms,min_ms,max_ms,n"
        );
        assert_eq!(lines[1], "native,bglobin,fel,1,0,0,,,,,,0");
        assert_eq!(lines[2], "native,bglobin,fel,all,17,432,105,5,2.5,100,110,3");
        assert_eq!(lines[3], "wasm,bglobin,fel,firefox,0,0,130,0,0,130,130,1");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_render_csv_empty() {
        let report = CrossPlatformReport::build(Vec::new(), Vec::new(), &AggregateConfig::default(), Utc::now());
        let csv = render_csv(&report).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }
}
