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

//! Markdown export for cross-platform reports.

use crate::core::ConfigAxis;
use crate::error::Result;
use crate::harness::aggregator::{MeanCell, ScalingTable};
use crate::reporters::types::CrossPlatformReport;
use crate::reporters::write_output;
use std::path::Path;

/// Placeholder for a configuration with no record.
pub const MISSING: &str = "-";

/// Marker for a configuration whose iterations all failed.
pub const FAILED: &str = "failed";

/// Formats a joined mean cell.
pub fn format_cell(cell: &MeanCell) -> String {
    match cell {
        MeanCell::Missing => MISSING.to_string(),
        MeanCell::Failed => FAILED.to_string(),
        MeanCell::Measured(mean) => format!("{:.0}ms", mean),
    }
}

/// Formats an overhead percentage with an explicit sign.
///
/// Positive values get a leading `+`; negative values keep their `-`.
pub fn format_overhead(pct: Option<f64>) -> String {
    match pct {
        None => MISSING.to_string(),
        Some(pct) => {
            let mut rounded = pct.round();
            if rounded == 0.0 {
                // normalize -0
                rounded = 0.0;
            }
            format!("{:+.0}%", rounded)
        }
    }
}

/// Escapes a value for use inside a table cell.
pub fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|")
}

/// Renders the per-method comparison tables.
pub fn render_markdown(report: &CrossPlatformReport) -> String {
    let mut md = String::new();
    let config = &report.config;

    md.push_str(&format!("# {}\n\n", report.title));
    md.push_str(&format!("**Generated:** {}\n\n", report.generated_label()));

    if report.aggregation.rows.is_empty() {
        md.push_str("No benchmark results found.\n");
        return md;
    }

    for method in report.methods() {
        md.push_str(&format!("## {}\n\n", method.to_uppercase()));
        md.push_str(&format!(
            "| Dataset | Seq×Sites | Native (CPU={}) | Native (CPU={}) | WASM ({}) | Overhead |\n",
            config.baseline_cpu,
            config.parallel_cpu,
            escape_cell(&config.browser)
        ));
        md.push_str("|---------|-----------|--------|--------|--------|----------|\n");

        for row in report
            .aggregation
            .rows
            .iter()
            .filter(|row| row.method == method)
        {
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} |\n",
                escape_cell(&row.dataset),
                row.problem_size_label(),
                format_cell(&row.native_baseline),
                format_cell(&row.native_parallel),
                format_cell(&row.sandboxed),
                format_overhead(row.overhead_pct)
            ));
        }
        md.push('\n');
    }

    if let Some(summary) = &report.aggregation.overhead {
        md.push_str("## Overhead Summary\n\n");
        md.push_str(&format!("- **Average:** {}\n", format_overhead(Some(summary.mean))));
        md.push_str(&format!("- **Min:** {}\n", format_overhead(Some(summary.min))));
        md.push_str(&format!("- **Max:** {}\n", format_overhead(Some(summary.max))));
        md.push_str(&format!("- **Comparisons:** {}\n\n", summary.count));
    }

    render_scaling(&mut md, "Native Scaling", &report.aggregation.native_scaling);
    render_scaling(&mut md, "Sandboxed Runtimes", &report.aggregation.sandboxed_scaling);

    md
}

fn render_scaling(md: &mut String, heading: &str, tables: &[ScalingTable]) {
    if tables.is_empty() {
        return;
    }

    md.push_str(&format!("## {}\n\n", heading));
    for table in tables {
        md.push_str(&format!("### {}\n\n", table.method.to_uppercase()));

        md.push_str("| Dataset |");
        for axis in &table.axes {
            match axis {
                ConfigAxis::Cpu(cpu) => md.push_str(&format!(" CPU={} |", cpu)),
                ConfigAxis::Runtime(name) => md.push_str(&format!(" {} |", escape_cell(name))),
            }
        }
        md.push_str("\n|---------|");
        for _ in &table.axes {
            md.push_str("--------|");
        }
        md.push('\n');

        for row in &table.rows {
            md.push_str(&format!("| {} |", escape_cell(&row.dataset)));
            for cell in &row.cells {
                md.push_str(&format!(" {} |", format_cell(cell)));
            }
            md.push('\n');
        }
        md.push('\n');
    }
}

/// Exports the comparison tables to `path`.
pub fn export_markdown(report: &CrossPlatformReport, path: &Path) -> Result<()> {
    write_output(path, &render_markdown(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AggregateConfig, BenchmarkRecord};
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn record(value: serde_json::Value) -> BenchmarkRecord {
        serde_json::from_value(value).unwrap()
    }

    fn report(native: Vec<BenchmarkRecord>, wasm: Vec<BenchmarkRecord>) -> CrossPlatformReport {
        CrossPlatformReport::build(
            native,
            wasm,
            &AggregateConfig::default(),
            Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_format_overhead_sign() {
        assert_eq!(format_overhead(Some(50.0)), "+50%");
        assert_eq!(format_overhead(Some(-20.0)), "-20%");
        assert_eq!(format_overhead(Some(-0.3)), "+0%");
        assert_eq!(format_overhead(None), "-");
    }

    #[test]
    fn test_format_cell() {
        assert_eq!(format_cell(&MeanCell::Measured(104.6)), "105ms");
        assert_eq!(format_cell(&MeanCell::Missing), "-");
        assert_eq!(format_cell(&MeanCell::Failed), "failed");
    }

    #[test]
    fn test_comparison_table() {
        let native = vec![record(json!({
            "dataset": "bglobin", "method": "fel", "cpu": 1, "sequences": 17, "sites": 432,
            "statistics": {"n": 3, "mean": 100.0}
        }))];
        let wasm = vec![record(json!({
            "platform": "wasm", "browser": "chromium", "dataset": "bglobin", "method": "fel",
            "statistics": {"n": 3, "mean": 130.0}
        }))];

        let md = render_markdown(&report(native, wasm));

        assert!(md.starts_with("# HyPhy Cross-Platform Benchmark Results\n"));
        assert!(md.contains("**Generated:** 2025-03-01T12:00:00Z"));
        assert!(md.contains("## FEL"));
        assert!(md.contains("| bglobin | 17×432 | 100ms | - | 130ms | +30% |"));
        assert!(md.contains("## Overhead Summary"));
        assert!(md.contains("- **Average:** +30%"));
        assert!(md.contains("## Native Scaling"));
        assert!(md.contains("## Sandboxed Runtimes"));
        assert!(md.contains("| Dataset | CPU=1 |"));
    }

    #[test]
    fn test_missing_baseline_renders_placeholder() {
        let wasm = vec![record(json!({
            "platform": "wasm", "dataset": "camelid", "method": "meme",
            "statistics": {"n": 1, "mean": 80.0}
        }))];

        let md = render_markdown(&report(Vec::new(), wasm));

        assert!(md.contains("| camelid | - | - | - | 80ms | - |"));
        assert!(!md.contains("Overhead Summary"));
        assert!(!md.contains("Native Scaling"));
    }

    #[test]
    fn test_methods_sorted() {
        let native = vec![
            record(json!({"dataset": "a", "method": "slac", "cpu": 1, "statistics": {"n": 1, "mean": 1.0}})),
            record(json!({"dataset": "a", "method": "fel", "cpu": 1, "statistics": {"n": 1, "mean": 1.0}})),
        ];
        let md = render_markdown(&report(native, Vec::new()));
        let fel = md.find("## FEL").unwrap();
        let slac = md.find("## SLAC").unwrap();
        assert!(fel < slac);
    }

    #[test]
    fn test_pipe_in_names_is_escaped() {
        let native = vec![record(json!({
            "dataset": "flu|h3", "method": "fel", "cpu": 1, "sequences": 5, "sites": 90,
            "statistics": {"n": 1, "mean": 10.0}
        }))];
        let wasm = vec![record(json!({
            "platform": "wasm", "browser": "edge|beta", "dataset": "flu|h3", "method": "fel",
            "statistics": {"n": 1, "mean": 12.0}
        }))];

        let md = render_markdown(&report(native, wasm));

        assert_eq!(escape_cell("a|b"), "a\\|b");
        assert!(md.contains("| flu\\|h3 | 5×90 | 10ms | - | - | - |"));
        assert!(md.contains("| Dataset | edge\\|beta |"));
        assert!(!md.contains("| flu|h3 |"));
    }

    #[test]
    fn test_empty_report() {
        let md = render_markdown(&report(Vec::new(), Vec::new()));
        assert!(md.contains("No benchmark results found."));
    }

    #[test]
    fn test_export_markdown() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("summary.md");

        export_markdown(&report(Vec::new(), Vec::new()), &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("# HyPhy Cross-Platform Benchmark Results"));
    }
}
