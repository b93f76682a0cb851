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

//! Run command - benchmarks the native tool and writes one record

use crate::error::{CliError, Result};
use phylobench::core::config::DEFAULT_ITERATIONS;
use phylobench::harness::{probe_version, BenchmarkRunner, NativeExecutor, RunSpec};
use phylobench::{BenchError, BenchmarkRecord, CpuSetting, RunConfig, StatisticsSummary};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Arguments of the `run` subcommand.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub alignment: PathBuf,
    pub method: String,
    pub cpu: CpuSetting,
    pub iterations: u32,
    pub hyphy_bin: PathBuf,
    pub hyphy_libpath: Option<PathBuf>,
    pub sequences: u64,
    pub sites: u64,
    pub output: PathBuf,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            alignment: PathBuf::new(),
            method: String::new(),
            cpu: CpuSetting::All,
            iterations: DEFAULT_ITERATIONS,
            hyphy_bin: PathBuf::from("hyphy"),
            hyphy_libpath: None,
            sequences: 0,
            sites: 0,
            output: PathBuf::new(),
        }
    }
}

/// Benchmarks one method on one alignment and writes the record.
///
/// Failed trials do not fail the command; they end up in the record.
///
/// # Errors
///
/// Returns `Err` if the alignment does not exist, the iteration count is
/// zero, or the record cannot be written.
pub fn run(options: &RunOptions) -> Result<()> {
    if !options.alignment.is_file() {
        return Err(CliError::invalid_argument(
            "--alignment",
            format!("'{}' is not a file", options.alignment.display()),
        ));
    }

    let runner = BenchmarkRunner::new(RunConfig::new(options.iterations))?;
    let spec = RunSpec::new(&options.alignment, &options.method)
        .with_problem_size(options.sequences, options.sites);

    let mut executor = NativeExecutor::new(&options.hyphy_bin, &spec, options.cpu);
    if let Some(libpath) = &options.hyphy_libpath {
        executor = executor.with_libpath(libpath);
    }

    let version = probe_version(&options.hyphy_bin);
    let system_info = phylobench::core::SystemInfo::collect(version.clone());

    println!(
        "Benchmarking {} on {} (CPU={}, {} iterations)",
        options.method,
        spec.dataset(),
        options.cpu,
        options.iterations
    );

    let mut record = runner.run_native(&spec, options.cpu, system_info, &mut executor);
    record.hyphy_version = version;

    match &record.statistics {
        StatisticsSummary::Measured(stats) => println!(
            "  mean {:.0}ms ± {:.0}ms over {} successful iterations",
            stats.mean, stats.std_dev, stats.n
        ),
        StatisticsSummary::Failed { reason } => println!("  {}", reason),
    }

    write_record(&record, &options.output)?;
    println!("Record written to {}", options.output.display());
    Ok(())
}

/// Writes a record as pretty JSON, creating parent directories.
pub fn write_record(record: &BenchmarkRecord, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| CliError::io_error(parent, e))?;
    }
    let json = serde_json::to_string_pretty(record).map_err(BenchError::from)?;
    fs::write(path, json).map_err(|e| CliError::io_error(path, e))?;
    info!("Wrote {}", path.display());
    Ok(())
}
