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

//! CLI command definitions and argument parsing.

use crate::commands::{self, AggregateOptions, RunOptions};
use crate::error::Result;
use clap::Subcommand;
use phylobench::core::config::{DEFAULT_BASELINE_CPU, DEFAULT_BROWSER, DEFAULT_ITERATIONS};
use phylobench::reporters::DEFAULT_TITLE;
use phylobench::CpuSetting;
use std::path::PathBuf;

/// Top-level CLI commands.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use phylobench_cli::cli::Commands;
///
/// #[derive(Parser)]
/// struct Cli {
///     #[command(subcommand)]
///     command: Commands,
/// }
/// ```
#[derive(Subcommand)]
pub enum Commands {
    /// Benchmark one method on one alignment with the native tool
    ///
    /// Runs the configured number of trials one after another, times each
    /// child process, and writes a single JSON record.
    Run {
        /// Alignment file; its stem becomes the dataset name
        #[arg(short, long, value_name = "FILE")]
        alignment: PathBuf,

        /// Analysis method (e.g. fel, meme, slac)
        #[arg(short, long)]
        method: String,

        /// Cores to use; 0 or "all" means all cores
        #[arg(long, default_value = "all")]
        cpu: CpuSetting,

        /// Trials to run
        #[arg(short, long, default_value_t = DEFAULT_ITERATIONS)]
        iterations: u32,

        /// HyPhy executable
        #[arg(long, default_value = "hyphy")]
        hyphy_bin: PathBuf,

        /// HyPhy library path passed as LIBPATH=
        #[arg(long)]
        hyphy_libpath: Option<PathBuf>,

        /// Number of sequences in the alignment
        #[arg(long, default_value_t = 0)]
        sequences: u64,

        /// Number of sites in the alignment
        #[arg(long, default_value_t = 0)]
        sites: u64,

        /// Record output path
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Aggregate native and WASM results into comparison reports
    ///
    /// Missing result directories are treated as empty. Unreadable records
    /// are skipped with a warning.
    Aggregate {
        /// Directory of native records
        #[arg(long, value_name = "DIR")]
        native_dir: Option<PathBuf>,

        /// Directory of WASM records
        #[arg(long, value_name = "DIR")]
        wasm_dir: Option<PathBuf>,

        /// Legacy directory mixing both platforms, split by record tag
        #[arg(long, value_name = "DIR")]
        input_dir: Option<PathBuf>,

        /// Native configuration used as the overhead baseline
        #[arg(long, default_value_t = DEFAULT_BASELINE_CPU)]
        baseline_cpu: CpuSetting,

        /// WASM runtime compared against the baseline
        #[arg(long, default_value = DEFAULT_BROWSER)]
        browser: String,

        /// Report title
        #[arg(long, default_value = DEFAULT_TITLE)]
        title: String,

        /// Markdown report path
        #[arg(long, value_name = "FILE")]
        output_md: PathBuf,

        /// CSV report path
        #[arg(long, value_name = "FILE")]
        output_csv: PathBuf,

        /// JSON report path
        #[arg(long, value_name = "FILE")]
        output_json: PathBuf,
    },
}

impl Commands {
    /// Execute the command with the provided arguments.
    ///
    /// # Errors
    ///
    /// Returns `Err` if arguments are invalid, a record or report cannot be
    /// written, or a results directory cannot be listed.
    pub fn execute(self) -> Result<()> {
        match self {
            Commands::Run {
                alignment,
                method,
                cpu,
                iterations,
                hyphy_bin,
                hyphy_libpath,
                sequences,
                sites,
                output,
            } => commands::run(&RunOptions {
                alignment,
                method,
                cpu,
                iterations,
                hyphy_bin,
                hyphy_libpath,
                sequences,
                sites,
                output,
            }),
            Commands::Aggregate {
                native_dir,
                wasm_dir,
                input_dir,
                baseline_cpu,
                browser,
                title,
                output_md,
                output_csv,
                output_json,
            } => commands::aggregate(&AggregateOptions {
                native_dir,
                wasm_dir,
                input_dir,
                baseline_cpu,
                browser,
                title,
                output_md,
                output_csv,
                output_json,
            })
            .map(|_| ()),
        }
    }
}
