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

//! PhyloBench Command Line Interface

use clap::Parser;
use phylobench_cli::cli::Commands;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// PhyloBench - cross-platform HyPhy benchmarking
///
/// Runs native benchmarks of the HyPhy analysis tool and aggregates native
/// and sandboxed (WASM) results into comparison reports.
///
/// # Examples
///
/// ```bash
/// # Benchmark FEL on one alignment with a single core
/// phylobench run --alignment data/bglobin.nex --method fel --cpu 1 \
///     --output results/native/bglobin_fel_cpu1.json
///
/// # Aggregate native and WASM results
/// phylobench aggregate --native-dir results/native --wasm-dir results/wasm \
///     --output-md summary.md --output-csv summary.csv --output-json summary.json
/// ```
#[derive(Parser)]
#[command(name = "phylobench")]
#[command(author, version, about = "PhyloBench - cross-platform HyPhy benchmarking", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> ExitCode {
    // Diagnostics go to stderr; report output and progress stay on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("phylobench=info,phylobench_cli=info")
        }))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
