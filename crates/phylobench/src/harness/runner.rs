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

//! Benchmark runner for executing trials and assembling records.
//!
//! Trials of one configuration run strictly one after another. A failed
//! trial is recorded and the next one still runs; only a sandboxed runtime
//! that never becomes ready aborts a run.

use crate::core::{
    BenchmarkRecord, CpuSetting, Iteration, Platform, ProblemSize, RunConfig, SystemInfo,
    TrialFailure, TrialOutcome,
};
use crate::error::{BenchError, Result};
use crate::harness::statistics::compute_statistics;
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Executes one trial of a benchmark configuration.
pub trait TrialExecutor {
    /// Runs trial number `iteration` (1-based).
    fn run_trial(&mut self, iteration: u32) -> TrialOutcome;
}

/// A sandboxed runtime driver.
///
/// One session is initialized once and reused for every trial of a run.
pub trait SandboxSession: TrialExecutor {
    /// Blocks until the runtime signals readiness or `timeout` expires.
    ///
    /// Returns the runtime's tool version on success.
    fn wait_ready(&mut self, timeout: Duration) -> Result<String>;
}

/// What is being benchmarked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSpec {
    pub alignment: PathBuf,
    pub method: String,
    pub problem_size: ProblemSize,
}

impl RunSpec {
    pub fn new(alignment: impl Into<PathBuf>, method: impl Into<String>) -> Self {
        Self {
            alignment: alignment.into(),
            method: method.into(),
            problem_size: ProblemSize::default(),
        }
    }

    /// Sets the alignment dimensions.
    pub fn with_problem_size(mut self, sequences: u64, sites: u64) -> Self {
        self.problem_size = ProblemSize { sequences, sites };
        self
    }

    /// Dataset identifier: the alignment file name without extension.
    pub fn dataset(&self) -> String {
        self.alignment
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Runner for executing benchmarks with standardized configuration.
#[derive(Debug, Clone)]
pub struct BenchmarkRunner {
    config: RunConfig,
}

impl BenchmarkRunner {
    /// Creates a runner, rejecting an invalid configuration.
    pub fn new(config: RunConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Runs every configured trial in order, whatever their outcomes.
    pub fn run_iterations<E>(&self, executor: &mut E) -> Vec<Iteration>
    where
        E: TrialExecutor + ?Sized,
    {
        (1..=self.config.iterations)
            .map(|index| {
                let outcome = executor.run_trial(index);
                match &outcome {
                    Ok(ms) => debug!("Iteration {}/{}: {:.0}ms", index, self.config.iterations, ms),
                    Err(failure) => warn!(
                        "Iteration {}/{} failed: {:?}",
                        index, self.config.iterations, failure.detail
                    ),
                }
                Iteration::from_outcome(index, outcome)
            })
            .collect()
    }

    /// Runs a native benchmark and builds its record.
    pub fn run_native<E>(
        &self,
        spec: &RunSpec,
        cpu: CpuSetting,
        system_info: SystemInfo,
        executor: &mut E,
    ) -> BenchmarkRecord
    where
        E: TrialExecutor + ?Sized,
    {
        info!(
            "Running {} on {} (CPU={})",
            spec.method,
            spec.dataset(),
            cpu
        );
        let iterations = self.run_iterations(executor);
        let mut record = self.build_record(spec, Platform::Native, iterations);
        record.cpu = Some(cpu);
        record.system_info = Some(system_info);
        record
    }

    /// Runs a sandboxed benchmark on an already launched session.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::RuntimeNotReady`] if the session does not
    /// become ready within the configured timeout. No trial runs then.
    pub fn run_sandboxed<S>(
        &self,
        spec: &RunSpec,
        browser: &str,
        session: &mut S,
    ) -> Result<BenchmarkRecord>
    where
        S: SandboxSession + ?Sized,
    {
        info!(
            "Running sandboxed {} on {} ({})",
            spec.method,
            spec.dataset(),
            browser
        );
        let version = session
            .wait_ready(self.config.ready_timeout)
            .map_err(|err| match err {
                err @ BenchError::RuntimeNotReady { .. } => err,
                other => BenchError::RuntimeNotReady {
                    timeout: self.config.ready_timeout,
                    reason: other.to_string(),
                },
            })?;
        debug!("Sandboxed runtime ready: {}", version);

        let iterations = self.run_iterations(session);
        let mut record = self.build_record(spec, Platform::Wasm, iterations);
        record.browser = Some(browser.to_string());
        record.hyphy_version = Some(version);
        Ok(record)
    }

    fn build_record(
        &self,
        spec: &RunSpec,
        platform: Platform,
        iterations: Vec<Iteration>,
    ) -> BenchmarkRecord {
        let statistics = compute_statistics(&iterations);
        BenchmarkRecord {
            platform,
            dataset: spec.dataset(),
            method: spec.method.clone(),
            cpu: None,
            browser: None,
            sequences: spec.problem_size.sequences,
            sites: spec.problem_size.sites,
            iterations,
            statistics,
            system_info: None,
            hyphy_version: None,
            timestamp: Some(Utc::now()),
        }
    }
}

/// Runs the analysis tool as a child process.
#[derive(Debug, Clone)]
pub struct NativeExecutor {
    binary: PathBuf,
    libpath: Option<PathBuf>,
    method: String,
    alignment: PathBuf,
    cpu: CpuSetting,
}

impl NativeExecutor {
    pub fn new(binary: impl Into<PathBuf>, spec: &RunSpec, cpu: CpuSetting) -> Self {
        Self {
            binary: binary.into(),
            libpath: None,
            method: spec.method.clone(),
            alignment: spec.alignment.clone(),
            cpu,
        }
    }

    /// Sets the tool's library path.
    pub fn with_libpath(mut self, libpath: impl Into<PathBuf>) -> Self {
        self.libpath = Some(libpath.into());
        self
    }

    /// Command-line arguments passed to the tool.
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(count) = self.cpu.count() {
            args.push(format!("CPU={}", count));
        }
        if let Some(libpath) = &self.libpath {
            args.push(format!("LIBPATH={}", libpath.display()));
        }
        args.push(self.method.clone());
        args.push("--alignment".to_string());
        args.push(self.alignment.display().to_string());
        args
    }
}

impl TrialExecutor for NativeExecutor {
    fn run_trial(&mut self, _iteration: u32) -> TrialOutcome {
        let start = Instant::now();
        let output = Command::new(&self.binary)
            .args(self.args())
            .stdin(Stdio::null())
            .output();
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        match output {
            Ok(output) if output.status.success() => Ok(elapsed_ms),
            Ok(output) => match output.status.code() {
                Some(code) => Err(TrialFailure::exit_status(elapsed_ms, code)),
                None => Err(TrialFailure::error(elapsed_ms, "terminated by signal")),
            },
            Err(err) => Err(TrialFailure::error(
                elapsed_ms,
                format!("failed to launch {}: {}", self.binary.display(), err),
            )),
        }
    }
}

/// Upper bound on the `--version` probe.
pub const VERSION_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Asks the tool for its version; `None` if it cannot be determined.
pub fn probe_version(binary: &Path) -> Option<String> {
    probe_version_within(binary, VERSION_PROBE_TIMEOUT)
}

/// Like [`probe_version`], killing the tool if it has not exited within
/// `timeout`.
pub fn probe_version_within(binary: &Path, timeout: Duration) -> Option<String> {
    let mut child = Command::new(binary)
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .ok()?;

    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(_)) => break,
            Ok(None) if Instant::now() < deadline => thread::sleep(Duration::from_millis(20)),
            Ok(None) => {
                warn!(
                    "{} --version did not exit within {}s",
                    binary.display(),
                    timeout.as_secs()
                );
                let _ = child.kill();
                let _ = child.wait();
                return None;
            }
            Err(_) => return None,
        }
    }

    let output = child.wait_with_output().ok()?;
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
}
