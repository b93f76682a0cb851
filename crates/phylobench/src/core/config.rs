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

//! Centralized benchmark configuration.
//!
//! Provides standardized configuration for trial execution and for the
//! cross-platform aggregation pass.

use crate::core::model::CpuSetting;
use crate::error::{BenchError, Result};
use std::time::Duration;

/// Default sandboxed runtime used for the cross-platform join.
pub const DEFAULT_BROWSER: &str = "chromium";

/// Native parallelism that serves as the overhead baseline.
pub const DEFAULT_BASELINE_CPU: CpuSetting = CpuSetting::Count(1);

/// Native parallelism reported as the "parallel" column.
pub const DEFAULT_PARALLEL_CPU: CpuSetting = CpuSetting::All;

/// Default number of trials per configuration.
pub const DEFAULT_ITERATIONS: u32 = 3;

/// Default wait for a sandboxed runtime to report readiness.
pub const DEFAULT_READY_TIMEOUT: Duration = Duration::from_secs(120);

/// Configuration for joining native and sandboxed result sets.
///
/// # Example
///
/// ```no_run
/// use phylobench::core::config::AggregateConfig;
/// use phylobench::core::CpuSetting;
///
/// let config = AggregateConfig::default()
///     .with_baseline_cpu(CpuSetting::Count(2))
///     .with_browser("firefox");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateConfig {
    /// Native configuration overhead is measured against.
    pub baseline_cpu: CpuSetting,
    /// Native configuration shown as the parallel column.
    pub parallel_cpu: CpuSetting,
    /// Sandboxed runtime joined against the baseline.
    pub browser: String,
}

impl AggregateConfig {
    pub fn new() -> Self {
        Self {
            baseline_cpu: DEFAULT_BASELINE_CPU,
            parallel_cpu: DEFAULT_PARALLEL_CPU,
            browser: DEFAULT_BROWSER.to_string(),
        }
    }

    /// Sets the baseline parallelism.
    pub fn with_baseline_cpu(mut self, cpu: CpuSetting) -> Self {
        self.baseline_cpu = cpu;
        self
    }

    /// Sets the parallel column's parallelism.
    pub fn with_parallel_cpu(mut self, cpu: CpuSetting) -> Self {
        self.parallel_cpu = cpu;
        self
    }

    /// Sets the sandboxed runtime to join on.
    pub fn with_browser(mut self, browser: impl Into<String>) -> Self {
        self.browser = browser.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.browser.trim().is_empty() {
            return Err(BenchError::invalid_config(
                "browser",
                "runtime identifier must not be empty",
            ));
        }
        Ok(())
    }
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for executing the trials of one benchmark configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Trials attempted per configuration; all are always attempted.
    pub iterations: u32,
    /// Bound on the sandboxed runtime's readiness wait.
    pub ready_timeout: Duration,
}

impl RunConfig {
    pub fn new(iterations: u32) -> Self {
        Self {
            iterations,
            ready_timeout: DEFAULT_READY_TIMEOUT,
        }
    }

    /// Sets the readiness timeout.
    pub fn with_ready_timeout(mut self, timeout: Duration) -> Self {
        self.ready_timeout = timeout;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(BenchError::invalid_config(
                "iterations",
                "at least one iteration is required",
            ));
        }
        if self.ready_timeout.is_zero() {
            return Err(BenchError::invalid_config(
                "ready_timeout",
                "timeout must be positive",
            ));
        }
        Ok(())
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ITERATIONS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_aggregate_config() {
        let config = AggregateConfig::default();
        assert_eq!(config.baseline_cpu, CpuSetting::Count(1));
        assert_eq!(config.parallel_cpu, CpuSetting::All);
        assert_eq!(config.browser, "chromium");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_aggregate_config_builders() {
        let config = AggregateConfig::new()
            .with_baseline_cpu(CpuSetting::Count(2))
            .with_parallel_cpu(CpuSetting::Count(8))
            .with_browser("firefox");
        assert_eq!(config.baseline_cpu, CpuSetting::Count(2));
        assert_eq!(config.parallel_cpu, CpuSetting::Count(8));
        assert_eq!(config.browser, "firefox");
    }

    #[test]
    fn test_empty_browser_rejected() {
        let config = AggregateConfig::default().with_browser("  ");
        assert!(matches!(
            config.validate(),
            Err(BenchError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_run_config_validation() {
        assert!(RunConfig::default().validate().is_ok());
        assert_eq!(RunConfig::default().iterations, DEFAULT_ITERATIONS);
        assert!(RunConfig::new(0).validate().is_err());
        assert!(RunConfig::new(3)
            .with_ready_timeout(Duration::ZERO)
            .validate()
            .is_err());
    }
}
