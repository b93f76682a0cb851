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

//! Error types for benchmark loading, aggregation and execution.
//!
//! Trial-level failures are not errors: they are recorded as data on
//! [`Iteration`](crate::core::Iteration) and summarized by the statistics
//! engine. The variants here cover environment faults (unreadable sources,
//! unwritable outputs, a sandboxed runtime that never becomes ready) and
//! individually malformed records.

use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type for benchmarking operations
pub type Result<T> = std::result::Result<T, BenchError>;

/// Errors that can occur during benchmarking operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BenchError {
    /// File system operation failed.
    #[error("I/O error for '{path}': {message}")]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying error message
        message: String,
    },

    /// A stored benchmark record could not be decoded.
    #[error("Malformed record '{path}': {message}")]
    MalformedRecord {
        /// Source of the record
        path: PathBuf,
        /// Decoder message
        message: String,
    },

    /// Invalid configuration parameter
    #[error("Invalid configuration parameter '{parameter}': {reason}")]
    InvalidConfig {
        /// Parameter name
        parameter: String,
        /// Reason for invalidity
        reason: String,
    },

    /// The sandboxed runtime did not signal readiness in time.
    #[error("Sandboxed runtime not ready after {}s: {reason}", timeout.as_secs())]
    RuntimeNotReady {
        /// Readiness timeout that expired
        timeout: Duration,
        /// Driver-supplied detail
        reason: String,
    },

    /// Report serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl BenchError {
    /// Wraps an I/O error with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, err: io::Error) -> Self {
        BenchError::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// Builds an [`BenchError::InvalidConfig`].
    pub fn invalid_config(parameter: &str, reason: impl Into<String>) -> Self {
        BenchError::InvalidConfig {
            parameter: parameter.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for BenchError {
    fn from(err: serde_json::Error) -> Self {
        BenchError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for BenchError {
    fn from(err: csv::Error) -> Self {
        BenchError::Serialization(err.to_string())
    }
}
