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

//! Structured error types for the PhyloBench CLI.

use phylobench::BenchError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for CLI commands.
pub type Result<T> = std::result::Result<T, CliError>;

/// The main error type for PhyloBench CLI operations.
#[derive(Error, Debug, Clone)]
pub enum CliError {
    /// Library operation failed.
    #[error(transparent)]
    Bench(#[from] BenchError),

    /// I/O operation failed outside the library.
    #[error("I/O error for '{path}': {message}")]
    Io {
        /// The file path that caused the error
        path: PathBuf,
        /// The error message
        message: String,
    },

    /// A command-line argument was rejected.
    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument {
        /// Argument name as typed on the command line
        name: String,
        /// Why it was rejected
        reason: String,
    },
}

impl CliError {
    /// Create an I/O error with file path context.
    pub fn io_error(path: impl Into<PathBuf>, err: io::Error) -> Self {
        CliError::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// Create an invalid-argument error.
    pub fn invalid_argument(name: impl Into<String>, reason: impl Into<String>) -> Self {
        CliError::InvalidArgument {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
