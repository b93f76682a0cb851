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

//! Benchmark reporters for the cross-platform comparison.
//!
//! # Modules
//!
//! - `types`: The report data structure shared by every exporter
//! - `json`: Structured JSON summary
//! - `markdown`: Per-method comparison tables
//! - `csv`: Flat one-row-per-record export

pub mod csv;
pub mod json;
pub mod markdown;
pub mod types;

pub use self::csv::{export_csv, render_csv};
pub use self::json::{export_json, render_json};
pub use self::markdown::{export_markdown, render_markdown};
pub use self::types::{CrossPlatformReport, DEFAULT_TITLE};

use crate::error::{BenchError, Result};
use std::fs;
use std::path::Path;

/// Writes a rendered report, creating parent directories as needed.
pub(crate) fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| BenchError::io(parent, e))?;
    }
    fs::write(path, content).map_err(|e| BenchError::io(path, e))
}
