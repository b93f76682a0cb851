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

//! Benchmark record loading.
//!
//! Reads every `*.json` record in a results directory. A missing directory
//! yields no records; a file that cannot be read or decoded is skipped
//! with a warning and loading carries on.

use crate::core::{BenchmarkRecord, Platform};
use crate::error::{BenchError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A file that was skipped during loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Records found in one source, plus the files that were skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedRecords {
    pub records: Vec<BenchmarkRecord>,
    pub skipped: Vec<SkippedFile>,
}

impl LoadedRecords {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Appends another load result.
    pub fn extend(&mut self, other: LoadedRecords) {
        self.records.extend(other.records);
        self.skipped.extend(other.skipped);
    }
}

/// Records of a legacy mixed source, split by platform tag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartitionedRecords {
    pub native: LoadedRecords,
    pub sandboxed: LoadedRecords,
}

/// Decodes one record.
pub fn parse_record(content: &str, path: &Path) -> Result<BenchmarkRecord> {
    serde_json::from_str(content).map_err(|e| BenchError::MalformedRecord {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Loads all records in `dir`, leaving their platform tags untouched.
///
/// # Errors
///
/// Returns [`BenchError::Io`] only if `dir` exists but cannot be listed.
/// An absent `dir` (either `None` or a nonexistent path) yields an empty
/// result.
pub fn load_records(dir: Option<&Path>) -> Result<LoadedRecords> {
    let mut loaded = LoadedRecords::default();

    let dir = match dir {
        Some(dir) if dir.exists() => dir,
        Some(dir) => {
            info!("Results directory {} not found, no records loaded", dir.display());
            return Ok(loaded);
        }
        None => return Ok(loaded),
    };

    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|e| BenchError::io(dir, e))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json"))
        .collect();
    paths.sort();

    for path in paths {
        let parsed = fs::read_to_string(&path)
            .map_err(|e| BenchError::io(&path, e))
            .and_then(|content| parse_record(&content, &path));

        match parsed {
            Ok(record) => loaded.records.push(record),
            Err(err) => {
                warn!("Skipping {}: {}", path.display(), err);
                loaded.skipped.push(SkippedFile {
                    path,
                    reason: err.to_string(),
                });
            }
        }
    }

    info!(
        "Loaded {} records from {} ({} skipped)",
        loaded.records.len(),
        dir.display(),
        loaded.skipped.len()
    );
    Ok(loaded)
}

/// Loads a per-platform directory, tagging every record with `platform`.
pub fn load_platform(dir: Option<&Path>, platform: Platform) -> Result<LoadedRecords> {
    let mut loaded = load_records(dir)?;
    for record in &mut loaded.records {
        record.platform = platform;
    }
    Ok(loaded)
}

/// Loads a legacy mixed directory and splits it by platform tag.
///
/// Untagged records count as native.
pub fn load_partitioned(dir: Option<&Path>) -> Result<PartitionedRecords> {
    let loaded = load_records(dir)?;
    let (sandboxed, native): (Vec<_>, Vec<_>) = loaded
        .records
        .into_iter()
        .partition(|record| record.platform == Platform::Wasm);

    Ok(PartitionedRecords {
        native: LoadedRecords {
            records: native,
            skipped: loaded.skipped,
        },
        sandboxed: LoadedRecords {
            records: sandboxed,
            skipped: Vec::new(),
        },
    })
}
