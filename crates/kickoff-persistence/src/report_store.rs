//! Setup run reports.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use kickoff_models::SetupResult;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::atomic::{atomic_write_json, ensure_dir, read_json};
use crate::error::{PersistenceError, Result};

/// One finished setup run as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub organization: String,
    pub project: String,
    pub finished_at: DateTime<Utc>,
    pub result: SetupResult,
}

impl RunReport {
    pub fn new(
        organization: impl Into<String>,
        project: impl Into<String>,
        result: SetupResult,
    ) -> Self {
        Self {
            organization: organization.into(),
            project: project.into(),
            finished_at: Utc::now(),
            result,
        }
    }

    /// `<project-slug>-<yyyymmddThhmmssmmm>`
    fn file_stem(&self) -> String {
        format!(
            "{}-{}",
            slug(&self.project),
            self.finished_at.format("%Y%m%dT%H%M%S%3f")
        )
    }
}

/// Splits a report file stem into project slug and timestamp.
fn split_stem(path: &Path) -> Option<(&str, &str)> {
    path.file_stem()?.to_str()?.rsplit_once('-')
}

/// Lowercase ASCII alphanumerics, everything else collapsed to `-`.
fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    let trimmed = out.trim_matches('-');
    if trimmed.is_empty() {
        "project".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Stores run reports as individual JSON files:
/// ```text
/// base_path/
/// └── reports/
///     ├── acme-20240101T120000000.json
///     ├── acme-20240101T120000000_2.json
///     └── acme-20240102T093000250.json
/// ```
pub struct ReportStore {
    base_path: PathBuf,
}

impl ReportStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn reports_dir(&self) -> PathBuf {
        self.base_path.join("reports")
    }

    /// Writes a report and returns its path.
    ///
    /// Never replaces an existing report: a name already taken gets a
    /// `_<n>` suffix.
    pub fn save(&self, report: &RunReport) -> Result<PathBuf> {
        let dir = self.reports_dir();
        ensure_dir(&dir)?;

        let stem = report.file_stem();
        let mut path = dir.join(format!("{}.json", stem));
        let mut n = 2;
        while path.exists() {
            path = dir.join(format!("{}_{}.json", stem, n));
            n += 1;
        }
        atomic_write_json(&path, report)?;
        info!(path = %path.display(), outcome = ?report.result.outcome, "Saved setup report");
        Ok(path)
    }

    pub fn load(&self, path: &Path) -> Result<RunReport> {
        read_json(path)
    }

    /// Report files, oldest first.
    pub fn list(&self) -> Result<Vec<PathBuf>> {
        let dir = self.reports_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&dir).map_err(|source| PersistenceError::ReadError {
            path: dir.clone(),
            source,
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| PersistenceError::ReadError {
                path: dir.clone(),
                source,
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }

        // File names end in a sortable timestamp.
        paths.sort_by_key(|p| split_stem(p).map(|(_, stamp)| stamp.to_string()));
        Ok(paths)
    }

    /// Most recent report for `project`, if any.
    ///
    /// Only files whose slug equals the project's are read, and the stored
    /// project name must match exactly.
    pub fn latest_for(&self, project: &str) -> Result<Option<RunReport>> {
        let wanted = slug(project);
        for path in self.list()?.into_iter().rev() {
            if split_stem(&path).map(|(s, _)| s) != Some(wanted.as_str()) {
                continue;
            }
            let report = self.load(&path)?;
            if report.project == project {
                return Ok(Some(report));
            }
        }
        Ok(None)
    }
}
