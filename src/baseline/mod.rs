//! Baseline support for deadpkg
//!
//! A baseline records the dead packages of an earlier run so later runs can
//! report only packages that became dead since.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

use crate::analysis::{DeadPackage, DeadReport};

/// Baseline errors
#[derive(Error, Debug)]
pub enum BaselineError {
    #[error("Failed to read baseline file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse baseline: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Baseline version mismatch")]
    VersionMismatch,
}

/// Current baseline format version
const BASELINE_VERSION: u32 = 1;

/// Known dead packages to ignore
#[derive(Debug, Serialize, Deserialize)]
pub struct Baseline {
    /// Baseline format version
    pub version: u32,
    /// When the baseline was created
    pub created_at: String,
    /// Import paths known to be dead
    pub packages: BTreeSet<String>,
}

impl Baseline {
    pub fn from_report(report: &DeadReport) -> Self {
        Self {
            version: BASELINE_VERSION,
            created_at: chrono_lite_now(),
            packages: report
                .packages()
                .iter()
                .map(|p| p.import_path.clone())
                .collect(),
        }
    }

    /// Load a baseline from a file
    pub fn load(path: &Path) -> Result<Self, BaselineError> {
        let file = fs::File::open(path)?;
        let reader = BufReader::new(file);
        let baseline: Self = serde_json::from_reader(reader)?;

        if baseline.version != BASELINE_VERSION {
            return Err(BaselineError::VersionMismatch);
        }

        Ok(baseline)
    }

    /// Save baseline to a file
    pub fn save(&self, path: &Path) -> Result<(), BaselineError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = fs::File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    pub fn is_baselined(&self, package: &DeadPackage) -> bool {
        self.packages.contains(&package.import_path)
    }

    /// Drop every baselined package from the report
    pub fn filter_new(&self, report: &mut DeadReport) {
        report.retain(|p| !self.is_baselined(p));
    }

    /// Get statistics about baseline coverage
    pub fn stats(&self, report: &DeadReport) -> BaselineStats {
        let baselined = report
            .packages()
            .iter()
            .filter(|p| self.is_baselined(p))
            .count();

        BaselineStats {
            total_in_baseline: self.packages.len(),
            baselined_found: baselined,
            new_packages: report.len() - baselined,
        }
    }
}

/// Statistics about baseline comparison
#[derive(Debug, Clone)]
pub struct BaselineStats {
    /// Total packages recorded in baseline
    pub total_in_baseline: usize,
    /// Number of current dead packages that match baseline
    pub baselined_found: usize,
    /// Number of dead packages not in baseline
    pub new_packages: usize,
}

impl std::fmt::Display for BaselineStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} new dead packages ({} baselined, {} in baseline file)",
            self.new_packages, self.baselined_found, self.total_in_baseline
        )
    }
}

/// Seconds since the Unix epoch, as a string
fn chrono_lite_now() -> String {
    use std::time::SystemTime;

    let duration = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default();

    format!("{}", duration.as_secs())
}
