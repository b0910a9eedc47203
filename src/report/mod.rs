pub mod types;

pub use types::*;

use crate::error::ReportError;
use std::path::{Path, PathBuf};

/// Default location of the JSON report, relative to the working directory
pub fn default_report_path() -> PathBuf {
    Path::new("reports").join("report.json")
}

/// Load and parse the test report
pub fn load_report(path: &Path) -> Result<TestReport, ReportError> {
    if !path.exists() {
        return Err(ReportError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let report: TestReport =
        serde_json::from_str(&content).map_err(|source| ReportError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    log::debug!(
        "Loaded report {} ({} tests)",
        path.display(),
        report.tests().len()
    );
    Ok(report)
}
