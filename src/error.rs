//! Error types for the reporter

use std::path::PathBuf;
use thiserror::Error;

/// Failures while loading the test report
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Report file not found at: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read report {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse report {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Invalid or incomplete configuration
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: '{value}' ({reason})")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Errors returned by the test-management API
#[derive(Error, Debug)]
pub enum TestRailError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("TestRail returned {status} for {endpoint}: {body}")]
    Api {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("Unexpected response from {endpoint}: {reason}")]
    InvalidResponse { endpoint: String, reason: String },
}
