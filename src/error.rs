// src/error.rs

use crate::model::role::Role;
use std::path::PathBuf;
use thiserror::Error;

/// Problems loading or validating controller parameters.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read parameter file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parameter file {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid parameters for {role}: {reason}")]
    Invalid { role: Role, reason: String },
}

/// Problems writing simulation output.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error while exporting: {0}")]
    Io(#[from] std::io::Error),
}
