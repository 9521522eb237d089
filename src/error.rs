use crate::model::server::ServerId;
use std::path::PathBuf;
use thiserror::Error;

/// Rejection of a metrics reading before it is scored.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetricsError {
    #[error("{server}: {field} is not a finite number")]
    NotFinite { server: ServerId, field: &'static str },

    #[error("{server}: {field} must not be negative (got {value})")]
    Negative {
        server: ServerId,
        field: &'static str,
        value: f64,
    },

    #[error("{server}: total tables must be greater than zero")]
    NoTables { server: ServerId },

    #[error("{server}: visited {visited} tables out of {total}")]
    VisitedExceedsTotal {
        server: ServerId,
        visited: u32,
        total: u32,
    },

    #[error("{server}: {field} must be within 0-100 (got {value})")]
    PercentOutOfRange {
        server: ServerId,
        field: &'static str,
        value: f64,
    },
}

impl MetricsError {
    pub fn server(&self) -> &ServerId {
        match self {
            MetricsError::NotFinite { server, .. }
            | MetricsError::Negative { server, .. }
            | MetricsError::NoTables { server }
            | MetricsError::VisitedExceedsTotal { server, .. }
            | MetricsError::PercentOutOfRange { server, .. } => server,
        }
    }
}

#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("failed to read policy file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid policy file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("scoring weights must sum to 100 (got {0})")]
    Weights(u32),

    #[error("{field} must be within 0-100 (got {value})")]
    WeightOutOfRange { field: &'static str, value: u32 },

    #[error("label thresholds need 0 < watch ({watch}) < excellent ({excellent}) <= 100")]
    Thresholds { watch: u8, excellent: u8 },

    #[error("response curve needs 0 <= best ({best}) < worst ({worst})")]
    ResponseCurve { best: f64, worst: f64 },

    #[error("speed curve needs a positive full-score speed (got {0})")]
    SpeedCurve(f64),

    #[error("speed bands need 0 <= slow ({slow}) < fast ({fast})")]
    SpeedBands { slow: f64, fast: f64 },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error("cannot open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("terminal error: {0}")]
    Io(#[from] std::io::Error),
}
