//! Top-level error for the command-line host.

use std::path::PathBuf;

use canvas::codec::{ExportError, ImportError};
use canvas::detect::DetectError;
use canvas::document::DocumentError;
use canvas::form::GenerateError;
use canvas::session::SessionError;

use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error(transparent)]
    Detect(#[from] DetectError),
    #[error("field detection is not configured; set FORMMAP_DETECT_URL or pass --detect-url")]
    DetectionDisabled,
    #[error("detection service reports it is unavailable")]
    DetectionUnavailable,
    #[error("field detection failed: {0}")]
    DetectionFailed(String),
    #[error("no page images found in {0}")]
    NoPageImages(PathBuf),
    #[error("{0} field validation error(s)")]
    Invalid(usize),
}

impl AppError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "E_IO",
            Self::Config(e) => e.error_code(),
            Self::Document(e) => e.error_code(),
            Self::Session(e) => e.error_code(),
            Self::Import(e) => e.error_code(),
            Self::Export(e) => e.error_code(),
            Self::Generate(e) => e.error_code(),
            Self::Detect(e) => e.error_code(),
            Self::DetectionDisabled => "E_DETECT_DISABLED",
            Self::DetectionUnavailable => "E_DETECT_UNAVAILABLE",
            Self::DetectionFailed(_) => "E_DETECT_FAILED",
            Self::NoPageImages(_) => "E_NO_PAGE_IMAGES",
            Self::Invalid(_) => "E_INVALID_FIELDS",
        }
    }
}
