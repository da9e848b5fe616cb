use mutscope_core::ValidationError;
use mutscope_io::StructureError;
use std::path::PathBuf;
use thiserror::Error;

/// Failures that reach the caller of the prediction service.
///
/// Remote and catalogue failures never show up here; they degrade to
/// synthesis inside the service.
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The structure file for `job` could not be written.
    #[error("could not write structure for {job}: {source}")]
    Serialization {
        job: String,
        #[source]
        source: StructureError,
    },

    #[error("could not write report {path}: {source}")]
    Report {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not encode report: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PredictionError>;
