//! Domain-specific errors for the upload pipeline.

use beam_schema::ValidationError;
use thiserror::Error;

/// Any fatal failure of a pipeline stage. Every variant terminates the run;
/// nothing is retried.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// `metadata.json` missing or unreadable.
    #[error("metadata error: {0}")]
    Metadata(#[from] crate::metadata_io::MetadataIoError),

    /// Metadata failed schema validation.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Dependency install or bundling failed under strict mode.
    #[error("{0}")]
    Toolchain(#[from] crate::toolchain::ToolchainError),

    /// A required file or directory was missing while staging assets.
    #[error("could not find {0}")]
    MissingAsset(String),

    /// Archive creation failed.
    #[error("error occurred while creating release package: {0}")]
    Pack(#[source] std::io::Error),

    /// The packed archive breaches the upload ceiling.
    #[error(
        "upload file size is {size_mb:.2} MB; packages must be smaller than {limit_mb} MB"
    )]
    TooLarge {
        /// Archive size in decimal megabytes.
        size_mb: f64,
        /// The enforced ceiling in decimal megabytes.
        limit_mb: u64,
    },

    /// Authentication or upload failed.
    #[error(transparent)]
    Api(#[from] crate::api::ApiError),

    /// Filesystem trouble outside a more specific stage error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
