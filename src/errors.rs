//! Error types for binpipe.
//!
//! Two error types cover the pipeline lifecycle:
//!
//! - [`PipelineBuildError`] — structural problems found while resolving,
//!   instantiating, and validating the stage chain. These are configuration
//!   errors: the build aborts on the first one and never returns a partial
//!   pipeline.
//! - [`StageError`] — failures raised by a stage implementation itself,
//!   either while constructing from its parameters or while computing. A
//!   construction failure is surfaced by the builder as
//!   [`PipelineBuildError::StageConstructionFailed`] with the original cause
//!   attached.

use thiserror::Error;

use crate::binning::Binning;

/// Result type alias for pipeline construction.
pub type BuildResult<T> = std::result::Result<T, PipelineBuildError>;

/// A structural error found while building a pipeline.
///
/// Every variant aborts the build immediately; none is retriable.
#[derive(Error, Debug)]
pub enum PipelineBuildError {
    /// No implementation is registered for the (category, service) pair.
    #[error("no stage registered for category `{category}` service `{service}`")]
    UnresolvedStage { category: String, service: String },

    /// The stage factory was found but failed to construct the stage.
    #[error("failed to construct stage `{category}.{service}`")]
    StageConstructionFailed {
        category: String,
        service: String,
        #[source]
        source: StageError,
    },

    /// The stage at position 0 requires an input — only a source stage may
    /// head the pipeline.
    #[error("pipeline head `{category}.{service}` is not a source stage")]
    InvalidPipelineHead { category: String, service: String },

    /// A source stage appeared at a non-head position.
    #[error("stage `{category}.{service}` at position {index} is not a transform stage")]
    InvalidStagePosition {
        index: usize,
        category: String,
        service: String,
    },

    /// Adjacent stages declare incompatible binnings.
    #[error(
        "binning mismatch at position {index}: `{predecessor}` outputs {output}, \
         but `{successor}` expects {input}"
    )]
    ShapeMismatch {
        index: usize,
        predecessor: String,
        successor: String,
        output: Binning,
        input: Binning,
    },

    /// A stage declares an input binning but its predecessor declares no
    /// output binning to check it against.
    #[error(
        "stage `{successor}` at position {index} declares an input binning, \
         but `{predecessor}` declares no output binning"
    )]
    MissingOutputShape {
        index: usize,
        predecessor: String,
        successor: String,
    },
}

impl PipelineBuildError {
    /// Create an [`UnresolvedStage`](Self::UnresolvedStage) error.
    pub fn unresolved(category: impl Into<String>, service: impl Into<String>) -> Self {
        Self::UnresolvedStage {
            category: category.into(),
            service: service.into(),
        }
    }

    /// Wrap a construction failure, attaching the original cause.
    pub fn construction_failed(
        category: impl Into<String>,
        service: impl Into<String>,
        source: StageError,
    ) -> Self {
        Self::StageConstructionFailed {
            category: category.into(),
            service: service.into(),
            source,
        }
    }
}

/// A failure raised by a stage implementation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StageError {
    /// A required constructor parameter is absent.
    #[error("missing required parameter `{name}`")]
    MissingParam { name: String },

    /// A constructor parameter is present but unusable.
    #[error("invalid parameter `{name}`: {message}")]
    InvalidParam { name: String, message: String },

    /// The stage's computation failed.
    #[error("stage `{stage}` failed: {message}")]
    ComputeFailed { stage: String, message: String },
}

impl StageError {
    /// Create a missing-parameter error.
    pub fn missing_param(name: impl Into<String>) -> Self {
        Self::MissingParam { name: name.into() }
    }

    /// Create an invalid-parameter error.
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParam {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a computation-failure error.
    pub fn compute_failed(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ComputeFailed {
            stage: stage.into(),
            message: message.into(),
        }
    }
}
