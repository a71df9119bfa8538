//! The stage contract.
//!
//! Every processing unit in a pipeline implements [`Stage`]. The trait is the
//! uniform interface the builder validates against: a closed capability tag
//! ([`StageKind`]) instead of type inspection, and explicit `Option` binning
//! accessors instead of attribute-presence probing. A stage that declares no
//! input binning opts out of shape checking against its predecessor.

use crate::binning::Binning;
use crate::errors::StageError;
use crate::map::MapSet;

/// Capability variant of a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    /// Produces output with no pipeline input. Legal only at position 0.
    Source,
    /// Requires a pipeline input. Legal at every position after 0.
    Transform,
}

/// One unit in the pipeline.
///
/// # Contract
///
/// - `kind` reports the capability variant and never changes over the
///   stage's lifetime.
/// - `input_binning` / `output_binning` are declarations, fixed at
///   construction; `None` means "no shape constraint declared".
/// - `compute` receives `None` exactly when the stage is the pipeline head;
///   a transform stage may assume `Some` input once the pipeline is built,
///   since the builder guarantees it.
///
/// Stages are `Send + Sync` so a built pipeline can be shared across
/// threads; stages themselves are immutable after construction.
pub trait Stage: Send + Sync {
    /// Qualified name for diagnostics (e.g., `"flux.honda"`).
    fn name(&self) -> &str;

    /// Capability variant.
    fn kind(&self) -> StageKind;

    /// Declared input binning, if any.
    fn input_binning(&self) -> Option<&Binning> {
        None
    }

    /// Declared output binning, if any.
    fn output_binning(&self) -> Option<&Binning> {
        None
    }

    /// Produce this stage's output from the previous stage's output.
    fn compute(&self, input: Option<&MapSet>) -> Result<MapSet, StageError>;
}

impl std::fmt::Debug for dyn Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("name", &self.name())
            .field("kind", &self.kind())
            .finish()
    }
}
