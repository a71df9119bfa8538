//! Pipeline construction and validation.
//!
//! ## Submodules
//!
//! - [`stage`] — the [`Stage`] trait and its capability tag
//! - [`registry`] — explicit (category, service) → factory mapping
//! - [`builder`] — resolves, instantiates, and validates the stage chain
//! - [`runner`] — the immutable [`Pipeline`] container and sequential execution

pub mod builder;
pub mod registry;
pub mod runner;
pub mod stage;

pub use builder::PipelineBuilder;
pub use registry::{StageFactory, StageRegistry};
pub use runner::Pipeline;
pub use stage::{Stage, StageKind};
