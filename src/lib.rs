//! # binpipe
//!
//! Declarative stage-pipeline construction and validation for binned
//! analysis templates.
//!
//! A pipeline is described by an ordered settings document: each entry names
//! a stage category, the service implementing it, and its constructor
//! parameters. [`PipelineBuilder`] resolves every entry against an explicit
//! [`StageRegistry`], instantiates the stages, and validates the chain as it
//! assembles it:
//!
//! - only the head stage may be a source stage (no pipeline input);
//! - every later stage must be a transform stage;
//! - where a stage declares an input binning, its predecessor must declare
//!   an equal output binning.
//!
//! Construction is all-or-nothing: the first violation aborts the build with
//! a structural [`PipelineBuildError`] and no partial pipeline escapes.
//!
//! ## Example
//!
//! ```
//! use binpipe::{PipelineBuilder, PipelineConfig, StageRegistry};
//!
//! let settings = r#"{
//!     "flux": {
//!         "service": "honda",
//!         "output_binning": { "dims": [ { "name": "energy", "edges": [1.0, 10.0, 80.0] } ] }
//!     },
//!     "pid": { "service": "fraction", "pid_fraction": 0.6 }
//! }"#;
//!
//! let config = PipelineConfig::from_json(settings).unwrap();
//! let registry = StageRegistry::with_defaults();
//! let pipeline = PipelineBuilder::new(&registry).build(&config).unwrap();
//! let result = pipeline.run().unwrap();
//! assert_eq!(result.len(), 4);
//! ```

pub mod binning;
pub mod config;
pub mod errors;
pub mod map;
pub mod pipeline;
pub mod stages;

// Re-export the types making up the public build surface.
pub use binning::{Binning, BinningDim};
pub use config::{ConfigError, PipelineConfig, StageParams, StageSpec};
pub use errors::{BuildResult, PipelineBuildError, StageError};
pub use map::{Map, MapSet};
pub use pipeline::{Pipeline, PipelineBuilder, Stage, StageKind, StageRegistry};
