//! The built pipeline — an ordered, read-only stage container.
//!
//! A [`Pipeline`] only comes out of a successful
//! [`PipelineBuilder::build`](crate::pipeline::builder::PipelineBuilder::build),
//! so its structural invariants hold permanently: the head is a source
//! stage, every later stage is a transform stage, and all declared adjacent
//! binnings match. No stage is ever replaced or removed after construction.
//!
//! [`Pipeline::run`] executes the stages sequentially, threading each
//! stage's output [`MapSet`] into its successor.

use tracing::debug;

use crate::errors::StageError;
use crate::map::MapSet;
use crate::pipeline::stage::Stage;

/// An ordered, immutable sequence of validated stages.
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field(
                "stages",
                &self.stages.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Pipeline {
    /// Only the builder constructs pipelines.
    pub(crate) fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages }
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Indexed access for an external execution driver.
    pub fn get(&self, index: usize) -> Option<&dyn Stage> {
        self.stages.get(index).map(|s| &**s)
    }

    /// Sequential access, in execution order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Stage> {
        self.stages.iter().map(|s| &**s)
    }

    /// Execute the stages in order and return the final output.
    ///
    /// The head stage computes from no input; every later stage computes
    /// from its predecessor's output. An empty pipeline yields an empty
    /// [`MapSet`].
    pub fn run(&self) -> Result<MapSet, StageError> {
        let mut current: Option<MapSet> = None;
        for stage in self.iter() {
            debug!(stage = stage.name(), "running stage");
            let output = stage.compute(current.as_ref())?;
            debug!(stage = stage.name(), maps = output.len(), "stage done");
            current = Some(output);
        }
        Ok(current.unwrap_or_default())
    }
}
