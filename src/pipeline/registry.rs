//! Stage registry — the explicit (category, service) → factory mapping.
//!
//! Implementations are registered at process initialization instead of being
//! derived from configuration keys by naming convention, so a missing
//! implementation is a startup-time condition rather than a deferred runtime
//! surprise. The registry is read-only once populated and can be shared
//! across concurrent pipeline builds.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::config::{StageParams, StageSpec};
use crate::errors::{BuildResult, PipelineBuildError, StageError};
use crate::pipeline::stage::Stage;

/// A factory producing a stage from its parameter record.
pub type StageFactory =
    Box<dyn Fn(&StageParams) -> Result<Box<dyn Stage>, StageError> + Send + Sync>;

/// Maps a (category, service) pair to a constructable stage.
pub struct StageRegistry {
    factories: FxHashMap<(String, String), StageFactory>,
}

impl StageRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            factories: FxHashMap::default(),
        }
    }

    /// Create a registry pre-loaded with the built-in stage set.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        crate::stages::register_builtins(&mut registry);
        registry
    }

    /// Register a factory for a (category, service) pair.
    ///
    /// Keys are lowercased; a later registration for the same pair replaces
    /// the earlier one, so callers can override built-ins.
    pub fn register<F>(&mut self, category: &str, service: &str, factory: F)
    where
        F: Fn(&StageParams) -> Result<Box<dyn Stage>, StageError> + Send + Sync + 'static,
    {
        debug!(category, service, "registering stage factory");
        self.factories.insert(
            (category.to_lowercase(), service.to_lowercase()),
            Box::new(factory),
        );
    }

    /// Look up the factory for a (category, service) pair.
    pub fn resolve(&self, category: &str, service: &str) -> BuildResult<&StageFactory> {
        self.factories
            .get(&(category.to_lowercase(), service.to_lowercase()))
            .ok_or_else(|| PipelineBuildError::unresolved(category, service))
    }

    /// Resolve and construct the stage described by `spec`.
    ///
    /// A construction failure is wrapped with the (category, service) it
    /// occurred in, keeping the original cause attached.
    pub fn instantiate(&self, spec: &StageSpec) -> BuildResult<Box<dyn Stage>> {
        let factory = self.resolve(&spec.category, &spec.service)?;
        factory(&spec.params).map_err(|source| {
            PipelineBuildError::construction_failed(&spec.category, &spec.service, source)
        })
    }

    /// Number of registered (category, service) pairs.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl Default for StageRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
