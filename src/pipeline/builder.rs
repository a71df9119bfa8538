//! Pipeline builder — resolves, instantiates, and validates the stage chain.
//!
//! [`PipelineBuilder::build`] walks the configuration in declared order and
//! enforces the structural invariants as it goes:
//!
//! 1. the head stage must be a source stage (requires no input);
//! 2. every later stage must be a transform stage;
//! 3. where a stage declares an input binning, the predecessor must declare
//!    an equal output binning.
//!
//! Validation is fail-fast: the first violation aborts the build and no
//! partial pipeline is ever returned. A stage that declares no input binning
//! is not checked against its predecessor — shape compatibility is opt-in
//! per stage, not a universal requirement.

use tracing::debug;

use crate::config::PipelineConfig;
use crate::errors::{BuildResult, PipelineBuildError};
use crate::pipeline::registry::StageRegistry;
use crate::pipeline::runner::Pipeline;
use crate::pipeline::stage::{Stage, StageKind};

/// Builds a validated [`Pipeline`] from an ordered [`PipelineConfig`].
pub struct PipelineBuilder<'r> {
    registry: &'r StageRegistry,
}

impl<'r> PipelineBuilder<'r> {
    /// Create a builder over the given registry.
    pub fn new(registry: &'r StageRegistry) -> Self {
        Self { registry }
    }

    /// Build the pipeline, or fail with the first violated invariant.
    ///
    /// Stage order in the result equals the configuration's declared order,
    /// and the result length equals the configuration length.
    pub fn build(&self, config: &PipelineConfig) -> BuildResult<Pipeline> {
        let mut stages: Vec<Box<dyn Stage>> = Vec::with_capacity(config.len());
        let mut names: Vec<String> = Vec::with_capacity(config.len());

        for (index, spec) in config.specs().iter().enumerate() {
            let stage = self.registry.instantiate(spec)?;
            debug!(
                index,
                category = %spec.category,
                service = %spec.service,
                kind = ?stage.kind(),
                "instantiated stage"
            );

            let qualified = format!("{}.{}", spec.category, spec.service);

            if index == 0 {
                if stage.kind() != StageKind::Source {
                    return Err(PipelineBuildError::InvalidPipelineHead {
                        category: spec.category.clone(),
                        service: spec.service.clone(),
                    });
                }
            } else {
                if stage.kind() != StageKind::Transform {
                    return Err(PipelineBuildError::InvalidStagePosition {
                        index,
                        category: spec.category.clone(),
                        service: spec.service.clone(),
                    });
                }

                // Shape chaining is opt-in: stages declaring no input
                // binning accept any predecessor.
                if let Some(input) = stage.input_binning() {
                    let predecessor = &stages[index - 1];
                    match predecessor.output_binning() {
                        None => {
                            return Err(PipelineBuildError::MissingOutputShape {
                                index,
                                predecessor: names[index - 1].clone(),
                                successor: qualified,
                            });
                        }
                        Some(output) if output != input => {
                            return Err(PipelineBuildError::ShapeMismatch {
                                index,
                                predecessor: names[index - 1].clone(),
                                successor: qualified,
                                output: output.clone(),
                                input: input.clone(),
                            });
                        }
                        Some(_) => {}
                    }
                }
            }

            stages.push(stage);
            names.push(qualified);
        }

        debug!(num_stages = stages.len(), "pipeline built");
        Ok(Pipeline::new(stages))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binning::{Binning, BinningDim};
    use crate::config::{PipelineConfig, StageParams, StageSpec};
    use crate::errors::StageError;
    use crate::map::MapSet;

    // ─── Test stage scaffolding ─────────────────────────────────────────

    struct TestStage {
        name: String,
        kind: StageKind,
        input: Option<Binning>,
        output: Option<Binning>,
    }

    impl Stage for TestStage {
        fn name(&self) -> &str {
            &self.name
        }
        fn kind(&self) -> StageKind {
            self.kind
        }
        fn input_binning(&self) -> Option<&Binning> {
            self.input.as_ref()
        }
        fn output_binning(&self) -> Option<&Binning> {
            self.output.as_ref()
        }
        fn compute(&self, _input: Option<&MapSet>) -> Result<MapSet, StageError> {
            Ok(MapSet::default())
        }
    }

    fn g1() -> Binning {
        Binning::new(vec![BinningDim::linear("energy", 10, 1.0, 80.0)])
    }

    fn g2() -> Binning {
        Binning::new(vec![BinningDim::linear("energy", 20, 1.0, 80.0)])
    }

    /// Registry with one category per capability/shape combination needed
    /// by the tests below.
    fn registry() -> StageRegistry {
        let mut r = StageRegistry::new();
        r.register("a", "src", |_| {
            Ok(Box::new(TestStage {
                name: "a.src".into(),
                kind: StageKind::Source,
                input: None,
                output: Some(g1()),
            }))
        });
        r.register("a", "src_unshaped", |_| {
            Ok(Box::new(TestStage {
                name: "a.src_unshaped".into(),
                kind: StageKind::Source,
                input: None,
                output: None,
            }))
        });
        r.register("b", "xform_g1", |_| {
            Ok(Box::new(TestStage {
                name: "b.xform_g1".into(),
                kind: StageKind::Transform,
                input: Some(g1()),
                output: Some(g1()),
            }))
        });
        r.register("b", "xform_g2", |_| {
            Ok(Box::new(TestStage {
                name: "b.xform_g2".into(),
                kind: StageKind::Transform,
                input: Some(g2()),
                output: Some(g2()),
            }))
        });
        r.register("b", "xform_unshaped", |_| {
            Ok(Box::new(TestStage {
                name: "b.xform_unshaped".into(),
                kind: StageKind::Transform,
                input: None,
                output: None,
            }))
        });
        r.register("b", "xform_src_kind", |_| {
            Ok(Box::new(TestStage {
                name: "b.xform_src_kind".into(),
                kind: StageKind::Source,
                input: None,
                output: Some(g1()),
            }))
        });
        r.register("c", "broken", |_| Err(StageError::missing_param("theta23")));
        r
    }

    fn config(pairs: &[(&str, &str)]) -> PipelineConfig {
        PipelineConfig::from_specs(
            pairs
                .iter()
                .map(|(category, service)| StageSpec {
                    category: category.to_string(),
                    service: service.to_string(),
                    params: StageParams::default(),
                })
                .collect(),
        )
    }

    fn build(pairs: &[(&str, &str)]) -> BuildResult<Pipeline> {
        let registry = registry();
        PipelineBuilder::new(&registry).build(&config(pairs))
    }

    // ─── Valid configurations ───────────────────────────────────────────

    #[test]
    fn test_two_stage_pipeline_builds_in_order() {
        let pipeline = build(&[("a", "src"), ("b", "xform_g1")]).unwrap();
        assert_eq!(pipeline.len(), 2);
        assert_eq!(pipeline.get(0).unwrap().name(), "a.src");
        assert_eq!(pipeline.get(1).unwrap().name(), "b.xform_g1");
    }

    #[test]
    fn test_single_source_pipeline_builds() {
        let pipeline = build(&[("a", "src")]).unwrap();
        assert_eq!(pipeline.len(), 1);
    }

    #[test]
    fn test_empty_config_builds_empty_pipeline() {
        let pipeline = build(&[]).unwrap();
        assert!(pipeline.is_empty());
    }

    #[test]
    fn test_chain_of_matching_shapes_builds() {
        let pipeline = build(&[
            ("a", "src"),
            ("b", "xform_g1"),
            ("b", "xform_g1"),
            ("b", "xform_g1"),
        ])
        .unwrap();
        assert_eq!(pipeline.len(), 4);
    }

    #[test]
    fn test_unshaped_transform_accepts_any_predecessor() {
        // xform_unshaped declares no input binning: shape checking is
        // opt-in, so it chains after anything.
        let pipeline = build(&[("a", "src"), ("b", "xform_unshaped")]).unwrap();
        assert_eq!(pipeline.len(), 2);

        let pipeline = build(&[("a", "src_unshaped"), ("b", "xform_unshaped")]).unwrap();
        assert_eq!(pipeline.len(), 2);
    }

    // ─── Head / position invariants ─────────────────────────────────────

    #[test]
    fn test_transform_at_head_fails() {
        let err = build(&[("b", "xform_g1")]).unwrap_err();
        assert!(matches!(
            err,
            PipelineBuildError::InvalidPipelineHead { ref category, .. } if category == "b"
        ));
    }

    #[test]
    fn test_source_after_head_fails() {
        let err = build(&[("a", "src"), ("b", "xform_src_kind")]).unwrap_err();
        assert!(matches!(
            err,
            PipelineBuildError::InvalidStagePosition { index: 1, .. }
        ));
    }

    // ─── Shape chaining ─────────────────────────────────────────────────

    #[test]
    fn test_shape_mismatch_reports_both_shapes() {
        let err = build(&[("a", "src"), ("b", "xform_g2")]).unwrap_err();
        match err {
            PipelineBuildError::ShapeMismatch {
                index,
                predecessor,
                successor,
                output,
                input,
            } => {
                assert_eq!(index, 1);
                assert_eq!(predecessor, "a.src");
                assert_eq!(successor, "b.xform_g2");
                assert_eq!(output, g1());
                assert_eq!(input, g2());
            }
            other => panic!("expected ShapeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_output_shape_fails() {
        let err = build(&[("a", "src_unshaped"), ("b", "xform_g1")]).unwrap_err();
        assert!(matches!(
            err,
            PipelineBuildError::MissingOutputShape { index: 1, .. }
        ));
    }

    #[test]
    fn test_mismatch_mid_chain_reports_position() {
        let err = build(&[("a", "src"), ("b", "xform_g1"), ("b", "xform_g2")]).unwrap_err();
        assert!(matches!(
            err,
            PipelineBuildError::ShapeMismatch { index: 2, .. }
        ));
    }

    // ─── Resolution / construction failures ─────────────────────────────

    #[test]
    fn test_unresolved_stage_aborts_build() {
        let err = build(&[("a", "nonexistent")]).unwrap_err();
        assert!(matches!(
            err,
            PipelineBuildError::UnresolvedStage { ref category, ref service }
                if category == "a" && service == "nonexistent"
        ));
    }

    #[test]
    fn test_construction_failure_propagates_cause() {
        let err = build(&[("a", "src"), ("c", "broken")]).unwrap_err();
        match err {
            PipelineBuildError::StageConstructionFailed { source, .. } => {
                assert_eq!(source, StageError::missing_param("theta23"));
            }
            other => panic!("expected StageConstructionFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_failure_is_fail_fast() {
        // The unresolved stage at position 1 must abort before the invalid
        // head check of a later stage could ever run.
        let err = build(&[("a", "src"), ("z", "nope"), ("b", "xform_g2")]).unwrap_err();
        assert!(matches!(err, PipelineBuildError::UnresolvedStage { .. }));
    }
}
