//! Effective-area transform stage (`aeff.scale`).
//!
//! Converts flux maps into expected event-count maps by a single
//! effective-area scale factor. Map names gain an `_counts` suffix.

use crate::binning::Binning;
use crate::config::StageParams;
use crate::errors::StageError;
use crate::map::MapSet;
use crate::pipeline::stage::{Stage, StageKind};

#[derive(Debug)]
pub struct AeffScale {
    input_binning: Binning,
    output_binning: Binning,
    aeff_scale: f64,
}

impl AeffScale {
    /// Construct from the stage's parameter record.
    ///
    /// Requires `input_binning` and `output_binning`; `aeff_scale` defaults
    /// to 1.0.
    pub fn from_params(params: &StageParams) -> Result<Self, StageError> {
        let input_binning = params.binning("input_binning")?;
        let output_binning = params.binning("output_binning")?;
        let aeff_scale = params.f64_or("aeff_scale", 1.0)?;

        if !aeff_scale.is_finite() || aeff_scale < 0.0 {
            return Err(StageError::invalid_param(
                "aeff_scale",
                "must be finite and non-negative",
            ));
        }

        Ok(Self {
            input_binning,
            output_binning,
            aeff_scale,
        })
    }
}

impl Stage for AeffScale {
    fn name(&self) -> &str {
        "aeff.scale"
    }

    fn kind(&self) -> StageKind {
        StageKind::Transform
    }

    fn input_binning(&self) -> Option<&Binning> {
        Some(&self.input_binning)
    }

    fn output_binning(&self) -> Option<&Binning> {
        Some(&self.output_binning)
    }

    fn compute(&self, input: Option<&MapSet>) -> Result<MapSet, StageError> {
        let input = input
            .ok_or_else(|| StageError::compute_failed(self.name(), "no input map set"))?;

        let maps = input
            .maps
            .iter()
            .map(|m| {
                let mut scaled = m.scaled(self.aeff_scale);
                scaled.name = format!("{}_counts", m.name);
                scaled
            })
            .collect();
        Ok(MapSet::new(maps))
    }
}
