//! Atmospheric flux source stage (`flux.honda`).
//!
//! Produces `nue_flux` and `numu_flux` maps over its output binning using a
//! falling power-law spectrum in the first binning dimension, with the
//! conventional ~2:1 muon-to-electron flavor ratio.

use crate::binning::Binning;
use crate::config::StageParams;
use crate::errors::StageError;
use crate::map::{Map, MapSet};
use crate::pipeline::stage::{Stage, StageKind};

/// Muon-to-electron flux ratio.
const FLAVOR_RATIO: f64 = 2.0;

#[derive(Debug)]
pub struct HondaFlux {
    output_binning: Binning,
    flux_scale: f64,
    spectral_index: f64,
}

impl HondaFlux {
    /// Construct from the stage's parameter record.
    ///
    /// Requires `output_binning`; `flux_scale` defaults to 1.0 and
    /// `spectral_index` to 2.7.
    pub fn from_params(params: &StageParams) -> Result<Self, StageError> {
        let output_binning = params.binning("output_binning")?;
        let flux_scale = params.f64_or("flux_scale", 1.0)?;
        let spectral_index = params.f64_or("spectral_index", 2.7)?;

        if !flux_scale.is_finite() || flux_scale < 0.0 {
            return Err(StageError::invalid_param(
                "flux_scale",
                "must be finite and non-negative",
            ));
        }
        if !spectral_index.is_finite() {
            return Err(StageError::invalid_param("spectral_index", "must be finite"));
        }

        Ok(Self {
            output_binning,
            flux_scale,
            spectral_index,
        })
    }

    /// Per-bin spectrum weights, row-major over the output binning.
    ///
    /// The first dimension is treated as the spectral axis; any trailing
    /// dimensions share the weight of their leading bin.
    fn spectrum(&self) -> Vec<f64> {
        let n = self.output_binning.num_bins();
        let leading = match self.output_binning.dims.first() {
            Some(dim) if dim.num_bins() > 0 => dim,
            _ => return vec![self.flux_scale; n],
        };
        let stride = n / leading.num_bins();

        (0..n)
            .map(|i| {
                let center = leading.bin_center(i / stride);
                self.flux_scale * center.powf(-self.spectral_index)
            })
            .collect()
    }
}

impl Stage for HondaFlux {
    fn name(&self) -> &str {
        "flux.honda"
    }

    fn kind(&self) -> StageKind {
        StageKind::Source
    }

    fn output_binning(&self) -> Option<&Binning> {
        Some(&self.output_binning)
    }

    fn compute(&self, _input: Option<&MapSet>) -> Result<MapSet, StageError> {
        let nue = self.spectrum();
        let numu: Vec<f64> = nue.iter().map(|v| v * FLAVOR_RATIO).collect();
        Ok(MapSet::new(vec![
            Map::from_values("nue_flux", self.output_binning.clone(), nue)?,
            Map::from_values("numu_flux", self.output_binning.clone(), numu)?,
        ]))
    }
}
