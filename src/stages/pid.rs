//! Particle-ID split transform stage (`pid.fraction`).
//!
//! Splits each input map into a track-like (`*_trck`) and a cascade-like
//! (`*_cscd`) channel by a fixed fraction. Binning declarations are
//! optional: with both omitted, the stage is shape-agnostic and chains
//! after any predecessor without a compatibility check.

use crate::binning::Binning;
use crate::config::StageParams;
use crate::errors::StageError;
use crate::map::MapSet;
use crate::pipeline::stage::{Stage, StageKind};

#[derive(Debug)]
pub struct PidFraction {
    input_binning: Option<Binning>,
    output_binning: Option<Binning>,
    pid_fraction: f64,
}

impl PidFraction {
    /// Construct from the stage's parameter record.
    ///
    /// `pid_fraction` (the track-like share) defaults to 0.5 and must lie
    /// in `[0, 1]`; `input_binning` / `output_binning` may both be omitted.
    pub fn from_params(params: &StageParams) -> Result<Self, StageError> {
        let input_binning = params.opt_binning("input_binning")?;
        let output_binning = params.opt_binning("output_binning")?;
        let pid_fraction = params.f64_or("pid_fraction", 0.5)?;

        if !(0.0..=1.0).contains(&pid_fraction) {
            return Err(StageError::invalid_param(
                "pid_fraction",
                "must lie in [0, 1]",
            ));
        }

        Ok(Self {
            input_binning,
            output_binning,
            pid_fraction,
        })
    }
}

impl Stage for PidFraction {
    fn name(&self) -> &str {
        "pid.fraction"
    }

    fn kind(&self) -> StageKind {
        StageKind::Transform
    }

    fn input_binning(&self) -> Option<&Binning> {
        self.input_binning.as_ref()
    }

    fn output_binning(&self) -> Option<&Binning> {
        self.output_binning.as_ref()
    }

    fn compute(&self, input: Option<&MapSet>) -> Result<MapSet, StageError> {
        let input = input
            .ok_or_else(|| StageError::compute_failed(self.name(), "no input map set"))?;

        let mut maps = Vec::with_capacity(input.len() * 2);
        for m in &input.maps {
            let mut trck = m.scaled(self.pid_fraction);
            trck.name = format!("{}_trck", m.name);
            let mut cscd = m.scaled(1.0 - self.pid_fraction);
            cscd.name = format!("{}_cscd", m.name);
            maps.push(trck);
            maps.push(cscd);
        }
        Ok(MapSet::new(maps))
    }
}
