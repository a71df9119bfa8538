//! Two-flavor oscillation transform stage (`osc.two_flavor`).
//!
//! Applies an averaged numu → nutau disappearance probability to the flux
//! maps: over many oscillation periods the survival probability averages to
//! `1 - sin²(2θ23) / 2`. The electron flavor passes through unchanged.

use crate::binning::Binning;
use crate::config::StageParams;
use crate::errors::StageError;
use crate::map::{Map, MapSet};
use crate::pipeline::stage::{Stage, StageKind};

#[derive(Debug)]
pub struct TwoFlavorOsc {
    input_binning: Binning,
    output_binning: Binning,
    theta23: f64,
}

impl TwoFlavorOsc {
    /// Construct from the stage's parameter record.
    ///
    /// Requires `input_binning`, `output_binning`, and `theta23` (radians).
    pub fn from_params(params: &StageParams) -> Result<Self, StageError> {
        let input_binning = params.binning("input_binning")?;
        let output_binning = params.binning("output_binning")?;
        let theta23 = params.f64("theta23")?;

        if !theta23.is_finite() {
            return Err(StageError::invalid_param("theta23", "must be finite"));
        }

        Ok(Self {
            input_binning,
            output_binning,
            theta23,
        })
    }

    /// Averaged numu survival probability.
    fn survival(&self) -> f64 {
        1.0 - (2.0 * self.theta23).sin().powi(2) / 2.0
    }

    fn require<'a>(&self, input: &'a MapSet, name: &str) -> Result<&'a Map, StageError> {
        input
            .get(name)
            .ok_or_else(|| StageError::compute_failed(self.name(), format!("missing input map `{name}`")))
    }
}

impl Stage for TwoFlavorOsc {
    fn name(&self) -> &str {
        "osc.two_flavor"
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

        let nue = self.require(input, "nue_flux")?;
        let numu = self.require(input, "numu_flux")?;

        let mut nue = nue.clone();
        nue.name = "nue".to_string();

        let mut numu = numu.scaled(self.survival());
        numu.name = "numu".to_string();

        Ok(MapSet::new(vec![nue, numu]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binning::BinningDim;
    use serde_json::json;
    use std::f64::consts::FRAC_PI_4;

    fn params(theta23: f64) -> StageParams {
        let binning = json!({ "dims": [ { "name": "energy", "edges": [1.0, 2.0, 4.0] } ] });
        match json!({
            "input_binning": binning,
            "output_binning": binning,
            "theta23": theta23
        }) {
            serde_json::Value::Object(map) => StageParams::new(map),
            _ => unreachable!(),
        }
    }

    fn flux_input() -> MapSet {
        let binning = Binning::new(vec![BinningDim::new("energy", vec![1.0, 2.0, 4.0])]);
        MapSet::new(vec![
            Map::filled("nue_flux", binning.clone(), 1.0),
            Map::filled("numu_flux", binning, 2.0),
        ])
    }

    #[test]
    fn test_from_params_requires_theta23() {
        let binning = json!({ "dims": [ { "name": "energy", "edges": [1.0, 2.0] } ] });
        let p = match json!({ "input_binning": binning, "output_binning": binning }) {
            serde_json::Value::Object(map) => StageParams::new(map),
            _ => unreachable!(),
        };
        assert_eq!(
            TwoFlavorOsc::from_params(&p).unwrap_err(),
            StageError::missing_param("theta23")
        );
    }

    #[test]
    fn test_maximal_mixing_halves_numu() {
        // theta23 = pi/4 → sin²(2θ) = 1 → survival 0.5.
        let stage = TwoFlavorOsc::from_params(&params(FRAC_PI_4)).unwrap();
        let out = stage.compute(Some(&flux_input())).unwrap();
        assert!((out.get("numu").unwrap().total() - 2.0).abs() < 1e-12); // 4.0 * 0.5
        assert!((out.get("nue").unwrap().total() - 2.0).abs() < 1e-12); // unchanged
    }

    #[test]
    fn test_zero_mixing_is_identity_for_numu() {
        let stage = TwoFlavorOsc::from_params(&params(0.0)).unwrap();
        let out = stage.compute(Some(&flux_input())).unwrap();
        assert_eq!(out.get("numu").unwrap().total(), 4.0);
    }

    #[test]
    fn test_missing_input_map_fails() {
        let stage = TwoFlavorOsc::from_params(&params(FRAC_PI_4)).unwrap();
        let binning = Binning::new(vec![BinningDim::new("energy", vec![1.0, 2.0, 4.0])]);
        let input = MapSet::new(vec![Map::filled("nue_flux", binning, 1.0)]);
        let err = stage.compute(Some(&input)).unwrap_err();
        assert!(err.to_string().contains("numu_flux"));
    }

    #[test]
    fn test_no_input_fails() {
        let stage = TwoFlavorOsc::from_params(&params(FRAC_PI_4)).unwrap();
        assert!(stage.compute(None).is_err());
    }

    #[test]
    fn test_declares_both_binnings() {
        let stage = TwoFlavorOsc::from_params(&params(FRAC_PI_4)).unwrap();
        assert_eq!(stage.kind(), StageKind::Transform);
        assert!(stage.input_binning().is_some());
        assert!(stage.output_binning().is_some());
    }
}
