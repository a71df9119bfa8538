//! Binned maps — the data that flows between pipeline stages.
//!
//! A [`Map`] is a flat value vector over a [`Binning`] (row-major over the
//! binning's dimensions); a [`MapSet`] is the ordered collection of named
//! maps a stage consumes and produces. The pipeline core never inspects map
//! values — only the built-in stages do — but the container lives here so
//! the stage contract can be expressed in one place.

use serde::{Deserialize, Serialize};

use crate::binning::Binning;
use crate::errors::StageError;

/// A named histogram over a binning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Map {
    /// Map name (e.g., `"numu_flux"`, `"nue_trck"`).
    pub name: String,

    /// The binning the values are defined over.
    pub binning: Binning,

    /// Bin values, row-major, length `binning.num_bins()`.
    pub values: Vec<f64>,
}

impl Map {
    /// Create a map with every bin set to `fill`.
    pub fn filled(name: impl Into<String>, binning: Binning, fill: f64) -> Self {
        let n = binning.num_bins();
        Self {
            name: name.into(),
            binning,
            values: vec![fill; n],
        }
    }

    /// Create a map from explicit values.
    ///
    /// Fails when the value count does not match the binning's bin count.
    pub fn from_values(
        name: impl Into<String>,
        binning: Binning,
        values: Vec<f64>,
    ) -> Result<Self, StageError> {
        let name = name.into();
        if values.len() != binning.num_bins() {
            return Err(StageError::compute_failed(
                &name,
                format!(
                    "value count {} does not match binning ({} bins)",
                    values.len(),
                    binning.num_bins()
                ),
            ));
        }
        Ok(Self {
            name,
            binning,
            values,
        })
    }

    /// Sum over all bins.
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Return a copy with every value scaled by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            name: self.name.clone(),
            binning: self.binning.clone(),
            values: self.values.iter().map(|v| v * factor).collect(),
        }
    }
}

/// An ordered set of maps, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapSet {
    pub maps: Vec<Map>,
}

impl MapSet {
    /// Create a map set from maps, preserving order.
    pub fn new(maps: Vec<Map>) -> Self {
        Self { maps }
    }

    /// Look up a map by name.
    pub fn get(&self, name: &str) -> Option<&Map> {
        self.maps.iter().find(|m| m.name == name)
    }

    /// Map names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.maps.iter().map(|m| m.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}
