//! Binning descriptors — the structural "shape" flowing between stages.
//!
//! A [`Binning`] is an ordered set of named dimensions, each carrying explicit
//! bin edges. Two binnings are compatible exactly when they are equal by
//! value: same dimensions, same order, same names, same edges. The pipeline
//! builder compares a stage's declared input binning against its
//! predecessor's declared output binning and nothing else — the binning is
//! otherwise opaque to the core.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One binning dimension: a name and monotonically increasing bin edges.
///
/// `n` edges define `n - 1` bins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinningDim {
    /// Dimension name (e.g., `"energy"`, `"coszen"`).
    pub name: String,

    /// Bin edges, ascending.
    pub edges: Vec<f64>,
}

impl BinningDim {
    /// Create a dimension with explicit edges.
    pub fn new(name: impl Into<String>, edges: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            edges,
        }
    }

    /// Create a dimension with `n_bins` equal-width bins over `[lo, hi]`.
    pub fn linear(name: impl Into<String>, n_bins: usize, lo: f64, hi: f64) -> Self {
        let width = (hi - lo) / n_bins as f64;
        let edges = (0..=n_bins).map(|i| lo + width * i as f64).collect();
        Self::new(name, edges)
    }

    /// Number of bins in this dimension.
    pub fn num_bins(&self) -> usize {
        self.edges.len().saturating_sub(1)
    }

    /// Midpoint of bin `i`.
    pub fn bin_center(&self, i: usize) -> f64 {
        (self.edges[i] + self.edges[i + 1]) / 2.0
    }
}

/// A multi-dimensional binning: the comparable shape descriptor declared by
/// stages as `input_binning` / `output_binning`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binning {
    /// Dimensions in declaration order.
    pub dims: Vec<BinningDim>,
}

impl Binning {
    /// Create a binning from its dimensions.
    pub fn new(dims: Vec<BinningDim>) -> Self {
        Self { dims }
    }

    /// Total number of bins (product over dimensions).
    pub fn num_bins(&self) -> usize {
        self.dims.iter().map(BinningDim::num_bins).product()
    }

    /// Per-dimension bin counts, in order.
    pub fn shape(&self) -> Vec<usize> {
        self.dims.iter().map(BinningDim::num_bins).collect()
    }

    /// Number of dimensions.
    pub fn num_dims(&self) -> usize {
        self.dims.len()
    }
}

/// Compact rendering used in diagnostics: `energy[10] x coszen[8]`.
impl fmt::Display for Binning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dims.is_empty() {
            return write!(f, "(empty)");
        }
        for (i, dim) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, " x ")?;
            }
            write!(f, "{}[{}]", dim.name, dim.num_bins())?;
        }
        Ok(())
    }
}
