//! Along-stream density variation.

use rand::Rng;

use crate::StreamError;

/// Random clumping along the stream that drifts downstream over time.
///
/// Weights are `u⁴` for uniform `u`, so most cells are faint and a few are
/// dense.
#[derive(Debug, Clone)]
pub struct DensityPattern {
    n_points: usize,
    n_phi: usize,
    weights: Vec<f64>,
}

impl DensityPattern {
    pub fn new<R: Rng + ?Sized>(
        rng: &mut R,
        n_points: usize,
        n_phi: usize,
    ) -> Result<Self, StreamError> {
        if n_points == 0 || n_phi == 0 {
            return Err(StreamError::InvalidParameter {
                name: "density grid size",
                requirement: "at least 1 x 1",
                value: 0.0,
            });
        }
        let weights = (0..n_points * n_phi)
            .map(|_| rng.gen_range(0.0..=1.0_f64).powi(4))
            .collect();
        Ok(Self {
            n_points,
            n_phi,
            weights,
        })
    }

    pub fn n_points(&self) -> usize {
        self.n_points
    }

    pub fn n_phi(&self) -> usize {
        self.n_phi
    }

    /// Weight of cell (`index`, `col`) at orbital `phase`, with the pattern
    /// advected one full stream length every `traversal_time` periods.
    pub fn weight(&self, index: usize, col: usize, phase: f64, traversal_time: f64) -> Option<f64> {
        if index >= self.n_points || col >= self.n_phi {
            return None;
        }
        let shift = phase / traversal_time * self.n_points as f64;
        let shifted = (index as f64 - shift).floor() as i64;
        let row = shifted.rem_euclid(self.n_points as i64) as usize;
        self.weights.get(row * self.n_phi + col).copied()
    }
}
