//! Time-dependent surface texture on the disc: rotating flares and the
//! heated trail downstream of the stream impact.

use binsim_core::wrap_angle;
use rand::Rng;

use crate::DiscError;

/// Peak fractional brightening at the middle of a flare.
const FLARE_PEAK: f64 = 0.2;
/// Radial fall-off of the hot-spot trail (per separation unit squared).
const HOT_SPOT_RADIAL_DECAY: f64 = 500.0;
const HOT_SPOT_DOWNSTREAM_DECAY: f64 = 1.0;
const HOT_SPOT_UPSTREAM_DECAY: f64 = 50.0;

/// Multiplicative flare pattern on an `n_rad × n_phi` grid that co-rotates
/// with the local Keplerian flow.
#[derive(Debug, Clone)]
pub struct FlareMap {
    n_rad: usize,
    n_phi: usize,
    cells: Vec<f64>,
}

impl FlareMap {
    /// Drop `n_flare` flares at random cells, each smeared over
    /// `flare_length` cells of azimuth with a triangular profile.
    pub fn new<R: Rng + ?Sized>(
        rng: &mut R,
        n_rad: usize,
        n_phi: usize,
        n_flare: usize,
        flare_length: usize,
    ) -> Result<Self, DiscError> {
        if n_rad == 0 || n_phi == 0 {
            return Err(DiscError::InvalidParameter {
                name: "flare grid size",
                requirement: "at least 1 x 1",
                value: 0.0,
            });
        }
        if flare_length == 0 {
            return Err(DiscError::InvalidParameter {
                name: "flare length",
                requirement: "at least 1 cell",
                value: 0.0,
            });
        }

        let mut cells = vec![1.0; n_rad * n_phi];
        let length = flare_length as f64;
        for _ in 0..n_flare {
            let row = rng.gen_range(0..n_rad);
            let mut col = rng.gen_range(0..n_phi);
            for step in 0..flare_length {
                let profile = 1.0 - 2.0 * (step as f64 - length / 2.0).abs() / length;
                cells[row * n_phi + col] *= 1.0 + FLARE_PEAK * profile;
                col = (col + 1) % n_phi;
            }
        }

        Ok(Self {
            n_rad,
            n_phi,
            cells,
        })
    }

    pub fn n_rad(&self) -> usize {
        self.n_rad
    }

    pub fn n_phi(&self) -> usize {
        self.n_phi
    }

    /// Brightening of cell (`row`, `col`) at orbital `phase`, after the
    /// pattern has turned through `phase / keplerian_period` revolutions.
    pub fn factor(&self, row: usize, col: usize, phase: f64, keplerian_period: f64) -> Option<f64> {
        if row >= self.n_rad || col >= self.n_phi {
            return None;
        }
        let n_phi = self.n_phi as f64;
        let shift = (phase / keplerian_period * n_phi).round().rem_euclid(n_phi);
        let rotated = (col as f64 - shift).rem_euclid(n_phi) as usize % self.n_phi;
        self.cells.get(row * self.n_phi + rotated).copied()
    }
}

/// Extra heating spread from the stream impact point along the disc edge,
/// trailing far downstream and cut off sharply upstream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HotSpotHeating {
    /// Azimuth of the impact point in the disc frame.
    pub impact_azimuth: f64,
    /// Disc outer radius in separation units.
    pub disc_radius: f64,
    pub t_hot: f64,
}

impl HotSpotHeating {
    pub fn new(impact_azimuth: f64, disc_radius: f64, t_hot: f64) -> Self {
        Self {
            impact_azimuth,
            disc_radius,
            t_hot,
        }
    }

    /// Temperature added at (`r`, `phi`).
    pub fn heating(&self, r: f64, phi: f64) -> f64 {
        if self.t_hot == 0.0 {
            return 0.0;
        }
        let dr = r - self.disc_radius;
        let f_r = (-HOT_SPOT_RADIAL_DECAY * dr * dr).exp();
        let dphi = wrap_angle(phi - self.impact_azimuth);
        let decay = if dphi > 0.0 {
            HOT_SPOT_DOWNSTREAM_DECAY
        } else {
            HOT_SPOT_UPSTREAM_DECAY
        };
        self.t_hot * f_r * (-decay * dphi * dphi).exp()
    }
}
