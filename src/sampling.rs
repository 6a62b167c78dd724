//! Parallel evaluation of surface grids.
//!
//! Every solver is immutable after construction, so grid points are
//! independent and are farmed out to rayon without locking. Output order is
//! row-major in the grid's (u, v) indices.

use std::f64::consts::{PI, TAU};

use binsim_core::surface::SurfaceSample;
use binsim_disc::Disc;
use binsim_roche::{RocheError, RocheStar};
use rayon::prelude::*;

/// Evaluate `sample(i, j)` over an `n_u × n_v` grid in parallel, stopping at
/// the first error.
pub fn sample_grid<F, E>(n_u: usize, n_v: usize, sample: F) -> Result<Vec<SurfaceSample>, E>
where
    F: Fn(usize, usize) -> Result<SurfaceSample, E> + Sync + Send,
    E: Send,
{
    (0..n_u * n_v)
        .into_par_iter()
        .map(|index| sample(index / n_v, index % n_v))
        .collect()
}

/// Colatitude of ring `i` out of `n_lat`, starting at the pole.
pub fn colatitude(i: usize, n_lat: usize) -> f64 {
    PI * i as f64 / n_lat as f64
}

pub fn azimuth(j: usize, n_phi: usize) -> f64 {
    TAU * j as f64 / n_phi as f64
}

/// Star surface over `n_lat` colatitude rings and `n_long` azimuths, in the
/// star's own frame, at orbital `phase`.
pub fn star_surface(
    star: &RocheStar,
    n_lat: usize,
    n_long: usize,
    phase: f64,
) -> Result<Vec<SurfaceSample>, RocheError> {
    sample_grid(n_lat, n_long, |i, j| {
        let theta = colatitude(i, n_lat);
        let phi = azimuth(j, n_long);
        Ok(SurfaceSample {
            u: theta,
            v: phi,
            properties: star.surface_properties_at_phase(theta, phi, phase)?,
        })
    })
}

/// Radius of ring `i` out of `n_rad`, running from one ring spacing outside
/// `r_in` to the outer edge.
pub fn disc_radius(disc: &Disc, r_in: f64, i: usize, n_rad: usize) -> f64 {
    r_in + (disc.radius() - r_in) * (i + 1) as f64 / n_rad as f64
}

/// Both faces of the disc between `r_in` and the rim over `n_rad` rings and
/// `n_phi` azimuths, in the disc's own frame, without texture.
///
/// Rows `0..n_rad` are the upper face. Rows `n_rad..2 * n_rad` repeat the
/// same rings reflected below the orbital plane.
pub fn disc_surface(disc: &Disc, r_in: f64, n_rad: usize, n_phi: usize) -> Vec<SurfaceSample> {
    (0..2 * n_rad * n_phi)
        .into_par_iter()
        .map(|index| {
            let row = index / n_phi;
            let r = disc_radius(disc, r_in, row % n_rad, n_rad);
            let phi = azimuth(index % n_phi, n_phi);
            let upper = disc.surface_properties(r, phi);
            SurfaceSample {
                u: r,
                v: phi,
                properties: if row < n_rad { upper } else { upper.reflected() },
            }
        })
        .collect()
}
