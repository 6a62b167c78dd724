//! Roche-lobe geometry and the temperature structure of a lobe-filling star.
//!
//! Lengths are in units of the binary separation, centred on the star whose
//! lobe is described, with +x pointing at the companion and +z along the
//! orbital angular momentum. Directions are given by the cosines
//! `l` (toward the companion), `mu` (in the orbital plane) and `nu` (polar).

pub mod geometry;
pub mod granulation;
pub mod lobe;
pub mod temperature;

pub use geometry::{LobePoint, RocheGeometry};
pub use granulation::Granulation;
pub use lobe::{RocheLobe, eggleton_radius};
pub use temperature::{CONVECTIVE_LIMIT_K, Irradiation, RocheStar, TemperatureModel};

use binsim_core::constants::{M_SUN, SECONDS_PER_DAY};
use binsim_core::numeric::{BisectionError, DEFAULT_MAX_ITER};
use thiserror::Error;

/// Errors surfaced while building or querying a Roche-lobe model.
#[derive(Debug, Error)]
pub enum RocheError {
    #[error("{name} must be {requirement} (got {value})")]
    InvalidParameter {
        name: &'static str,
        requirement: &'static str,
        value: f64,
    },
    #[error("failed to solve for {quantity}: {source}")]
    Bisection {
        quantity: &'static str,
        #[source]
        source: BisectionError,
    },
}

impl RocheError {
    pub(crate) fn solving(quantity: &'static str) -> impl FnOnce(BisectionError) -> Self {
        move |source| RocheError::Bisection { quantity, source }
    }
}

/// Physical description of one star in the binary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryParameters {
    /// Mass of this star divided by the mass of its companion.
    pub mass_ratio: f64,
    pub period_s: f64,
    /// Mass of this star.
    pub mass_kg: f64,
    /// Fraction of the Roche lobe filled by the photosphere, in (0, 1].
    pub fill: f64,
}

impl BinaryParameters {
    /// Parameters for mass ratio `q` with a one-day period, one solar mass
    /// and a full lobe.
    pub fn new(mass_ratio: f64) -> Self {
        Self {
            mass_ratio,
            period_s: SECONDS_PER_DAY,
            mass_kg: M_SUN,
            fill: 1.0,
        }
    }

    pub fn validate(&self) -> Result<(), RocheError> {
        positive("mass ratio", self.mass_ratio)?;
        positive("orbital period", self.period_s)?;
        positive("mass", self.mass_kg)?;
        if !(self.fill > 0.0 && self.fill <= 1.0) {
            return Err(RocheError::InvalidParameter {
                name: "fill factor",
                requirement: "in (0, 1]",
                value: self.fill,
            });
        }
        Ok(())
    }
}

/// Numerical controls for the lobe solvers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverSettings {
    /// Bisection bracket width at convergence (separation units).
    pub tol: f64,
    /// Finite-difference step for potential gradients (separation units).
    pub dxyz: f64,
    pub max_iter: usize,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            tol: 1e-6,
            dxyz: 1e-4,
            max_iter: DEFAULT_MAX_ITER,
        }
    }
}

impl SolverSettings {
    pub fn validate(&self) -> Result<(), RocheError> {
        positive("bisection tolerance", self.tol)?;
        positive("gradient step", self.dxyz)?;
        if self.max_iter == 0 {
            return Err(RocheError::InvalidParameter {
                name: "iteration cap",
                requirement: "at least 1",
                value: 0.0,
            });
        }
        Ok(())
    }
}

pub(crate) fn positive(name: &'static str, value: f64) -> Result<(), RocheError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(RocheError::InvalidParameter {
            name,
            requirement: "positive and finite",
            value,
        })
    }
}
