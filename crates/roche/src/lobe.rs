//! Closed-form lobe quantities and the Kopal potential.

use std::f64::consts::PI;

use binsim_core::constants::G;
use binsim_core::numeric::solve_bisection;
use binsim_core::vector::Vector3;

use crate::{BinaryParameters, RocheError, SolverSettings};

/// Eggleton (1983) volume-equivalent lobe radius, in units of the
/// separation, for a star whose mass is `q` times its companion's.
pub fn eggleton_radius(q: f64) -> f64 {
    let q13 = q.cbrt();
    let q23 = q13 * q13;
    0.49 * q23 / (0.6 * q23 + (1.0 + q13).ln())
}

/// Equipotential geometry of one star in a circular binary.
///
/// The closed-form scalars are evaluated once in [`RocheLobe::new`]; the
/// bisection-derived ones live in [`crate::RocheGeometry`].
#[derive(Debug, Clone)]
pub struct RocheLobe {
    params: BinaryParameters,
    settings: SolverSettings,
    q_inv: f64,
    separation_m: f64,
    c_of_m: f64,
    eggleton: f64,
    inverse_eggleton: f64,
}

impl RocheLobe {
    pub fn new(params: BinaryParameters) -> Result<Self, RocheError> {
        Self::with_settings(params, SolverSettings::default())
    }

    pub fn with_settings(
        params: BinaryParameters,
        settings: SolverSettings,
    ) -> Result<Self, RocheError> {
        params.validate()?;
        settings.validate()?;

        let q = params.mass_ratio;
        let q_inv = 1.0 / q;
        let total_mass = params.mass_kg * (1.0 + q_inv);
        let separation_m =
            (G * total_mass * params.period_s * params.period_s / (4.0 * PI * PI)).cbrt();

        Ok(Self {
            params,
            settings,
            q_inv,
            separation_m,
            c_of_m: 1.0 / (1.0 + q),
            eggleton: eggleton_radius(q),
            inverse_eggleton: eggleton_radius(q_inv),
        })
    }

    pub fn parameters(&self) -> &BinaryParameters {
        &self.params
    }

    pub fn settings(&self) -> &SolverSettings {
        &self.settings
    }

    pub fn mass_ratio(&self) -> f64 {
        self.params.mass_ratio
    }

    pub fn fill(&self) -> f64 {
        self.params.fill
    }

    /// Binary separation in metres (Kepler's third law).
    pub fn separation(&self) -> f64 {
        self.separation_m
    }

    /// Distance of the centre of mass from this star.
    pub fn c_of_m(&self) -> f64 {
        self.c_of_m
    }

    /// Effective radius of this star's lobe.
    pub fn eggleton(&self) -> f64 {
        self.eggleton
    }

    /// Effective radius of the companion's lobe.
    pub fn inverse_eggleton(&self) -> f64 {
        self.inverse_eggleton
    }

    /// Kopal's normalised potential Ω at radius `r` along direction
    /// cosines `l` (toward the companion) and `nu` (polar).
    pub fn pot(&self, r: f64, l: f64, nu: f64) -> f64 {
        let term1 = 1.0 / r;
        let term2 = self.q_inv * (1.0 / (1.0 - 2.0 * l * r + r * r).sqrt() - l * r);
        let term3 = 0.5 * (self.q_inv + 1.0) * r * r * (1.0 - nu * nu);
        term1 + term2 + term3
    }

    pub fn pot_cartesian(&self, x: f64, y: f64, z: f64) -> f64 {
        let r = (x * x + y * y + z * z).sqrt();
        self.pot(r, x / r, z / r)
    }

    /// Central-difference gradient of Ω at a Cartesian point.
    pub fn pot_gradient(&self, point: &Vector3) -> Vector3 {
        let d = self.settings.dxyz;
        let [x, y, z] = *point;
        [
            (self.pot_cartesian(x + d, y, z) - self.pot_cartesian(x - d, y, z)) / (2.0 * d),
            (self.pot_cartesian(x, y + d, z) - self.pot_cartesian(x, y - d, z)) / (2.0 * d),
            (self.pot_cartesian(x, y, z + d) - self.pot_cartesian(x, y, z - d)) / (2.0 * d),
        ]
    }

    /// dΩ/dx on the line of centres, `0 < x < 1`.
    pub fn pot_deriv_loc(&self, x: f64) -> f64 {
        -1.0 / (x * x) + self.q_inv / ((1.0 - x) * (1.0 - x)) - self.q_inv + (1.0 + self.q_inv) * x
    }

    /// Distance of the inner Lagrangian point from this star.
    ///
    /// Solved on every call; [`crate::RocheGeometry`] keeps the result.
    pub fn l1(&self) -> Result<f64, RocheError> {
        solve_bisection(
            |x| self.pot_deriv_loc(x),
            self.eggleton,
            1.0 - self.inverse_eggleton,
            self.settings.tol,
            self.settings.max_iter,
        )
        .map_err(RocheError::solving("L1 point"))
    }

    /// Potential of the photosphere for a given L1 distance.
    ///
    /// A fill factor below one raises the potential, which shrinks the star.
    pub fn surf_pot_for(&self, l1: f64) -> f64 {
        self.pot(l1, 1.0, 0.0) / self.params.fill
    }
}
