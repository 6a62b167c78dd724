//! Solved-once lobe geometry: L1, surface potential, polar radius and
//! gravity, plus per-direction radius, gravity and normal queries.

use binsim_core::numeric::solve_bisection;
use binsim_core::vector::{self, Vector3};
use tracing::debug;

use crate::{BinaryParameters, RocheError, RocheLobe};

/// Lower the polar radius by this fraction when bracketing other directions
/// so the pole itself still shows a strict sign change.
const POLAR_BRACKET_SLACK: f64 = 1e-3;

/// Gradients weaker than this fraction of the polar gravity are treated as
/// the saddle at L1, where the finite-difference direction is noise.
const L1_GRAVITY_FRACTION: f64 = 1e-3;

/// One point on the equipotential surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LobePoint {
    pub radius: f64,
    pub position: Vector3,
    /// Magnitude of the potential gradient.
    pub gravity: f64,
    /// Outward unit normal (normalised negative gradient).
    pub normal: Vector3,
}

/// Immutable Roche-lobe geometry shared by the temperature models.
#[derive(Debug, Clone)]
pub struct RocheGeometry {
    lobe: RocheLobe,
    l1: f64,
    surf_pot: f64,
    polar_rad: f64,
    polar_grav: f64,
}

impl RocheGeometry {
    pub fn from_parameters(params: BinaryParameters) -> Result<Self, RocheError> {
        Self::new(RocheLobe::new(params)?)
    }

    pub fn new(lobe: RocheLobe) -> Result<Self, RocheError> {
        let l1 = lobe.l1()?;
        let surf_pot = lobe.surf_pot_for(l1);
        let settings = *lobe.settings();

        let polar_rad = solve_bisection(
            |r| lobe.pot(r, 0.0, 1.0) - surf_pot,
            settings.dxyz,
            lobe.eggleton(),
            settings.tol,
            settings.max_iter,
        )
        .map_err(RocheError::solving("polar radius"))?;

        let polar_grav = vector::norm(&lobe.pot_gradient(&[0.0, 0.0, polar_rad]));

        debug!(
            q = lobe.mass_ratio(),
            l1,
            surf_pot,
            polar_rad,
            polar_grav,
            "solved Roche lobe geometry"
        );

        Ok(Self {
            lobe,
            l1,
            surf_pot,
            polar_rad,
            polar_grav,
        })
    }

    pub fn lobe(&self) -> &RocheLobe {
        &self.lobe
    }

    pub fn separation(&self) -> f64 {
        self.lobe.separation()
    }

    pub fn c_of_m(&self) -> f64 {
        self.lobe.c_of_m()
    }

    pub fn eggleton(&self) -> f64 {
        self.lobe.eggleton()
    }

    pub fn inverse_eggleton(&self) -> f64 {
        self.lobe.inverse_eggleton()
    }

    pub fn pot(&self, r: f64, l: f64, nu: f64) -> f64 {
        self.lobe.pot(r, l, nu)
    }

    pub fn l1(&self) -> f64 {
        self.l1
    }

    pub fn surf_pot(&self) -> f64 {
        self.surf_pot
    }

    pub fn polar_rad(&self) -> f64 {
        self.polar_rad
    }

    pub fn polar_grav(&self) -> f64 {
        self.polar_grav
    }

    /// Radius of the photosphere along direction cosines `l` and `nu`.
    pub fn rad(&self, l: f64, nu: f64) -> Result<f64, RocheError> {
        let settings = self.lobe.settings();
        solve_bisection(
            |r| self.lobe.pot(r, l, nu) - self.surf_pot,
            self.polar_rad * (1.0 - POLAR_BRACKET_SLACK),
            self.l1,
            settings.tol,
            settings.max_iter,
        )
        .map_err(RocheError::solving("surface radius"))
    }

    /// Magnitude of the potential gradient at `r` along (`l`, `mu`, `nu`).
    /// Zero at the L1 saddle.
    pub fn grav(&self, r: f64, l: f64, mu: f64, nu: f64) -> f64 {
        self.gravity_and_normal(&[r * l, r * mu, r * nu]).0
    }

    /// Outward unit normal at `r` along (`l`, `mu`, `nu`). At the L1 saddle
    /// this is the line of centres, +x.
    pub fn normal(&self, r: f64, l: f64, mu: f64, nu: f64) -> Vector3 {
        self.gravity_and_normal(&[r * l, r * mu, r * nu]).1
    }

    fn gravity_and_normal(&self, position: &Vector3) -> (f64, Vector3) {
        let gradient = self.lobe.pot_gradient(position);
        let gravity = vector::norm(&gradient);
        if gravity < L1_GRAVITY_FRACTION * self.polar_grav {
            (0.0, [1.0, 0.0, 0.0])
        } else {
            (gravity, vector::scale(&gradient, -1.0 / gravity))
        }
    }

    /// Surface point at colatitude `theta` and azimuth `phi` (from the line
    /// of centres), sharing one gradient evaluation for gravity and normal.
    pub fn surface_point(&self, theta: f64, phi: f64) -> Result<LobePoint, RocheError> {
        let (sin_theta, nu) = theta.sin_cos();
        let l = sin_theta * phi.cos();
        let mu = sin_theta * phi.sin();

        let radius = self.rad(l, nu)?;
        let position = [radius * l, radius * mu, radius * nu];
        let (gravity, normal) = self.gravity_and_normal(&position);

        Ok(LobePoint {
            radius,
            position,
            gravity,
            normal,
        })
    }
}
