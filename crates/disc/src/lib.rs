//! Analytic accretion-disc surface: a flared disc `h ∝ r^β` that rolls over
//! into a toroidal rim, with a power-law temperature profile.
//!
//! Coordinates are centred on the accreting star in units of the binary
//! separation, +x toward the donor, in the same local frame as
//! [`binsim_roche::RocheLobe`].

pub mod texture;

pub use texture::{FlareMap, HotSpotHeating};

use binsim_core::numeric::{BisectionError, DEFAULT_MAX_ITER, solve_bisection};
use binsim_core::surface::SurfaceProperties;
use binsim_core::vector::{self, Vector3};
use binsim_roche::{BinaryParameters, RocheError, RocheLobe};
use thiserror::Error;
use tracing::debug;

/// Rim solve tolerance as a fraction of the disc radius.
const RIM_TOLERANCE: f64 = 1e-4;
/// Inner edge of the transition-radius bracket as a fraction of the disc radius.
const RIM_SEARCH_FLOOR: f64 = 0.1;
/// Temperature profile is clamped inside this fraction of the disc radius.
const MIN_TEMPERATURE_RADIUS: f64 = 0.01;
/// Fractional cooling across the rim, per torus radius.
const RIM_COOLING: f64 = 0.2;

#[derive(Debug, Error)]
pub enum DiscError {
    #[error("{name} must be {requirement} (got {value})")]
    InvalidParameter {
        name: &'static str,
        requirement: &'static str,
        value: f64,
    },
    #[error(transparent)]
    Roche(#[from] RocheError),
    #[error("failed to locate the disc rim: {0}")]
    Rim(#[source] BisectionError),
}

/// Inputs describing the disc around the accreting star.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscParameters {
    /// Binary seen from the accretor: `mass_ratio` is M_accretor / M_donor
    /// and `mass_kg` the accretor mass.
    pub binary: BinaryParameters,
    /// Outer radius as a fraction of the accretor's Eggleton radius.
    pub radius: f64,
    /// Height at the outer radius as a fraction of the disc radius.
    pub thickness: f64,
    /// Temperature at the outer edge (K).
    pub t_out: f64,
    /// Power-law index of the radial temperature profile.
    pub temp_grad: f64,
    /// Flaring index of the height profile.
    pub beta: f64,
}

impl DiscParameters {
    pub fn new(binary: BinaryParameters) -> Self {
        Self {
            binary,
            radius: 0.8,
            thickness: 0.05,
            t_out: 5000.0,
            temp_grad: -0.75,
            beta: 1.125,
        }
    }

    pub fn validate(&self) -> Result<(), DiscError> {
        self.binary.validate()?;
        if !(self.radius > 0.0 && self.radius <= 1.0) {
            return Err(DiscError::InvalidParameter {
                name: "disc radius",
                requirement: "in (0, 1] of the Eggleton radius",
                value: self.radius,
            });
        }
        positive("disc thickness", self.thickness)?;
        positive("outer disc temperature", self.t_out)?;
        positive("flaring index", self.beta)?;
        if !self.temp_grad.is_finite() {
            return Err(DiscError::InvalidParameter {
                name: "temperature gradient",
                requirement: "finite",
                value: self.temp_grad,
            });
        }
        Ok(())
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), DiscError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(DiscError::InvalidParameter {
            name,
            requirement: "positive and finite",
            value,
        })
    }
}

/// Disc geometry and temperature, with the rim solved once at construction.
#[derive(Debug, Clone)]
pub struct Disc {
    params: DiscParameters,
    separation_m: f64,
    c_of_m: f64,
    r_disc: f64,
    disc_thick: f64,
    r_trans: f64,
    r_torus: f64,
}

impl Disc {
    pub fn new(params: DiscParameters) -> Result<Self, DiscError> {
        params.validate()?;
        let lobe = RocheLobe::new(params.binary)?;

        let r_disc = params.radius * lobe.eggleton();
        let disc_thick = params.thickness * r_disc;
        let beta = params.beta;

        // Tangency of the flared surface with a circle centred in the plane
        // that also touches the plane at the outer radius.
        let legs = |r: f64| {
            let h = disc_thick * (r / r_disc).powf(beta);
            let hr = h / r;
            let along_plane = r_disc - r - beta * h * hr;
            let along_normal = h * (1.0 + beta * beta * hr * hr).sqrt();
            (along_plane, along_normal)
        };

        let r_trans = solve_bisection(
            |r| {
                let (along_plane, along_normal) = legs(r);
                along_plane - along_normal
            },
            RIM_SEARCH_FLOOR * r_disc,
            r_disc,
            RIM_TOLERANCE * r_disc,
            DEFAULT_MAX_ITER,
        )
        .map_err(DiscError::Rim)?;

        let (along_plane, along_normal) = legs(r_trans);
        let r_torus = 0.5 * (along_plane + along_normal);

        debug!(r_disc, disc_thick, r_trans, r_torus, "solved disc rim");

        Ok(Self {
            params,
            separation_m: lobe.separation(),
            c_of_m: lobe.c_of_m(),
            r_disc,
            disc_thick,
            r_trans,
            r_torus,
        })
    }

    pub fn parameters(&self) -> &DiscParameters {
        &self.params
    }

    pub fn separation(&self) -> f64 {
        self.separation_m
    }

    /// Distance of the centre of mass from the accretor.
    pub fn c_of_m(&self) -> f64 {
        self.c_of_m
    }

    /// Outer radius in separation units.
    pub fn radius(&self) -> f64 {
        self.r_disc
    }

    /// Height at the outer radius in separation units.
    pub fn thickness(&self) -> f64 {
        self.disc_thick
    }

    pub fn r_trans(&self) -> f64 {
        self.r_trans
    }

    pub fn r_torus(&self) -> f64 {
        self.r_torus
    }

    /// Radius of the rim circle's centre in the disc plane.
    pub fn torus_centre(&self) -> f64 {
        self.r_disc - self.r_torus
    }

    /// Keplerian period at radius `r` (separation units) in orbital periods.
    pub fn keplerian_period(&self, r: f64) -> f64 {
        (r.powi(3) * (1.0 + 1.0 / self.params.binary.mass_ratio)).sqrt()
    }

    fn flared_height(&self, r: f64) -> f64 {
        self.disc_thick * (r / self.r_disc).powf(self.params.beta)
    }

    /// Surface height above the disc plane.
    pub fn height(&self, r: f64) -> f64 {
        if r <= self.r_trans {
            return self.flared_height(r);
        }
        let dr = r - self.torus_centre();
        if dr.abs() >= self.r_torus {
            0.0
        } else {
            (self.r_torus * self.r_torus - dr * dr).sqrt()
        }
    }

    /// Radial derivative of [`Disc::height`]. Zero outside the disc and
    /// negative infinity exactly at the outer edge.
    pub fn slope(&self, r: f64) -> f64 {
        if r <= self.r_trans {
            let beta = self.params.beta;
            return beta * self.disc_thick / self.r_disc * (r / self.r_disc).powf(beta - 1.0);
        }
        if r > self.r_disc {
            return 0.0;
        }
        let h = self.height(r);
        if h == 0.0 {
            f64::NEG_INFINITY
        } else {
            -(r - self.torus_centre()) / h
        }
    }

    /// Outward unit normal of the upper surface at (`r`, `phi`).
    pub fn normal(&self, r: f64, phi: f64) -> Vector3 {
        let (sin_phi, cos_phi) = phi.sin_cos();
        let (radial, vertical) = if r <= self.r_trans {
            (-self.slope(r), 1.0)
        } else {
            (r - self.torus_centre(), self.height(r))
        };
        vector::normalize(&[radial * cos_phi, radial * sin_phi, vertical])
    }

    pub fn temperature(&self, r: f64) -> f64 {
        let x = (r / self.r_disc).max(MIN_TEMPERATURE_RADIUS);
        let t = self.params.t_out * x.powf(self.params.temp_grad);
        if r > self.r_trans {
            t * (1.0 - RIM_COOLING * (r - self.r_trans) / self.r_torus)
        } else {
            t
        }
    }

    /// Upper-surface sample at radius `r` (separation units) and azimuth
    /// `phi` (from the line of centres). The disc is not irradiated.
    pub fn surface_properties(&self, r: f64, phi: f64) -> SurfaceProperties {
        let (sin_phi, cos_phi) = phi.sin_cos();
        SurfaceProperties {
            position: [r * cos_phi, r * sin_phi, self.height(r)],
            normal: self.normal(r, phi),
            temperature_k: self.temperature(r),
            irradiation_temperature_k: 0.0,
        }
    }
}
