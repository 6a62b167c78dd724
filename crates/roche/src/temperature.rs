//! Gravity darkening and companion irradiation on a lobe-filling star.

use std::f64::consts::PI;

use binsim_core::constants::SIGMA;
use binsim_core::surface::SurfaceProperties;
use binsim_core::vector::{self, Vector3};

use crate::{BinaryParameters, Granulation, RocheError, RocheGeometry, positive};

/// Polar temperatures below this are treated as having convective envelopes.
pub const CONVECTIVE_LIMIT_K: f64 = 7000.0;

const CONVECTIVE_BETA: f64 = 0.08;
const RADIATIVE_BETA: f64 = 0.25;

/// Fraction of the disc half-thickness used as the soft shadow edge.
const SHADOW_BLUR_FRACTION: f64 = 0.2;

/// von Zeipel style gravity darkening: `T = T_pole (g / g_pole)^β`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureModel {
    t_pole: f64,
    beta: f64,
    minimum_fraction: f64,
}

impl TemperatureModel {
    pub fn new(t_pole: f64) -> Result<Self, RocheError> {
        positive("polar temperature", t_pole)?;
        let beta = if t_pole < CONVECTIVE_LIMIT_K {
            CONVECTIVE_BETA
        } else {
            RADIATIVE_BETA
        };
        Ok(Self {
            t_pole,
            beta,
            minimum_fraction: 0.0,
        })
    }

    /// Floor every temperature at `fraction · T_pole`.
    pub fn with_minimum_fraction(mut self, fraction: f64) -> Result<Self, RocheError> {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(RocheError::InvalidParameter {
                name: "minimum temperature fraction",
                requirement: "in [0, 1]",
                value: fraction,
            });
        }
        self.minimum_fraction = fraction;
        Ok(self)
    }

    pub fn polar_temp(&self) -> f64 {
        self.t_pole
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn minimum_fraction(&self) -> f64 {
        self.minimum_fraction
    }

    pub fn is_convective(&self) -> bool {
        self.t_pole < CONVECTIVE_LIMIT_K
    }

    pub fn temperature(&self, gravity: f64, polar_gravity: f64) -> f64 {
        let t = self.t_pole * (gravity / polar_gravity).powf(self.beta);
        t.max(self.minimum_fraction * self.t_pole)
    }
}

/// Heating by a compact companion sitting at the far end of the line of
/// centres, partly hidden behind its accretion disc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Irradiation {
    pub luminosity_w: f64,
    /// Disc half-opening seen from the companion, as height over radius.
    /// Zero or negative disables shadowing.
    pub disc_thick: f64,
    pub albedo: f64,
    /// Beam the flux towards the poles instead of radiating isotropically.
    pub black_hole: bool,
}

impl Irradiation {
    pub fn new(
        luminosity_w: f64,
        disc_thick: f64,
        albedo: f64,
        black_hole: bool,
    ) -> Result<Self, RocheError> {
        if !(luminosity_w >= 0.0 && luminosity_w.is_finite()) {
            return Err(RocheError::InvalidParameter {
                name: "irradiating luminosity",
                requirement: "non-negative and finite",
                value: luminosity_w,
            });
        }
        if !(0.0..=1.0).contains(&albedo) {
            return Err(RocheError::InvalidParameter {
                name: "albedo",
                requirement: "in [0, 1]",
                value: albedo,
            });
        }
        if !disc_thick.is_finite() {
            return Err(RocheError::InvalidParameter {
                name: "disc thickness",
                requirement: "finite",
                value: disc_thick,
            });
        }
        Ok(Self {
            luminosity_w,
            disc_thick,
            albedo,
            black_hole,
        })
    }

    pub fn blur(&self) -> f64 {
        SHADOW_BLUR_FRACTION * self.disc_thick.abs()
    }

    /// Flux (W m⁻²) arriving at `distance_m` along unit direction
    /// `toward_source`.
    pub fn flux(&self, toward_source: &Vector3, distance_m: f64) -> f64 {
        let d2 = distance_m * distance_m;
        if self.black_hole {
            self.luminosity_w / (2.0 * PI * d2) * elevation(toward_source)
        } else {
            self.luminosity_w / (4.0 * PI * d2)
        }
    }

    /// Multiplier on the irradiation temperature from the disc shadow: zero
    /// below the rim, one well above it, and a linear ramp across the blur.
    pub fn shadow_factor(&self, toward_source: &Vector3) -> f64 {
        if self.disc_thick <= 0.0 {
            return 1.0;
        }
        let h = elevation(toward_source);
        let blur = self.blur();
        let lower = self.disc_thick - blur;
        if h <= lower {
            0.0
        } else if h >= self.disc_thick + blur {
            1.0
        } else {
            (h - lower) / (2.0 * blur)
        }
    }

    /// Irradiation temperature at a surface point with outward unit
    /// `normal`. Positions are in separation units about the irradiated star.
    pub fn temperature(&self, position: &Vector3, normal: &Vector3, separation_m: f64) -> f64 {
        let offset = vector::sub(&[1.0, 0.0, 0.0], position);
        let distance = vector::norm(&offset);
        if distance == 0.0 {
            return 0.0;
        }
        let toward_source = vector::scale(&offset, 1.0 / distance);

        let cos_incidence = vector::dot(normal, &toward_source);
        if cos_incidence <= 0.0 {
            return 0.0;
        }
        let shadow = self.shadow_factor(&toward_source);
        if shadow == 0.0 {
            return 0.0;
        }

        let flux = self.flux(&toward_source, distance * separation_m);
        (flux * cos_incidence * self.albedo / SIGMA).powf(0.25) * shadow
    }
}

/// |ẑ| / √(x̂² + ŷ²) of a direction: the tangent of its elevation above the
/// orbital plane.
fn elevation(direction: &Vector3) -> f64 {
    let rho = direction[0].hypot(direction[1]);
    if rho == 0.0 {
        f64::INFINITY
    } else {
        direction[2].abs() / rho
    }
}

/// Roche-lobe geometry with a gravity-darkened, optionally irradiated,
/// photosphere.
#[derive(Debug, Clone)]
pub struct RocheStar {
    geometry: RocheGeometry,
    temperature: TemperatureModel,
    irradiation: Option<Irradiation>,
    granulation: Option<Granulation>,
}

impl RocheStar {
    pub fn new(geometry: RocheGeometry, temperature: TemperatureModel) -> Self {
        Self {
            geometry,
            temperature,
            irradiation: None,
            granulation: None,
        }
    }

    pub fn from_parameters(params: BinaryParameters, t_pole: f64) -> Result<Self, RocheError> {
        Ok(Self::new(
            RocheGeometry::from_parameters(params)?,
            TemperatureModel::new(t_pole)?,
        ))
    }

    pub fn enable_irradiation(&mut self, irradiation: Irradiation) {
        self.irradiation = Some(irradiation);
    }

    pub fn disable_irradiation(&mut self) {
        self.irradiation = None;
    }

    pub fn set_granulation(&mut self, granulation: Granulation) {
        self.granulation = Some(granulation);
    }

    pub fn granulation(&self) -> Option<&Granulation> {
        self.granulation.as_ref()
    }

    pub fn irradiation(&self) -> Option<&Irradiation> {
        self.irradiation.as_ref()
    }

    pub fn geometry(&self) -> &RocheGeometry {
        &self.geometry
    }

    pub fn temperature_model(&self) -> &TemperatureModel {
        &self.temperature
    }

    pub fn polar_temp(&self) -> f64 {
        self.temperature.polar_temp()
    }

    /// Gravity-darkened temperature at `r` along (`l`, `mu`, `nu`).
    pub fn temp(&self, r: f64, l: f64, mu: f64, nu: f64) -> f64 {
        let g = self.geometry.grav(r, l, mu, nu);
        self.temperature.temperature(g, self.geometry.polar_grav())
    }

    /// Irradiation temperature at `r` along (`l`, `mu`, `nu`); zero when
    /// irradiation is off.
    pub fn t_irr(&self, r: f64, l: f64, mu: f64, nu: f64) -> f64 {
        let Some(irradiation) = &self.irradiation else {
            return 0.0;
        };
        let position = [r * l, r * mu, r * nu];
        let normal = self.geometry.normal(r, l, mu, nu);
        irradiation.temperature(&position, &normal, self.geometry.separation())
    }

    pub fn surface_properties(
        &self,
        theta: f64,
        phi: f64,
    ) -> Result<SurfaceProperties, RocheError> {
        let point = self.geometry.surface_point(theta, phi)?;
        let temperature_k = self
            .temperature
            .temperature(point.gravity, self.geometry.polar_grav());
        let irradiation_temperature_k = self.irradiation.map_or(0.0, |irradiation| {
            irradiation.temperature(&point.position, &point.normal, self.geometry.separation())
        });

        Ok(SurfaceProperties {
            position: point.position,
            normal: point.normal,
            temperature_k,
            irradiation_temperature_k,
        })
    }

    /// Surface properties at orbital `phase` with granulation applied to the
    /// intrinsic temperature.
    pub fn surface_properties_at_phase(
        &self,
        theta: f64,
        phi: f64,
        phase: f64,
    ) -> Result<SurfaceProperties, RocheError> {
        let properties = self.surface_properties(theta, phi)?;
        Ok(match &self.granulation {
            Some(granulation) => properties
                .with_temperature(properties.temperature_k * granulation.factor(theta, phi, phase)),
            None => properties,
        })
    }
}
