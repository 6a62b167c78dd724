//! Per-point surface description shared by the stellar and disc models.

use serde::Serialize;

use crate::vector::Vector3;

/// Position, outward unit normal, and temperatures of one surface point.
///
/// Positions are in units of the binary separation and centred on the body
/// that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SurfaceProperties {
    pub position: Vector3,
    pub normal: Vector3,
    pub temperature_k: f64,
    pub irradiation_temperature_k: f64,
}

impl SurfaceProperties {
    /// Effective temperature with irradiation heating added in flux:
    /// `(T⁴ + T_irr⁴)^(1/4)`.
    pub fn net_temperature_k(&self) -> f64 {
        let t = self.temperature_k;
        let t_irr = self.irradiation_temperature_k;
        (t.powi(4) + t_irr.powi(4)).powf(0.25)
    }

    /// Move the sample into the centre-of-mass frame.
    ///
    /// `mirrored` turns the body's local frame half a revolution about the
    /// z axis (x and y of both position and normal flip sign) before the
    /// position is shifted by `offset_x` along the line of centres.
    pub fn placed(&self, offset_x: f64, mirrored: bool) -> Self {
        let mut placed = *self;
        if mirrored {
            placed.position[0] = -placed.position[0];
            placed.position[1] = -placed.position[1];
            placed.normal[0] = -placed.normal[0];
            placed.normal[1] = -placed.normal[1];
        }
        placed.position[0] += offset_x;
        placed
    }

    /// Mirror image below the orbital plane.
    pub fn reflected(&self) -> Self {
        let mut reflected = *self;
        reflected.position[2] = -reflected.position[2];
        reflected.normal[2] = -reflected.normal[2];
        reflected
    }

    /// Same sample with a different intrinsic temperature.
    pub fn with_temperature(&self, temperature_k: f64) -> Self {
        Self {
            temperature_k,
            ..*self
        }
    }
}

/// A surface sample tagged with the grid coordinates that produced it:
/// (colatitude, azimuth) on a star, (radius, azimuth) on a disc.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SurfaceSample {
    pub u: f64,
    pub v: f64,
    #[serde(flatten)]
    pub properties: SurfaceProperties,
}
