//! Core units, constants, and shared primitives for the BinSim workspace.

pub mod numeric;
pub mod surface;

pub use numeric::{BisectionError, solve_bisection};
pub use surface::{SurfaceProperties, SurfaceSample};

/// Physical constants expressed in SI units (unless stated otherwise).
pub mod constants {
    /// Newtonian gravitational constant (m³ kg⁻¹ s⁻²).
    pub const G: f64 = 6.67259e-11;
    /// Stefan-Boltzmann constant (W m⁻² K⁻⁴).
    pub const SIGMA: f64 = 5.67051e-8;
    /// Solar mass (kg).
    pub const M_SUN: f64 = 1.9891e30;
    /// Seconds per hour.
    pub const SECONDS_PER_HOUR: f64 = 3_600.0;
    /// Seconds per day.
    pub const SECONDS_PER_DAY: f64 = 86_400.0;
    /// One erg in joules.
    pub const ERG: f64 = 1.0e-7;
}

/// Basic unit conversion helpers.
pub mod units {
    use super::constants::{ERG, M_SUN, SECONDS_PER_HOUR};

    /// Convert hours to seconds.
    #[inline]
    pub fn hours_to_seconds(v: f64) -> f64 {
        v * SECONDS_PER_HOUR
    }

    /// Convert solar masses to kilograms.
    #[inline]
    pub fn solar_masses_to_kg(v: f64) -> f64 {
        v * M_SUN
    }

    /// Convert erg/s to watts.
    #[inline]
    pub fn erg_s_to_watts(v: f64) -> f64 {
        v * ERG
    }
}

/// Minimal vector helpers to avoid ad-hoc `[f64; 3]` math everywhere.
pub mod vector {
    /// Alias for a 3D vector, usually in units of the binary separation.
    pub type Vector3 = [f64; 3];

    /// Alias for a point in the orbital plane.
    pub type Vector2 = [f64; 2];

    /// Euclidean norm of a vector.
    #[inline]
    pub fn norm(v: &Vector3) -> f64 {
        dot(v, v).sqrt()
    }

    /// Dot product of two vectors.
    #[inline]
    pub fn dot(a: &Vector3, b: &Vector3) -> f64 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    /// Vector subtraction.
    #[inline]
    pub fn sub(a: &Vector3, b: &Vector3) -> Vector3 {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    /// Scale a vector by a scalar.
    #[inline]
    pub fn scale(v: &Vector3, s: f64) -> Vector3 {
        [v[0] * s, v[1] * s, v[2] * s]
    }

    /// Unit vector along `v`. The zero vector is returned unchanged.
    #[inline]
    pub fn normalize(v: &Vector3) -> Vector3 {
        let n = norm(v);
        if n > 0.0 { scale(v, 1.0 / n) } else { *v }
    }

    /// Euclidean norm of a planar vector.
    #[inline]
    pub fn norm2(v: &Vector2) -> f64 {
        (v[0] * v[0] + v[1] * v[1]).sqrt()
    }

    /// Planar vector subtraction.
    #[inline]
    pub fn sub2(a: &Vector2, b: &Vector2) -> Vector2 {
        [a[0] - b[0], a[1] - b[1]]
    }

    /// Distance between two planar points.
    #[inline]
    pub fn distance2(a: &Vector2, b: &Vector2) -> f64 {
        norm2(&sub2(a, b))
    }
}

/// Wrap an angle into the half-open interval (-π, π].
#[inline]
pub fn wrap_angle(angle: f64) -> f64 {
    use std::f64::consts::{PI, TAU};
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI { wrapped - TAU } else { wrapped }
}
