//! Ballistic test-particle stream from the inner Lagrangian point onto the
//! accretor.
//!
//! The integration runs in the inertial frame with both stars on circular
//! orbits; recorded points are rotated into the corotating frame, whose
//! origin is the centre of mass with the accretor on +x at `a₁/a` and the
//! donor on −x at `−a₂/a`, all in units of the separation `a`.

pub mod structure;

pub use structure::DensityPattern;

use std::f64::consts::PI;

use binsim_core::constants::G;
use binsim_core::vector::{self, Vector2};
use binsim_roche::{BinaryParameters, RocheError, RocheLobe};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Hard cap on integration steps.
pub const MAX_STEPS: usize = 200_000;
/// Time step as a fraction of the orbital period.
pub const STEP_FRACTION: f64 = 2e-6;
/// Starting offset from L1 toward the accretor, in separation units.
const L1_OFFSET: f64 = 1e-3;

#[derive(Debug, Error)]
pub enum StreamError {
    #[error("{name} must be {requirement} (got {value})")]
    InvalidParameter {
        name: &'static str,
        requirement: &'static str,
        value: f64,
    },
    #[error(transparent)]
    Roche(#[from] RocheError),
    #[error("trajectory has {points} recorded point(s); at least two are needed for a speed")]
    Degenerate { points: usize },
}

/// Why the integration stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The particle came within the requested radius of the accretor.
    ReachedRadius,
    /// [`MAX_STEPS`] were taken first.
    IterationCap,
}

/// Recorded stream path in the corotating frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamTrajectory {
    pub points: Vec<Vector2>,
    /// Elapsed time of each point in seconds, starting at zero for the seed.
    pub times_s: Vec<f64>,
    /// Speed at the middle of the path in separation units per orbital
    /// period.
    pub speed: f64,
    pub steps: usize,
    pub termination: Termination,
}

impl StreamTrajectory {
    /// Where the stream meets the disc: its last recorded point.
    pub fn impact_point(&self) -> Option<Vector2> {
        self.points.last().copied()
    }

    /// Cumulative path length at each point, zero at the seed.
    pub fn arc_lengths(&self) -> Vec<f64> {
        let mut total = 0.0;
        let mut lengths = Vec::with_capacity(self.points.len());
        let mut previous = self.points.first();
        for point in &self.points {
            if let Some(prev) = previous {
                total += vector::distance2(prev, point);
            }
            lengths.push(total);
            previous = Some(point);
        }
        lengths
    }

    /// Time to cross from the first to the last point at [`Self::speed`],
    /// in orbital periods.
    pub fn traversal_time(&self) -> f64 {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => vector::distance2(first, last) / self.speed,
            _ => 0.0,
        }
    }
}

/// Constants of a binary for stream integration.
#[derive(Debug, Clone)]
pub struct Stream {
    mass_ratio: f64,
    period_s: f64,
    omega: f64,
    dt: f64,
    gm1: f64,
    gm2: f64,
    a: f64,
    a1: f64,
    a2: f64,
    al1: f64,
    r_egg: f64,
}

impl Stream {
    /// `mass_ratio` is M_donor / M_accretor and `primary_mass_kg` the
    /// accretor mass.
    pub fn new(mass_ratio: f64, primary_mass_kg: f64, period_s: f64) -> Result<Self, StreamError> {
        positive("mass ratio", mass_ratio)?;
        let lobe = RocheLobe::new(BinaryParameters {
            mass_ratio: 1.0 / mass_ratio,
            period_s,
            mass_kg: primary_mass_kg,
            fill: 1.0,
        })?;

        let a = lobe.separation();
        let a1 = a * lobe.c_of_m();
        let al1 = a * lobe.l1()?;
        let r_egg = a * lobe.eggleton();

        debug!(
            q = mass_ratio,
            separation_m = a,
            a1,
            al1,
            r_egg,
            "derived stream constants"
        );

        Ok(Self {
            mass_ratio,
            period_s,
            omega: 2.0 * PI / period_s,
            dt: STEP_FRACTION * period_s,
            gm1: G * primary_mass_kg,
            gm2: G * primary_mass_kg * mass_ratio,
            a,
            a1,
            a2: a - a1,
            al1,
            r_egg,
        })
    }

    pub fn mass_ratio(&self) -> f64 {
        self.mass_ratio
    }

    pub fn period(&self) -> f64 {
        self.period_s
    }

    pub fn time_step(&self) -> f64 {
        self.dt
    }

    /// Separation in metres.
    pub fn separation(&self) -> f64 {
        self.a
    }

    /// Distance of the accretor from the centre of mass, in metres.
    pub fn primary_offset(&self) -> f64 {
        self.a1
    }

    /// Distance of the donor from the centre of mass, in metres.
    pub fn secondary_offset(&self) -> f64 {
        self.a2
    }

    /// Distance of L1 from the accretor, in metres.
    pub fn l1_distance(&self) -> f64 {
        self.al1
    }

    /// Eggleton radius of the accretor's lobe, in metres.
    pub fn eggleton_radius(&self) -> f64 {
        self.r_egg
    }

    /// Corotating position of the starting point.
    pub fn seed_point(&self) -> Vector2 {
        [(self.a1 - self.al1) / self.a + L1_OFFSET, 0.0]
    }

    /// Integrate from just inside L1 until the particle is within
    /// `r_max` Eggleton radii of the accretor, recording a point each time
    /// it has moved at least `dl` separations since the last one.
    pub fn trajectory(&self, dl: f64, r_max: f64) -> Result<StreamTrajectory, StreamError> {
        positive("point spacing", dl)?;
        positive("stopping radius", r_max)?;

        let a = self.a;
        let dt = self.dt;
        let limit = r_max * self.r_egg;

        // Inertial frame aligned with the corotating one at t = 0, rotated so
        // the line of centres lies along y.
        let mut pos: Vector2 = [0.0, self.al1 - self.a1 - L1_OFFSET * a];
        let mut vel: Vector2 = [-self.omega * pos[1], 0.0];

        let seed = self.seed_point();
        let mut points = vec![seed];
        let mut times_s = vec![0.0];
        let mut last = seed;

        let mut steps = 0;
        let termination = loop {
            let (sine, cosine) = (self.omega * steps as f64 * dt).sin_cos();
            let d1 = [pos[0] - self.a1 * sine, pos[1] + self.a1 * cosine];
            let d2 = [pos[0] + self.a2 * sine, pos[1] - self.a2 * cosine];
            let r1 = vector::norm2(&d1);
            let r2 = vector::norm2(&d2);
            let k1 = self.gm1 / (r1 * r1 * r1);
            let k2 = self.gm2 / (r2 * r2 * r2);

            vel[0] -= dt * (k1 * d1[0] + k2 * d2[0]);
            vel[1] -= dt * (k1 * d1[1] + k2 * d2[1]);
            pos[0] += vel[0] * dt;
            pos[1] += vel[1] * dt;
            steps += 1;

            let t = steps as f64 * dt;
            let (sine, cosine) = (self.omega * t).sin_cos();
            let point = [
                (pos[0] * sine - pos[1] * cosine) / a,
                (pos[0] * cosine + pos[1] * sine) / a,
            ];
            if vector::distance2(&point, &last) >= dl {
                points.push(point);
                times_s.push(t);
                last = point;
            }

            if r1 <= limit {
                break Termination::ReachedRadius;
            }
            if steps >= MAX_STEPS {
                warn!(
                    q = self.mass_ratio,
                    steps,
                    distance = r1 / a,
                    "stream integration hit the step cap before reaching the disc"
                );
                break Termination::IterationCap;
            }
        };

        if points.len() < 2 {
            return Err(StreamError::Degenerate {
                points: points.len(),
            });
        }

        let mid = (points.len() / 2).min(points.len() - 2);
        let delta_pos = vector::distance2(&points[mid + 1], &points[mid]);
        let delta_t = (times_s[mid + 1] - times_s[mid]) / self.period_s;
        let speed = delta_pos / delta_t;

        debug!(
            steps,
            points = points.len(),
            ?termination,
            speed,
            "stream trajectory finished"
        );

        Ok(StreamTrajectory {
            points,
            times_s,
            speed,
            steps,
            termination,
        })
    }

    /// Stream cross-section radius in separation units: half the distance
    /// travelled in one orbit at the L1 sound speed of a `t_pole` donor,
    /// capped at `max_thick`.
    pub fn stream_radius(&self, t_pole: f64, max_thick: f64) -> f64 {
        let sound_speed = 1e4 * (0.75 * t_pole / 1e4).sqrt();
        let radius = 0.5 * sound_speed * self.period_s / (2.0 * PI * self.a);
        radius.min(max_thick)
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), StreamError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(StreamError::InvalidParameter {
            name,
            requirement: "positive and finite",
            value,
        })
    }
}
