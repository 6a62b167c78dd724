//! Time-variable surface granulation: a ring of randomly phased granules per
//! latitude, each brightening and dimming sinusoidally.

use std::f64::consts::{PI, TAU};

use rand::Rng;

use crate::RocheError;

#[derive(Debug, Clone)]
pub struct Granulation {
    amplitude: f64,
    /// Bubbling period in orbital periods.
    period: f64,
    rings: Vec<Vec<f64>>,
}

impl Granulation {
    /// Build `n_lat` latitude rings (colatitude `π·i/n_lat`) holding
    /// `round(n_long·sinθ)` granules each, at least one per ring.
    pub fn new<R: Rng + ?Sized>(
        rng: &mut R,
        n_lat: usize,
        n_long: usize,
        amplitude: f64,
        period: f64,
    ) -> Result<Self, RocheError> {
        if n_lat == 0 || n_long == 0 {
            return Err(RocheError::InvalidParameter {
                name: "granulation grid size",
                requirement: "at least 1 x 1",
                value: 0.0,
            });
        }
        if !(amplitude >= 0.0 && amplitude.is_finite()) {
            return Err(RocheError::InvalidParameter {
                name: "granulation amplitude",
                requirement: "non-negative and finite",
                value: amplitude,
            });
        }
        crate::positive("granulation period", period)?;

        let rings = (0..n_lat)
            .map(|i| {
                let theta = PI * i as f64 / n_lat as f64;
                let n = ((n_long as f64 * theta.sin()).round() as usize).max(1);
                (0..n).map(|_| rng.gen_range(0.0..TAU)).collect()
            })
            .collect();

        Ok(Self {
            amplitude,
            period,
            rings,
        })
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    pub fn ring_count(&self) -> usize {
        self.rings.len()
    }

    pub fn granules_in_ring(&self, ring: usize) -> Option<usize> {
        self.rings.get(ring).map(Vec::len)
    }

    /// Multiplicative temperature factor at colatitude `theta`, azimuth `phi`
    /// and orbital `phase`, interpolated between neighbouring granules.
    pub fn factor(&self, theta: f64, phi: f64, phase: f64) -> f64 {
        if self.amplitude == 0.0 {
            return 1.0;
        }
        let n_lat = self.rings.len();
        let ring = ((theta / PI * n_lat as f64).round().max(0.0) as usize).min(n_lat - 1);
        let phases = &self.rings[ring];
        let n = phases.len();

        let base = phi.rem_euclid(TAU) / TAU * n as f64;
        let first = (base.floor() as usize).min(n - 1);
        let second = (first + 1) % n;
        let frac = base - base.floor();

        let wave = TAU * phase / self.period;
        let granule = |k: usize| 1.0 + self.amplitude * (wave + phases[k]).sin();
        (1.0 - frac) * granule(first) + frac * granule(second)
    }
}
