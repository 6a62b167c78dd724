//! Assembly of a complete binary from configuration.

use binsim_config::{BinaryConfig, ConfigError, DiscConfig, StarConfig, StreamConfig};
use binsim_core::surface::SurfaceSample;
use binsim_core::vector::Vector2;
use binsim_disc::{Disc, DiscError, DiscParameters, FlareMap, HotSpotHeating};
use binsim_roche::{
    BinaryParameters, Granulation, Irradiation, RocheError, RocheGeometry, RocheStar,
    TemperatureModel,
};
use binsim_stream::{DensityPattern, Stream, StreamError, StreamTrajectory};
use rand::SeedableRng;
use rand_chacha::ChaChaRng;
use thiserror::Error;
use tracing::debug;

use crate::sampling;

/// Seed used when the configuration does not pin one.
pub const DEFAULT_SEED: u64 = 1;

#[derive(Debug, Error)]
pub enum SystemError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Roche star: {0}")]
    Roche(#[from] RocheError),
    #[error("accretion disc: {0}")]
    Disc(#[from] DiscError),
    #[error("gas stream: {0}")]
    Stream(#[from] StreamError),
}

/// Grid density shared by every component: `n_steps` sets a star grid of
/// `(2n + 1) × 4n` and `2n × 4n` on each face of the disc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub n_steps: usize,
}

impl Default for Resolution {
    fn default() -> Self {
        Self { n_steps: 20 }
    }
}

impl Resolution {
    pub fn n_lat(&self) -> usize {
        2 * self.n_steps + 1
    }

    pub fn n_long(&self) -> usize {
        4 * self.n_steps
    }

    pub fn n_rad(&self) -> usize {
        2 * self.n_steps
    }

    pub fn n_phi(&self) -> usize {
        4 * self.n_steps
    }
}

/// Disc with its texture.
#[derive(Debug, Clone)]
pub struct DiscModel {
    pub disc: Disc,
    /// Inner edge in separation units.
    pub inner_radius: f64,
    pub flares: FlareMap,
    pub hot_spot: HotSpotHeating,
}

/// Stream with its recorded path and texture.
#[derive(Debug, Clone)]
pub struct StreamModel {
    pub stream: Stream,
    pub trajectory: StreamTrajectory,
    /// Cross-section radius in separation units.
    pub radius: f64,
    pub density: DensityPattern,
}

/// Donor, optional primary star, disc and stream of one binary, all in the
/// centre-of-mass frame when sampled through this type.
#[derive(Debug, Clone)]
pub struct BinarySystem {
    config: BinaryConfig,
    resolution: Resolution,
    donor: RocheStar,
    primary: Option<RocheStar>,
    stream: StreamModel,
    disc: Option<DiscModel>,
}

impl BinarySystem {
    pub fn from_config(config: BinaryConfig) -> Result<Self, SystemError> {
        Self::with_resolution(config, Resolution::default())
    }

    pub fn with_resolution(
        config: BinaryConfig,
        resolution: Resolution,
    ) -> Result<Self, SystemError> {
        config.validate()?;
        let mut rng = ChaChaRng::seed_from_u64(config.seed.unwrap_or(DEFAULT_SEED));

        let donor = build_star(
            &config.donor,
            BinaryParameters {
                mass_ratio: config.q,
                period_s: config.period_s(),
                mass_kg: config.donor_mass_kg(),
                fill: config.donor.fill,
            },
            resolution,
            &mut rng,
        )?;
        let stream = build_stream(&config, resolution, &mut rng)?;
        let disc = config
            .disc
            .as_ref()
            .map(|disc| build_disc(&config, disc, resolution, &stream.trajectory, &mut rng))
            .transpose()?;
        let primary = config
            .primary
            .as_ref()
            .map(|primary| {
                let params = BinaryParameters {
                    mass_ratio: 1.0 / config.q,
                    period_s: config.period_s(),
                    mass_kg: config.primary_mass_kg(),
                    fill: primary.fill,
                };
                build_star(primary, params, resolution, &mut rng)
            })
            .transpose()?;

        debug!(
            q = config.q,
            period_s = config.period_s(),
            stream_points = stream.trajectory.points.len(),
            has_disc = disc.is_some(),
            has_primary = primary.is_some(),
            "assembled binary system"
        );

        Ok(Self {
            config,
            resolution,
            donor,
            primary,
            stream,
            disc,
        })
    }

    pub fn config(&self) -> &BinaryConfig {
        &self.config
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn donor(&self) -> &RocheStar {
        &self.donor
    }

    pub fn primary(&self) -> Option<&RocheStar> {
        self.primary.as_ref()
    }

    pub fn stream(&self) -> &StreamModel {
        &self.stream
    }

    pub fn disc(&self) -> Option<&DiscModel> {
        self.disc.as_ref()
    }

    /// Separation in metres.
    pub fn separation(&self) -> f64 {
        self.donor.geometry().separation()
    }

    /// Donor photosphere at orbital `phase`, in the centre-of-mass frame.
    pub fn donor_surface(&self, phase: f64) -> Result<Vec<SurfaceSample>, SystemError> {
        let offset = -self.donor.geometry().c_of_m();
        self.star_surface(&self.donor, offset, false, phase)
    }

    /// Primary photosphere at orbital `phase`, turned to face the donor and
    /// placed on +x. Empty when the binary has no primary star.
    pub fn primary_surface(&self, phase: f64) -> Result<Vec<SurfaceSample>, SystemError> {
        let Some(primary) = &self.primary else {
            return Ok(Vec::new());
        };
        self.star_surface(primary, primary.geometry().c_of_m(), true, phase)
    }

    fn star_surface(
        &self,
        star: &RocheStar,
        offset: f64,
        mirrored: bool,
        phase: f64,
    ) -> Result<Vec<SurfaceSample>, SystemError> {
        let samples = sampling::star_surface(
            star,
            self.resolution.n_lat(),
            self.resolution.n_long(),
            phase,
        )?;
        Ok(samples
            .into_iter()
            .map(|sample| SurfaceSample {
                properties: sample.properties.placed(offset, mirrored),
                ..sample
            })
            .collect())
    }

    /// Textured disc surface at orbital `phase`, in the centre-of-mass
    /// frame: the upper face followed by the lower one, each with its own
    /// flares. Empty when the binary has no disc.
    pub fn disc_surface(&self, phase: f64) -> Vec<SurfaceSample> {
        let Some(model) = &self.disc else {
            return Vec::new();
        };
        let n_rad = self.resolution.n_rad();
        let n_phi = self.resolution.n_phi();
        let offset = model.disc.c_of_m();

        sampling::disc_surface(&model.disc, model.inner_radius, n_rad, n_phi)
            .into_iter()
            .enumerate()
            .map(|(index, sample)| {
                let (r, phi) = (sample.u, sample.v);
                let flare = model
                    .flares
                    .factor(
                        index / n_phi,
                        index % n_phi,
                        phase,
                        model.disc.keplerian_period(r),
                    )
                    .unwrap_or(1.0);
                let temperature =
                    sample.properties.temperature_k * flare + model.hot_spot.heating(r, phi);
                SurfaceSample {
                    properties: sample
                        .properties
                        .with_temperature(temperature)
                        .placed(offset, true),
                    ..sample
                }
            })
            .collect()
    }
}

fn build_star(
    settings: &StarConfig,
    params: BinaryParameters,
    resolution: Resolution,
    rng: &mut ChaChaRng,
) -> Result<RocheStar, RocheError> {
    let geometry = RocheGeometry::from_parameters(params)?;
    let temperature =
        TemperatureModel::new(settings.t_pole)?.with_minimum_fraction(settings.t_min)?;

    let mut star = RocheStar::new(geometry, temperature);
    if let Some(irr) = &settings.irradiation {
        star.enable_irradiation(Irradiation::new(
            irr.luminosity_w(),
            irr.disc_thick,
            irr.albedo,
            irr.black_hole,
        )?);
    }
    if settings.granulation > 0.0 {
        star.set_granulation(Granulation::new(
            rng,
            resolution.n_lat(),
            resolution.n_long(),
            settings.granulation,
            settings.granulation_period,
        )?);
    }
    Ok(star)
}

fn build_stream(
    config: &BinaryConfig,
    resolution: Resolution,
    rng: &mut ChaChaRng,
) -> Result<StreamModel, StreamError> {
    let defaults = StreamConfig::default();
    let settings = config.stream.as_ref().unwrap_or(&defaults);

    let stream = Stream::new(config.q, config.primary_mass_kg(), config.period_s())?;
    let trajectory = stream.trajectory(settings.dl, config.stream_disc_radius())?;
    let radius = stream.stream_radius(config.donor.t_pole, settings.max_thick);
    let density = DensityPattern::new(rng, trajectory.points.len(), resolution.n_phi())?;

    Ok(StreamModel {
        stream,
        trajectory,
        radius,
        density,
    })
}

fn build_disc(
    config: &BinaryConfig,
    settings: &DiscConfig,
    resolution: Resolution,
    trajectory: &StreamTrajectory,
    rng: &mut ChaChaRng,
) -> Result<DiscModel, DiscError> {
    let disc = Disc::new(DiscParameters {
        binary: BinaryParameters {
            mass_ratio: 1.0 / config.q,
            period_s: config.period_s(),
            mass_kg: config.primary_mass_kg(),
            fill: 1.0,
        },
        radius: settings.radius,
        thickness: settings.thickness,
        t_out: settings.t_out,
        temp_grad: settings.temp_grad,
        beta: settings.beta,
    })?;

    let flares = FlareMap::new(
        rng,
        2 * resolution.n_rad(),
        resolution.n_phi(),
        settings.n_flare,
        settings.flare_length,
    )?;

    let impact = trajectory.impact_point().unwrap_or([0.0, 0.0]);
    let hot_spot = HotSpotHeating::new(
        disc_azimuth(impact, disc.c_of_m()),
        disc.radius(),
        settings.hot_spot_temp,
    );

    let inner_radius = disc.radius() * settings.inner_radius / settings.radius;

    Ok(DiscModel {
        disc,
        inner_radius,
        flares,
        hot_spot,
    })
}

/// Azimuth, in the accretor's mirrored local frame, of a point given in the
/// centre-of-mass frame with the accretor at `+c_of_m`.
pub fn disc_azimuth(point: Vector2, c_of_m: f64) -> f64 {
    (-point[1]).atan2(c_of_m - point[0])
}
