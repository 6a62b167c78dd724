//! Configuration models and loaders for BinSim binaries.
//!
//! Files use astronomer-friendly units (hours, solar masses, erg/s); the
//! accessor methods convert to SI.

use std::fs::File;
use std::path::{Path, PathBuf};

use binsim_core::units::{erg_s_to_watts, hours_to_seconds, solar_masses_to_kg};
use serde::Deserialize;
use thiserror::Error;

/// Complete description of one semi-detached binary.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BinaryConfig {
    /// M_donor / M_accretor.
    pub q: f64,
    pub period_hours: f64,
    /// Accretor mass.
    pub primary_mass_msun: f64,
    #[serde(default)]
    pub seed: Option<u64>,
    pub donor: StarConfig,
    /// Lobe-filling accretor, drawn as a second Roche star when present.
    #[serde(default)]
    pub primary: Option<StarConfig>,
    #[serde(default)]
    pub disc: Option<DiscConfig>,
    #[serde(default)]
    pub stream: Option<StreamConfig>,
}

/// One Roche-lobe star. Its `irradiation` section describes the companion
/// that heats it: the accretor for the donor, the donor for the primary.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct StarConfig {
    pub t_pole: f64,
    #[serde(default = "default_fill")]
    pub fill: f64,
    /// Temperature floor as a fraction of `t_pole`.
    #[serde(default)]
    pub t_min: f64,
    #[serde(default)]
    pub granulation: f64,
    /// Granule bubbling period in orbital periods.
    #[serde(default = "default_granulation_period")]
    pub granulation_period: f64,
    #[serde(default)]
    pub irradiation: Option<IrradiationConfig>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct IrradiationConfig {
    pub luminosity_erg_s: f64,
    #[serde(default)]
    pub disc_thick: f64,
    #[serde(default = "default_albedo")]
    pub albedo: f64,
    #[serde(default)]
    pub black_hole: bool,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DiscConfig {
    /// Outer radius as a fraction of the accretor's Eggleton radius.
    #[serde(default = "default_disc_radius")]
    pub radius: f64,
    /// Inner edge in the same units as `radius`.
    #[serde(default)]
    pub inner_radius: f64,
    /// Rim height as a fraction of the disc radius.
    #[serde(default = "default_disc_thickness")]
    pub thickness: f64,
    #[serde(default = "default_t_out")]
    pub t_out: f64,
    #[serde(default = "default_temp_grad")]
    pub temp_grad: f64,
    #[serde(default = "default_beta")]
    pub beta: f64,
    #[serde(default)]
    pub hot_spot_temp: f64,
    #[serde(default = "default_n_flare")]
    pub n_flare: usize,
    #[serde(default = "default_flare_length")]
    pub flare_length: usize,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct StreamConfig {
    /// Minimum spacing of recorded points in separations.
    #[serde(default = "default_dl")]
    pub dl: f64,
    /// Radius where the stream stops, as a fraction of the accretor's
    /// Eggleton radius. Falls back to the disc radius.
    #[serde(default)]
    pub disc_radius: Option<f64>,
    #[serde(default = "default_max_thick")]
    pub max_thick: f64,
}

impl Default for DiscConfig {
    fn default() -> Self {
        Self {
            radius: default_disc_radius(),
            inner_radius: 0.0,
            thickness: default_disc_thickness(),
            t_out: default_t_out(),
            temp_grad: default_temp_grad(),
            beta: default_beta(),
            hot_spot_temp: 0.0,
            n_flare: default_n_flare(),
            flare_length: default_flare_length(),
        }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            dl: default_dl(),
            disc_radius: None,
            max_thick: default_max_thick(),
        }
    }
}

fn default_fill() -> f64 {
    1.0
}

fn default_granulation_period() -> f64 {
    1.0e6
}

fn default_albedo() -> f64 {
    0.5
}

fn default_disc_radius() -> f64 {
    0.8
}

fn default_disc_thickness() -> f64 {
    0.05
}

fn default_t_out() -> f64 {
    5000.0
}

fn default_temp_grad() -> f64 {
    -0.75
}

fn default_beta() -> f64 {
    1.125
}

fn default_n_flare() -> usize {
    1500
}

fn default_flare_length() -> usize {
    25
}

fn default_dl() -> f64 {
    0.005
}

fn default_max_thick() -> f64 {
    1.0
}

impl BinaryConfig {
    pub fn period_s(&self) -> f64 {
        hours_to_seconds(self.period_hours)
    }

    pub fn primary_mass_kg(&self) -> f64 {
        solar_masses_to_kg(self.primary_mass_msun)
    }

    pub fn donor_mass_kg(&self) -> f64 {
        self.primary_mass_kg() * self.q
    }

    /// Stream stopping radius: the stream's own setting, else the disc's,
    /// else the default disc radius.
    pub fn stream_disc_radius(&self) -> f64 {
        self.stream
            .as_ref()
            .and_then(|stream| stream.disc_radius)
            .or_else(|| self.disc.as_ref().map(|disc| disc.radius))
            .unwrap_or_else(default_disc_radius)
    }

    /// Check every value against its allowed range, reporting the first
    /// offender.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check("q", "> 0", self.q, self.q > 0.0)?;
        check("period_hours", "> 0", self.period_hours, self.period_hours > 0.0)?;
        check(
            "primary_mass_msun",
            "> 0",
            self.primary_mass_msun,
            self.primary_mass_msun > 0.0,
        )?;

        self.donor.validate(&DONOR_KEYS)?;
        if let Some(primary) = &self.primary {
            primary.validate(&PRIMARY_KEYS)?;
        }

        if let Some(disc) = &self.disc {
            check(
                "disc.radius",
                "in (0, 1]",
                disc.radius,
                disc.radius > 0.0 && disc.radius <= 1.0,
            )?;
            check(
                "disc.inner_radius",
                "in [0, disc.radius)",
                disc.inner_radius,
                disc.inner_radius >= 0.0 && disc.inner_radius < disc.radius,
            )?;
            check("disc.thickness", "> 0", disc.thickness, disc.thickness > 0.0)?;
            check("disc.t_out", "> 0", disc.t_out, disc.t_out > 0.0)?;
            check("disc.temp_grad", "finite", disc.temp_grad, disc.temp_grad.is_finite())?;
            check("disc.beta", "> 0", disc.beta, disc.beta > 0.0)?;
            check(
                "disc.hot_spot_temp",
                ">= 0",
                disc.hot_spot_temp,
                disc.hot_spot_temp >= 0.0,
            )?;
            check(
                "disc.flare_length",
                "> 0",
                disc.flare_length as f64,
                disc.flare_length > 0,
            )?;
        }

        if let Some(stream) = &self.stream {
            check("stream.dl", "> 0", stream.dl, stream.dl > 0.0)?;
            if let Some(radius) = stream.disc_radius {
                check(
                    "stream.disc_radius",
                    "in (0, 1]",
                    radius,
                    radius > 0.0 && radius <= 1.0,
                )?;
            }
            check("stream.max_thick", "> 0", stream.max_thick, stream.max_thick > 0.0)?;
        }

        Ok(())
    }
}

/// Fully qualified keys of one star section, for error reports.
struct StarKeys {
    t_pole: &'static str,
    fill: &'static str,
    t_min: &'static str,
    granulation: &'static str,
    granulation_period: &'static str,
    luminosity: &'static str,
    disc_thick: &'static str,
    albedo: &'static str,
}

const DONOR_KEYS: StarKeys = StarKeys {
    t_pole: "donor.t_pole",
    fill: "donor.fill",
    t_min: "donor.t_min",
    granulation: "donor.granulation",
    granulation_period: "donor.granulation_period",
    luminosity: "donor.irradiation.luminosity_erg_s",
    disc_thick: "donor.irradiation.disc_thick",
    albedo: "donor.irradiation.albedo",
};

const PRIMARY_KEYS: StarKeys = StarKeys {
    t_pole: "primary.t_pole",
    fill: "primary.fill",
    t_min: "primary.t_min",
    granulation: "primary.granulation",
    granulation_period: "primary.granulation_period",
    luminosity: "primary.irradiation.luminosity_erg_s",
    disc_thick: "primary.irradiation.disc_thick",
    albedo: "primary.irradiation.albedo",
};

impl StarConfig {
    fn validate(&self, keys: &StarKeys) -> Result<(), ConfigError> {
        check(keys.t_pole, "> 0", self.t_pole, self.t_pole > 0.0)?;
        check(keys.fill, "in (0, 1]", self.fill, self.fill > 0.0 && self.fill <= 1.0)?;
        check(keys.t_min, "in [0, 1]", self.t_min, (0.0..=1.0).contains(&self.t_min))?;
        check(keys.granulation, ">= 0", self.granulation, self.granulation >= 0.0)?;
        check(
            keys.granulation_period,
            "> 0",
            self.granulation_period,
            self.granulation_period > 0.0,
        )?;
        if let Some(irr) = &self.irradiation {
            check(
                keys.luminosity,
                ">= 0",
                irr.luminosity_erg_s,
                irr.luminosity_erg_s >= 0.0,
            )?;
            check(keys.disc_thick, "finite", irr.disc_thick, irr.disc_thick.is_finite())?;
            check(keys.albedo, "in [0, 1]", irr.albedo, (0.0..=1.0).contains(&irr.albedo))?;
        }
        Ok(())
    }
}

impl IrradiationConfig {
    pub fn luminosity_w(&self) -> f64 {
        erg_s_to_watts(self.luminosity_erg_s)
    }
}

fn check(
    key: &'static str,
    requirement: &'static str,
    value: f64,
    ok: bool,
) -> Result<(), ConfigError> {
    // NaN fails every comparison above and lands here too.
    if ok {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            key,
            requirement,
            value,
        })
    }
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("value {value} of {key} is out of range (must be {requirement})")]
    OutOfRange {
        key: &'static str,
        requirement: &'static str,
        value: f64,
    },
}

/// Load and validate one binary from a YAML or TOML file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<BinaryConfig, ConfigError> {
    let config: BinaryConfig = load_record(path.as_ref())?;
    config.validate()?;
    Ok(config)
}

/// Load and validate every `.yaml`, `.yml` or `.toml` binary in a
/// directory, in file-name order. A plain file yields a single entry.
pub fn load_configs<P: AsRef<Path>>(path: P) -> Result<Vec<BinaryConfig>, ConfigError> {
    let path = path.as_ref();
    let configs: Vec<BinaryConfig> = if path.is_dir() {
        read_dir_records(path)?
    } else {
        vec![load_record(path)?]
    };
    for config in &configs {
        config.validate()?;
    }
    Ok(configs)
}

fn load_record<T>(path: &Path) -> Result<T, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    if has_extension(path, &["toml"]) {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn read_dir_records<T>(dir: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| has_extension(path, &["toml", "yaml", "yml"]))
        .collect();
    entries.sort();
    entries.iter().map(|path| load_record(path)).collect()
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.contains(&ext))
        .unwrap_or(false)
}
