pub static DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
pub static VERSION_AND_BUILD: &str = git_version::git_version!(
    prefix = concat!("v", env!("CARGO_PKG_VERSION"), " "),
    fallback = concat!("v", env!("CARGO_PKG_VERSION")));


use std::{
    ffi::OsStr,
    fs::read_to_string,
    path::Path,
};
use serde::{
    Serialize,
    Deserialize,
};
use crate::deposition::EnergyModel;
use crate::geometry::Irradiation;
use crate::materials::{Material, SourceTemperature};
use crate::patch;
use crate::quadrature::Tolerances;




// ============================================================================
#[derive(thiserror::Error, Debug)]
pub enum Error {

    #[error("{0}")]
    IO(#[from] std::io::Error),

    #[error("{0}")]
    SerdeYaml(#[from] serde_yaml::Error),

    #[error("{0}")]
    Patch(#[from] patch::Error),

    #[error("unknown input file type '{0}'")]
    UnknownInputType(String),
}


/**
 * Model choice: which material fit the run evaluates
 */
#[derive(Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Model {
    pub material: Material,
    pub source_temperature: SourceTemperature,
}


/**
 * The source device
 */
#[derive(Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Source {
    pub yield_kt: f64,
    pub pulse_duration_ns: f64,
    pub height_of_burst_m: f64,
}


/**
 * The target body
 */
#[derive(Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Target {
    pub radius_m: f64,
    pub porosity: f64,
}


/**
 * Numerical controls: sweep resolutions, quadrature tolerance, threads
 */
#[derive(Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Numerics {
    pub angular_resolution: usize,
    pub depth_resolution_cm: f64,

    #[serde(default = "default_relative_tolerance")]
    pub relative_tolerance: f64,

    #[serde(default = "num_cpus::get")]
    pub num_threads: usize,
}


/**
 * User configuration
 */
#[derive(Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Configuration {
    pub model: Model,
    pub source: Source,
    pub target: Target,
    pub numerics: Numerics,
}




// ============================================================================
fn default_relative_tolerance() -> f64 {
    1.49e-8
}




// ============================================================================
impl Source {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.yield_kt <= 0.0 {
            anyhow::bail!("yield_kt must be > 0")
        }
        if self.pulse_duration_ns <= 0.0 {
            anyhow::bail!("pulse_duration_ns must be > 0")
        }
        if self.height_of_burst_m <= 0.0 {
            anyhow::bail!("height_of_burst_m must be > 0")
        }
        Ok(())
    }
}

impl Target {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.radius_m <= 0.0 {
            anyhow::bail!("radius_m must be > 0")
        }
        if self.porosity <= 0.0 || self.porosity >= 1.0 {
            anyhow::bail!("porosity must be inside (0, 1)")
        }
        Ok(())
    }
}

impl Numerics {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.angular_resolution == 0 {
            anyhow::bail!("angular_resolution must be > 0")
        }
        if self.depth_resolution_cm <= 0.0 {
            anyhow::bail!("depth_resolution_cm must be > 0")
        }
        if self.relative_tolerance <= 0.0 {
            anyhow::bail!("relative_tolerance must be > 0")
        }
        if self.num_threads == 0 || self.num_threads >= 1024 {
            anyhow::bail!("num_threads must be > 0 and < 1024")
        }
        Ok(())
    }
}




// ============================================================================
impl Configuration {

    pub fn validate(&self) -> anyhow::Result<()> {
        self.source.validate()?;
        self.target.validate()?;
        self.numerics.validate()?;
        Ok(())
    }

    /**
     * Load a configuration from a YAML file.
     */
    pub fn from_file(filename: &str) -> Result<Self, Error> {
        match Path::new(&filename).extension().and_then(OsStr::to_str) {
            Some("yaml") => Ok(serde_yaml::from_str(&read_to_string(filename)?)?),
            _ => Err(Error::UnknownInputType(filename.to_string())),
        }
    }

    /**
     * Load a preset (hard-coded) configuration name, or otherwise an input
     * file if no matching preset is found.
     */
    pub fn from_preset_or_file(input: &str) -> Result<Self, Error> {
        match input {
            "silica_reference" => Ok(serde_yaml::from_str(std::include_str!("../setups/silica_reference.yaml"))?),
            _ => Self::from_file(input),
        }
    }

    /**
     * Apply any `key.path=value` overrides given after the input argument.
     */
    pub fn patch_from_args(&mut self) -> Result<(), Error> {
        for override_str in std::env::args().skip(2) {
            patch::patch_key_val(self, &override_str)?
        }
        Ok(())
    }

    pub fn energy_model(&self) -> EnergyModel {
        EnergyModel::new(self.model.material, self.model.source_temperature)
    }

    pub fn irradiation(&self) -> Irradiation {
        Irradiation {
            target_radius: self.target.radius_m,
            height_of_burst: self.source.height_of_burst_m,
            source_yield: self.source.yield_kt,
            pulse_duration: self.source.pulse_duration_ns,
            porosity: self.target.porosity,
            angular_resolution: self.numerics.angular_resolution,
            depth_resolution: self.numerics.depth_resolution_cm,
        }
    }

    pub fn tolerances(&self) -> Tolerances {
        Tolerances::new(1.49e-8, self.numerics.relative_tolerance)
    }
}




// ============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_reference_preset_parses_and_validates() {
        let config = Configuration::from_preset_or_file("silica_reference").unwrap();
        config.validate().unwrap();
        assert!(config.model.material == Material::SiO2);
        assert!(config.model.source_temperature == SourceTemperature::TwoKev);
        assert!(config.target.porosity == 0.21);
        assert!(config.numerics.angular_resolution == 200);
    }

    #[test]
    fn porosity_outside_the_open_interval_is_rejected() {
        let mut config = Configuration::from_preset_or_file("silica_reference").unwrap();
        config.target.porosity = 1.0;
        assert!(config.validate().is_err());
        config.target.porosity = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_positive_resolutions_are_rejected() {
        let mut config = Configuration::from_preset_or_file("silica_reference").unwrap();
        config.numerics.angular_resolution = 0;
        assert!(config.validate().is_err());

        let mut config = Configuration::from_preset_or_file("silica_reference").unwrap();
        config.numerics.depth_resolution_cm = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn overrides_reach_nested_configuration_items() {
        let mut config = Configuration::from_preset_or_file("silica_reference").unwrap();
        patch::patch_key_val(&mut config, "target.porosity=0.32").unwrap();
        patch::patch_key_val(&mut config, "model.material=iron").unwrap();
        assert!(config.target.porosity == 0.32);
        assert!(config.model.material == Material::Iron);
    }

    #[test]
    fn unknown_input_names_are_rejected() {
        assert!(matches!(
            Configuration::from_preset_or_file("no_such_preset"),
            Err(Error::UnknownInputType(_))));
    }
}
