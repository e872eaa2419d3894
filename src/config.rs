use crate::error::{ProcessingError, Result};
use crate::processors::CleanOptions;
use crate::readers::LoadOptions;
use crate::utils::constants::*;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use validator::{Validate, ValidationError};

/// Runtime settings, layered from built-in defaults, an optional settings
/// file and `ACCIDENTS_*` environment variables (later layers win).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Settings {
    pub input_path: Option<PathBuf>,

    #[validate(range(min = 1))]
    pub sample_size: usize,

    pub seed: u64,

    #[validate(custom(function = "validate_delimiter"))]
    pub delimiter: String,

    pub strict_dates: bool,

    #[validate(range(min = 1))]
    pub weather_top_n: usize,

    #[validate(range(min = 1))]
    pub city_top_n: usize,

    #[validate(range(min = 1))]
    pub state_top_n: usize,
}

fn validate_delimiter(delimiter: &str) -> std::result::Result<(), ValidationError> {
    let mut chars = delimiter.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(()),
        _ => Err(ValidationError::new("single_ascii_delimiter")),
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_path: None,
            sample_size: DEFAULT_SAMPLE_SIZE,
            seed: DEFAULT_SEED,
            delimiter: DEFAULT_DELIMITER.to_string(),
            strict_dates: false,
            weather_top_n: DEFAULT_WEATHER_TOP_N,
            city_top_n: DEFAULT_CITY_TOP_N,
            state_top_n: DEFAULT_STATE_TOP_N,
        }
    }
}

impl Settings {
    /// Load settings. With `config_path` the file must exist; otherwise
    /// `accident-insights.{toml,json,yaml,...}` in the working directory is
    /// read when present.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(config_path, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with_env(config_path: Option<&Path>, env: Environment) -> Result<Self> {
        let defaults = Settings::default();

        let mut builder = Config::builder()
            .set_default("sample_size", defaults.sample_size as i64)?
            .set_default("seed", defaults.seed as i64)?
            .set_default("delimiter", defaults.delimiter)?
            .set_default("strict_dates", defaults.strict_dates)?
            .set_default("weather_top_n", defaults.weather_top_n as i64)?
            .set_default("city_top_n", defaults.city_top_n as i64)?
            .set_default("state_top_n", defaults.state_top_n as i64)?;

        builder = match config_path {
            Some(path) => {
                debug!(path = %path.display(), "reading settings file");
                builder.add_source(File::from(path))
            }
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        let settings: Settings = builder
            .add_source(env.try_parsing(true))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn load_options(&self) -> Result<LoadOptions> {
        let delimiter = match self.delimiter.as_bytes() {
            [byte] if byte.is_ascii() => *byte,
            _ => {
                return Err(ProcessingError::Config(format!(
                    "delimiter must be a single ASCII character, got {:?}",
                    self.delimiter
                )))
            }
        };

        Ok(LoadOptions {
            sample_size: self.sample_size,
            seed: self.seed,
            delimiter,
        })
    }

    pub fn clean_options(&self) -> CleanOptions {
        CleanOptions {
            strict_dates: self.strict_dates,
        }
    }
}
