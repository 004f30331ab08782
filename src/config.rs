//! Analysis settings.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! `AIRQ_`-prefixed environment variables. CLI flags are applied last via
//! [`AnalysisConfig::apply_overrides`].

use crate::error::Result;
use crate::utils::constants::{
    COMPRESSION_SNAPPY, DEFAULT_CONFIG_FILE, DEFAULT_POLLUTANT_DECIMALS, DEFAULT_ROW_GROUP_SIZE,
    DEFAULT_STATION_LABEL, DEFAULT_TEMPERATURE_DECIMALS, DEFAULT_YEAR_MAX, DEFAULT_YEAR_MIN,
    ENV_PREFIX,
};
use config::{Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = "validate_year_order"))]
pub struct AnalysisConfig {
    /// First year of the temperature window (inclusive)
    pub year_min: i32,

    /// Last year of the temperature window (inclusive)
    pub year_max: i32,

    /// Station name used in report headings
    #[validate(length(min = 1))]
    pub station_label: String,

    #[validate(range(max = 6))]
    pub temperature_decimals: usize,

    #[validate(range(max = 6))]
    pub pollutant_decimals: usize,

    /// Skip malformed CSV rows instead of failing the read
    pub skip_invalid_rows: bool,

    /// Parquet compression codec for exports
    pub compression: String,

    /// Maximum rows per Parquet row group
    #[validate(range(min = 1))]
    pub row_group_size: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            year_min: DEFAULT_YEAR_MIN,
            year_max: DEFAULT_YEAR_MAX,
            station_label: DEFAULT_STATION_LABEL.to_string(),
            temperature_decimals: DEFAULT_TEMPERATURE_DECIMALS,
            pollutant_decimals: DEFAULT_POLLUTANT_DECIMALS,
            skip_invalid_rows: false,
            compression: COMPRESSION_SNAPPY.to_string(),
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }
}

fn validate_year_order(config: &AnalysisConfig) -> std::result::Result<(), ValidationError> {
    if config.year_min > config.year_max {
        return Err(ValidationError::new("year_min_after_year_max"));
    }
    Ok(())
}

impl AnalysisConfig {
    /// Load configuration from `path`, or from `airquality.toml` in the
    /// working directory when it exists, plus the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_environment(path, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with_environment(path: Option<&Path>, environment: Environment) -> Result<Self> {
        let mut builder = config::Config::builder();

        builder = match path {
            Some(path) => {
                debug!("Loading configuration from {}", path.display());
                builder.add_source(File::from(path).required(true))
            }
            None => builder.add_source(File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false)),
        };

        let config: AnalysisConfig = builder
            .add_source(environment.try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// CLI flags take precedence over file and environment settings
    pub fn apply_overrides(
        &mut self,
        year_min: Option<i32>,
        year_max: Option<i32>,
        compression: Option<&str>,
        skip_invalid_rows: bool,
    ) -> Result<()> {
        if let Some(year) = year_min {
            self.year_min = year;
        }
        if let Some(year) = year_max {
            self.year_max = year;
        }
        if let Some(codec) = compression {
            self.compression = codec.to_string();
        }
        if skip_invalid_rows {
            self.skip_invalid_rows = true;
        }

        self.validate()?;
        Ok(())
    }
}
