use serde::{Deserialize, Serialize};

use crate::models::{Pollutant, PollutantMeans};

/// Mean temperature for one year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearlyTemperature {
    pub year: i32,
    pub mean_temperature: f64,
    /// Observations that contributed to the mean
    pub samples: u64,
}

/// Mean concentration of each pollutant for one year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearlyPollutants {
    pub year: i32,
    pub means: PollutantMeans,
}

impl YearlyPollutants {
    pub fn mean(&self, pollutant: Pollutant) -> Option<f64> {
        self.means.get(pollutant)
    }
}

/// Yearly temperature joined with yearly pollutant means
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombinedRecord {
    pub year: i32,
    pub mean_temperature: f64,
    pub means: PollutantMeans,
}

impl CombinedRecord {
    pub fn mean(&self, pollutant: Pollutant) -> Option<f64> {
        self.means.get(pollutant)
    }
}

/// Coldest and warmest yearly means
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureExtremes {
    pub lowest: YearlyTemperature,
    pub highest: YearlyTemperature,
}

impl TemperatureExtremes {
    pub fn spread(&self) -> f64 {
        self.highest.mean_temperature - self.lowest.mean_temperature
    }
}

/// Pearson correlation between yearly mean temperature and one pollutant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PollutantCorrelation {
    pub pollutant: Pollutant,
    pub coefficient: Option<f64>,
    /// Years with both a temperature and a pollutant mean
    pub samples: usize,
}
