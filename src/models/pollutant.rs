use serde::{Deserialize, Serialize};

use crate::utils::constants::{COLUMN_NO2, COLUMN_O3, COLUMN_PM10, COLUMN_PM25, COLUMN_SO2};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Pollutant {
    Pm25,
    Pm10,
    So2,
    No2,
    O3,
}

impl Pollutant {
    /// Canonical order used for every table and chart series
    pub const ALL: [Pollutant; 5] = [
        Pollutant::Pm25,
        Pollutant::Pm10,
        Pollutant::So2,
        Pollutant::No2,
        Pollutant::O3,
    ];

    pub fn column_name(&self) -> &'static str {
        match self {
            Pollutant::Pm25 => COLUMN_PM25,
            Pollutant::Pm10 => COLUMN_PM10,
            Pollutant::So2 => COLUMN_SO2,
            Pollutant::No2 => COLUMN_NO2,
            Pollutant::O3 => COLUMN_O3,
        }
    }

    /// Column name used in Parquet output (no dots)
    pub fn field_name(&self) -> &'static str {
        match self {
            Pollutant::Pm25 => "pm25",
            Pollutant::Pm10 => "pm10",
            Pollutant::So2 => "so2",
            Pollutant::No2 => "no2",
            Pollutant::O3 => "o3",
        }
    }
}

impl std::fmt::Display for Pollutant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.column_name())
    }
}

/// One optional mean per pollutant
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PollutantMeans {
    pub pm25: Option<f64>,
    pub pm10: Option<f64>,
    pub so2: Option<f64>,
    pub no2: Option<f64>,
    pub o3: Option<f64>,
}

impl PollutantMeans {
    pub fn get(&self, pollutant: Pollutant) -> Option<f64> {
        match pollutant {
            Pollutant::Pm25 => self.pm25,
            Pollutant::Pm10 => self.pm10,
            Pollutant::So2 => self.so2,
            Pollutant::No2 => self.no2,
            Pollutant::O3 => self.o3,
        }
    }

    pub fn set(&mut self, pollutant: Pollutant, value: Option<f64>) {
        match pollutant {
            Pollutant::Pm25 => self.pm25 = value,
            Pollutant::Pm10 => self.pm10 = value,
            Pollutant::So2 => self.so2 = value,
            Pollutant::No2 => self.no2 = value,
            Pollutant::O3 => self.o3 = value,
        }
    }

    pub fn is_empty(&self) -> bool {
        Pollutant::ALL.iter().all(|p| self.get(*p).is_none())
    }
}
