use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use validator::Validate;

use crate::error::{ProcessingError, Result};
use crate::models::Pollutant;
use crate::utils::constants::MISSING_MARKER;

/// One hourly station reading.
///
/// Field names follow the PRSA CSV headers; `NA` or empty cells deserialize
/// to `None`.
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
pub struct Observation {
    pub year: i32,

    #[validate(range(min = 1, max = 12))]
    pub month: u32,

    #[validate(range(min = 1, max = 31))]
    pub day: u32,

    #[validate(range(max = 23))]
    pub hour: u32,

    #[serde(rename = "TEMP", deserialize_with = "deserialize_optional_value")]
    #[validate(range(min = -50.0, max = 60.0))]
    pub temperature: Option<f64>,

    #[serde(rename = "PM2.5", deserialize_with = "deserialize_optional_value")]
    #[validate(range(min = 0.0))]
    pub pm25: Option<f64>,

    #[serde(rename = "PM10", deserialize_with = "deserialize_optional_value")]
    #[validate(range(min = 0.0))]
    pub pm10: Option<f64>,

    #[serde(rename = "SO2", deserialize_with = "deserialize_optional_value")]
    #[validate(range(min = 0.0))]
    pub so2: Option<f64>,

    #[serde(rename = "NO2", deserialize_with = "deserialize_optional_value")]
    #[validate(range(min = 0.0))]
    pub no2: Option<f64>,

    #[serde(rename = "O3", deserialize_with = "deserialize_optional_value")]
    #[validate(range(min = 0.0))]
    pub o3: Option<f64>,

    #[serde(default)]
    pub station: Option<String>,
}

fn deserialize_optional_value<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let trimmed = raw.trim();

    if trimmed.is_empty() || trimmed == MISSING_MARKER {
        return Ok(None);
    }

    trimmed
        .parse::<f64>()
        .map(Some)
        .map_err(|_| serde::de::Error::custom(format!("invalid numeric value: '{}'", trimmed)))
}

impl Observation {
    /// Reading at midnight on 1 January of `year`, all measurements missing
    pub fn new(year: i32) -> Self {
        Self {
            year,
            month: 1,
            day: 1,
            hour: 0,
            temperature: None,
            pm25: None,
            pm10: None,
            so2: None,
            no2: None,
            o3: None,
            station: None,
        }
    }

    pub fn pollutant(&self, pollutant: Pollutant) -> Option<f64> {
        match pollutant {
            Pollutant::Pm25 => self.pm25,
            Pollutant::Pm10 => self.pm10,
            Pollutant::So2 => self.so2,
            Pollutant::No2 => self.no2,
            Pollutant::O3 => self.o3,
        }
    }

    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
            .and_then(|date| date.and_hms_opt(self.hour, 0, 0))
    }

    /// Range validation plus a real calendar date and hour
    pub fn check(&self) -> Result<()> {
        self.validate()?;

        if self.timestamp().is_none() {
            return Err(ProcessingError::InvalidFormat(format!(
                "Invalid calendar position {}-{:02}-{:02} {:02}:00",
                self.year, self.month, self.day, self.hour
            )));
        }

        Ok(())
    }
}

pub struct ObservationBuilder {
    observation: Observation,
}

impl ObservationBuilder {
    pub fn new(year: i32) -> Self {
        Self {
            observation: Observation::new(year),
        }
    }

    pub fn time(mut self, month: u32, day: u32, hour: u32) -> Self {
        self.observation.month = month;
        self.observation.day = day;
        self.observation.hour = hour;
        self
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.observation.temperature = Some(temperature);
        self
    }

    pub fn pollutant(mut self, pollutant: Pollutant, value: f64) -> Self {
        let slot = match pollutant {
            Pollutant::Pm25 => &mut self.observation.pm25,
            Pollutant::Pm10 => &mut self.observation.pm10,
            Pollutant::So2 => &mut self.observation.so2,
            Pollutant::No2 => &mut self.observation.no2,
            Pollutant::O3 => &mut self.observation.o3,
        };
        *slot = Some(value);
        self
    }

    pub fn station(mut self, name: &str) -> Self {
        self.observation.station = Some(name.to_string());
        self
    }

    pub fn build(self) -> Result<Observation> {
        self.observation.check()?;
        Ok(self.observation)
    }
}
