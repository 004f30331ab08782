use crate::error::{ProcessingError, Result};
use crate::models::{
    Observation, Pollutant, PollutantMeans, TemperatureExtremes, YearlyPollutants,
    YearlyTemperature,
};
use std::collections::BTreeMap;
use tracing::debug;

/// Running sum for an arithmetic mean; non-finite values count as missing
#[derive(Debug, Clone, Copy, Default)]
struct MeanAccumulator {
    sum: f64,
    count: u64,
}

impl MeanAccumulator {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value.filter(|v| v.is_finite()) {
            self.sum += v;
            self.count += 1;
        }
    }

    fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }
}

/// Mean temperature per year for years in `[year_min, year_max]`, ascending.
///
/// Observations without a temperature are ignored. A year left with no
/// usable temperature is omitted rather than emitted with a NaN mean.
pub fn compute_yearly_temperature(
    observations: &[Observation],
    year_min: i32,
    year_max: i32,
) -> Result<Vec<YearlyTemperature>> {
    if year_min > year_max {
        return Err(ProcessingError::InvalidYearRange { year_min, year_max });
    }

    let mut by_year: BTreeMap<i32, MeanAccumulator> = BTreeMap::new();
    for observation in observations
        .iter()
        .filter(|o| (year_min..=year_max).contains(&o.year))
    {
        by_year
            .entry(observation.year)
            .or_default()
            .push(observation.temperature);
    }

    let table: Vec<YearlyTemperature> = by_year
        .into_iter()
        .filter_map(|(year, acc)| {
            acc.mean().map(|mean_temperature| YearlyTemperature {
                year,
                mean_temperature,
                samples: acc.count,
            })
        })
        .collect();

    debug!(
        "Yearly temperature: {} observations -> {} years in [{}, {}]",
        observations.len(),
        table.len(),
        year_min,
        year_max
    );

    Ok(table)
}

/// Mean of each pollutant per year over all years, ascending.
///
/// Each pollutant is averaged independently, so a year can carry a PM2.5
/// mean while its O3 mean is absent.
pub fn compute_yearly_pollutants(observations: &[Observation]) -> Vec<YearlyPollutants> {
    let mut by_year: BTreeMap<i32, [MeanAccumulator; 5]> = BTreeMap::new();

    for observation in observations {
        let accumulators = by_year.entry(observation.year).or_default();
        for (acc, pollutant) in accumulators.iter_mut().zip(Pollutant::ALL) {
            acc.push(observation.pollutant(pollutant));
        }
    }

    let table: Vec<YearlyPollutants> = by_year
        .into_iter()
        .map(|(year, accumulators)| {
            let mut means = PollutantMeans::default();
            for (acc, pollutant) in accumulators.iter().zip(Pollutant::ALL) {
                means.set(pollutant, acc.mean());
            }
            YearlyPollutants { year, means }
        })
        .collect();

    debug!(
        "Yearly pollutants: {} observations -> {} years",
        observations.len(),
        table.len()
    );

    table
}

/// Coldest and warmest rows of a yearly temperature table. Ties go to the earlier year.
pub fn temperature_extremes(table: &[YearlyTemperature]) -> Result<TemperatureExtremes> {
    let first = table.first().ok_or(ProcessingError::EmptyResult {
        table: "yearly temperature",
    })?;

    let mut lowest = *first;
    let mut highest = *first;

    for row in &table[1..] {
        if row.mean_temperature < lowest.mean_temperature {
            lowest = *row;
        }
        if row.mean_temperature > highest.mean_temperature {
            highest = *row;
        }
    }

    Ok(TemperatureExtremes { lowest, highest })
}

pub fn lowest_mean_temperature(table: &[YearlyTemperature]) -> Result<f64> {
    temperature_extremes(table).map(|e| e.lowest.mean_temperature)
}

pub fn highest_mean_temperature(table: &[YearlyTemperature]) -> Result<f64> {
    temperature_extremes(table).map(|e| e.highest.mean_temperature)
}
