use crate::models::{CombinedRecord, YearlyPollutants, YearlyTemperature};
use std::collections::HashMap;
use tracing::debug;

/// Inner join of the yearly tables on exact year equality, ascending by year.
///
/// Yearly tables hold one row per year; if a pollutant table repeats a year
/// the last row for that year is used.
pub fn join_on_year(
    temperature_table: &[YearlyTemperature],
    pollutant_table: &[YearlyPollutants],
) -> Vec<CombinedRecord> {
    let pollutants_by_year: HashMap<i32, &YearlyPollutants> = pollutant_table
        .iter()
        .map(|row| (row.year, row))
        .collect();

    let mut combined: Vec<CombinedRecord> = temperature_table
        .iter()
        .filter_map(|temperature| {
            pollutants_by_year
                .get(&temperature.year)
                .map(|pollutants| CombinedRecord {
                    year: temperature.year,
                    mean_temperature: temperature.mean_temperature,
                    means: pollutants.means,
                })
        })
        .collect();

    combined.sort_by_key(|r| r.year);

    debug!(
        "Joined {} temperature rows with {} pollutant rows -> {} combined rows",
        temperature_table.len(),
        pollutant_table.len(),
        combined.len()
    );

    combined
}
