use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::models::{
    CombinedRecord, Observation, Pollutant, PollutantCorrelation, TemperatureExtremes,
    YearlyPollutants, YearlyTemperature,
};
use crate::processors::{
    compute_yearly_pollutants, compute_yearly_temperature, correlate_with_temperature,
    join_on_year, temperature_extremes,
};
use serde::Serialize;
use tracing::info;

const NOT_AVAILABLE: &str = "n/a";

fn format_value(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Every derived view of one station's observations
#[derive(Debug, Clone, Serialize)]
pub struct YearlyReport {
    pub station: String,
    pub year_min: i32,
    pub year_max: i32,
    pub total_observations: usize,
    pub yearly_temperature: Vec<YearlyTemperature>,
    /// Absent when no year in range has a temperature
    pub temperature_extremes: Option<TemperatureExtremes>,
    pub yearly_pollutants: Vec<YearlyPollutants>,
    pub combined: Vec<CombinedRecord>,
    pub correlations: Vec<PollutantCorrelation>,
    #[serde(skip)]
    temperature_decimals: usize,
    #[serde(skip)]
    pollutant_decimals: usize,
}

pub struct YearlyAnalyzer {
    config: AnalysisConfig,
}

impl YearlyAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Run the aggregation pipeline. `station` overrides the configured label.
    pub fn analyze(
        &self,
        observations: &[Observation],
        station: Option<&str>,
    ) -> Result<YearlyReport> {
        let yearly_temperature =
            compute_yearly_temperature(observations, self.config.year_min, self.config.year_max)?;
        let yearly_pollutants = compute_yearly_pollutants(observations);
        let combined = join_on_year(&yearly_temperature, &yearly_pollutants);
        let correlations = correlate_with_temperature(&combined);

        let extremes = if yearly_temperature.is_empty() {
            None
        } else {
            Some(temperature_extremes(&yearly_temperature)?)
        };

        info!(
            "Aggregated {} observations into {} temperature years, {} pollutant years, {} combined",
            observations.len(),
            yearly_temperature.len(),
            yearly_pollutants.len(),
            combined.len()
        );

        Ok(YearlyReport {
            station: station.unwrap_or(&self.config.station_label).to_string(),
            year_min: self.config.year_min,
            year_max: self.config.year_max,
            total_observations: observations.len(),
            yearly_temperature,
            temperature_extremes: extremes,
            yearly_pollutants,
            combined,
            correlations,
            temperature_decimals: self.config.temperature_decimals,
            pollutant_decimals: self.config.pollutant_decimals,
        })
    }
}

impl Default for YearlyAnalyzer {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

impl YearlyReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn summary(&self) -> String {
        let td = self.temperature_decimals;
        let pd = self.pollutant_decimals;

        let mut lines = vec![
            format!("{} Station - Air Quality Summary", self.station),
            format!("Observations: {}", self.total_observations),
            String::new(),
            format!(
                "Yearly Mean Temperature ({}-{}):",
                self.year_min, self.year_max
            ),
        ];

        if self.yearly_temperature.is_empty() {
            lines.push("  No temperature readings in range".to_string());
        }
        lines.extend(self.yearly_temperature.iter().map(|row| {
            format!(
                "  {}  {:>8} °C  ({} readings)",
                row.year,
                format_value(Some(row.mean_temperature), td),
                row.samples
            )
        }));

        match &self.temperature_extremes {
            Some(extremes) => {
                lines.push(format!(
                    "  Lowest:  {} °C ({})",
                    format_value(Some(extremes.lowest.mean_temperature), td),
                    extremes.lowest.year
                ));
                lines.push(format!(
                    "  Highest: {} °C ({})",
                    format_value(Some(extremes.highest.mean_temperature), td),
                    extremes.highest.year
                ));
                lines.push(format!(
                    "  Spread:  {} °C",
                    format_value(Some(extremes.spread()), td)
                ));
            }
            None => lines.push(format!("  Lowest/Highest: {}", NOT_AVAILABLE)),
        }

        let header: String = Pollutant::ALL
            .iter()
            .map(|p| format!(" {:>9}", p.column_name()))
            .collect();
        lines.push(String::new());
        lines.push("Yearly Mean Pollutant Concentrations:".to_string());
        lines.push(format!("  Year{}", header));
        lines.extend(self.yearly_pollutants.iter().map(|row| {
            let cells: String = Pollutant::ALL
                .iter()
                .map(|p| format!(" {:>9}", format_value(row.mean(*p), pd)))
                .collect();
            format!("  {}{}", row.year, cells)
        }));

        lines.push(String::new());
        lines.push(format!(
            "Temperature vs Pollutants ({} shared years):",
            self.combined.len()
        ));
        lines.extend(self.correlations.iter().map(|correlation| {
            format!(
                "  {:<6} r = {:>6}  ({} years)",
                correlation.pollutant.column_name(),
                format_value(correlation.coefficient, 2),
                correlation.samples
            )
        }));

        lines.join("\n")
    }
}
