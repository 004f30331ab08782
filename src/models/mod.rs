pub mod observation;
pub mod pollutant;
pub mod yearly;

pub use observation::{Observation, ObservationBuilder};
pub use pollutant::{Pollutant, PollutantMeans};
pub use yearly::{
    CombinedRecord, PollutantCorrelation, TemperatureExtremes, YearlyPollutants,
    YearlyTemperature,
};
