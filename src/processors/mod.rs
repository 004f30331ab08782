pub mod correlation;
pub mod year_joiner;
pub mod yearly_aggregator;

pub use correlation::correlate_with_temperature;
pub use year_joiner::join_on_year;
pub use yearly_aggregator::{
    compute_yearly_pollutants, compute_yearly_temperature, highest_mean_temperature,
    lowest_mean_temperature, temperature_extremes,
};
