pub mod yearly_analyzer;

pub use yearly_analyzer::{YearlyAnalyzer, YearlyReport};
