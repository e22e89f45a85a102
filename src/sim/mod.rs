/// Reduction of simulated points into horizon and slot totals.
pub mod aggregate;
pub mod cost;
pub mod engine;
/// Usage-pattern policies applied to the raw forecast.
pub mod pattern;
pub mod report;
pub mod savings;
pub mod suggest;
/// Time-of-use tariff schedule and the `Tariff` trait.
pub mod tariff;
pub mod types;

pub use engine::Simulator;
pub use report::SimulationReport;
