//! Time-of-use energy simulation and tariff analysis.
//!
//! Takes an hourly consumption forecast and a usage pattern, prices every
//! hour under a time-of-use tariff, aggregates the result per billing slot,
//! and estimates what shifting peak consumption would save.

#[cfg(feature = "api")]
pub mod api;
pub mod config;
pub mod error;
pub mod forecast;
/// CSV export of simulation output.
pub mod io;
/// Simulation engine and its components.
pub mod sim;
