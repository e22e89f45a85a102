/// CSV export of simulated points.
pub mod export;
