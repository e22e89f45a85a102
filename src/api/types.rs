//! API response and query types.

use serde::{Deserialize, Serialize};

use crate::sim::SimulationReport;
use crate::sim::aggregate::{SlotBreakdown, Totals};
use crate::sim::types::UsagePattern;

/// Report summary without the per-hour points.
#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub pattern: UsagePattern,
    pub base_rate_usd_per_kwh: f64,
    /// Number of simulated hours.
    pub horizon_hours: usize,
    pub totals: Totals,
    pub by_slot: SlotBreakdown,
    pub potential_savings_usd: f64,
}

impl From<&SimulationReport> for ReportResponse {
    fn from(r: &SimulationReport) -> Self {
        Self {
            pattern: r.pattern,
            base_rate_usd_per_kwh: r.base_rate_usd_per_kwh,
            horizon_hours: r.horizon_len(),
            totals: r.totals,
            by_slot: r.by_slot.clone(),
            potential_savings_usd: r.potential_savings_usd,
        }
    }
}

/// Optional range query parameters for the points endpoint.
#[derive(Debug, Deserialize)]
pub struct PointsQuery {
    /// First horizon index (inclusive).
    pub from: Option<usize>,
    /// Last horizon index (inclusive).
    pub to: Option<usize>,
}

/// Query parameters for the time-slot endpoint.
#[derive(Debug, Deserialize)]
pub struct TimeSlotQuery {
    /// Hour of day to describe (0–23).
    pub hour: Option<u32>,
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
