//! CSV export for simulated points.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::types::SimulationPoint;

/// Column header for CSV point export.
const HEADER: &str = "horizon_index,hour_of_day,time_slot,multiplier,\
                       predicted_kwh,simulated_kwh,cost_usd";

/// Exports simulated points to a CSV file at the given path.
///
/// Writes a header row followed by one data row per point in horizon order.
/// Produces deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(points: &[SimulationPoint], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(points, buf)
}

/// Writes simulated points as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(points: &[SimulationPoint], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for p in points {
        wtr.write_record(&[
            p.horizon_index.to_string(),
            p.hour_of_day.to_string(),
            p.time_slot.to_string(),
            format!("{:.2}", p.multiplier),
            format!("{:.4}", p.predicted_kwh),
            format!("{:.4}", p.simulated_kwh),
            format!("{:.4}", p.cost_usd),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
