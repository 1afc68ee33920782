// src/io/reporting.rs

use crate::error::ReportError;
use crate::simulation::engine::HistoryRecord;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Writes the per-week simulation log as CSV to any writer.
pub fn write_records<W: Write>(writer: W, data: &[HistoryRecord]) -> Result<(), ReportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in data {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes the simulation history to a CSV file (e.g. "results/run_1.csv").
pub fn write_simulation_log(file_path: &Path, data: &[HistoryRecord]) -> Result<(), ReportError> {
    let file = std::fs::File::create(file_path)?;
    write_records(file, data)?;

    info!(
        rows = data.len(),
        path = %file_path.display(),
        "exported simulation log"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_has_header_and_one_row_per_record() {
        let record = HistoryRecord {
            week: 1,
            role: "retailer".to_string(),
            inventory: 12,
            backlog: 0,
            incoming_orders: 4,
            arriving_shipments: 4,
            order_placed: 4,
            shipped: 4,
            cost: 6.0,
        };
        let mut out = Vec::new();
        write_records(&mut out, &[record.clone(), record]).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("week,role,inventory"));
        assert!(lines[1].starts_with("1,retailer,12"));
    }
}
