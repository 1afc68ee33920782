// src/strategy/pipeline.rs

use crate::model::history::RoleWeek;
use crate::strategy::params::{ControllerParams, PipelineMode};

/// Units ordered but not yet received as of the end of `weeks`.
///
/// Shipments in flight are not observable, so the estimate sums
/// `placed_order - arriving_shipments` over the newest `pipeline_window` weeks.
pub fn estimate(weeks: &[RoleWeek], params: &ControllerParams) -> f64 {
    let start = weeks.len().saturating_sub(params.pipeline_window());
    let outstanding: i64 = weeks[start..]
        .iter()
        .map(|week| week.placed_order as i64 - week.observation.arriving_shipments as i64)
        .sum();

    match params.pipeline_mode {
        PipelineMode::Clamped => outstanding.max(0) as f64,
        PipelineMode::Signed => outstanding as f64,
    }
}

/// Pipeline estimate at the end of every week. Same length as `weeks`.
pub fn estimate_series(weeks: &[RoleWeek], params: &ControllerParams) -> Vec<f64> {
    (1..=weeks.len())
        .map(|end| estimate(&weeks[..end], params))
        .collect()
}
