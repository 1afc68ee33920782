// src/strategy/forecast.rs

use crate::model::history::RoleSeries;
use crate::strategy::params::ControllerParams;

/// Exponentially weighted moving average, seeded with the first value.
///
/// `None` for an empty slice. The result is never negative.
pub fn ewma(values: &[u32], lambda: f64) -> Option<f64> {
    let (first, rest) = values.split_first()?;
    let smoothed = rest.iter().fold(*first as f64, |level, &value| {
        lambda * value as f64 + (1.0 - lambda) * level
    });
    Some(smoothed.max(0.0))
}

fn windowed(values: &[u32], window: Option<usize>) -> &[u32] {
    match window {
        Some(w) if values.len() > w => &values[values.len() - w..],
        _ => values,
    }
}

/// Demand forecast from the newest `forecast_window` values.
///
/// Falls back to the cold-start order when there is nothing to average.
pub fn forecast(values: &[u32], params: &ControllerParams) -> f64 {
    ewma(windowed(values, params.forecast_window), params.forecast_lambda)
        .unwrap_or(params.initial_order as f64)
}

/// The forecast that was available at the end of each week: entry `i` only
/// looks at `values[..=i]`. Same length as `values`.
pub fn forecast_series(values: &[u32], params: &ControllerParams) -> Vec<f64> {
    (1..=values.len())
        .map(|end| forecast(&values[..end], params))
        .collect()
}

/// A forecast trajectory computed once and read by every role.
#[derive(Debug, Clone, PartialEq)]
pub struct SharedForecast {
    /// As-of-week forecasts, one per history week.
    pub series: Vec<f64>,
    /// Forecast over the whole history, the one the control law uses.
    pub latest: f64,
}

impl SharedForecast {
    /// Builds the chain-wide forecast from the retailer's incoming orders,
    /// i.e. end-customer demand, using the retailer's forecast tuning.
    pub fn from_retailer(retailer: &RoleSeries, params: &ControllerParams) -> Self {
        let demand = retailer.incoming_orders();
        Self {
            series: forecast_series(&demand, params),
            latest: forecast(&demand, params),
        }
    }
}
