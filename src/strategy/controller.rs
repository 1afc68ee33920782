// src/strategy/controller.rs

//! The decision orchestrator: one order per role per call.
//!
//! Per role the pipeline is forecast -> pipeline estimate -> PID replay ->
//! stabilizer. In glass-box mode the forecast step is replaced by a single
//! shared forecast computed from retailer demand before the per-role fan-out.
//! Roles never read each other's results, so the order of evaluation is irrelevant.

use crate::error::ConfigError;
use crate::model::history::{RoleSeries, WeekRecord};
use crate::model::role::{Role, RoleMap};
use crate::strategy::forecast::{forecast, forecast_series, SharedForecast};
use crate::strategy::params::{ChainParams, ControllerParams, ForecastReplay};
use crate::strategy::pid::{control_law, replay, ControlTrace};
use crate::strategy::pipeline::estimate_series;
use crate::strategy::stabilizer::{stabilize, Stabilized};
use crate::strategy::traits::{Mode, OrderPolicy};
use tracing::debug;

/// Everything derived for one role during one call.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleDecision {
    pub role: Role,
    pub order: u32,
    /// No history: the cold-start order was returned without running the controller.
    pub cold_start: bool,
    /// Forecast fed to the control law (the shared one in glass-box mode).
    pub forecast: f64,
    pub last_placed: u32,
    pub raw_order: f64,
    pub stabilized: Stabilized,
    /// One entry per history week.
    pub trace: ControlTrace,
}

impl RoleDecision {
    fn cold_start(role: Role, params: &ControllerParams) -> Self {
        let order = params.initial_order;
        Self {
            role,
            order,
            cold_start: true,
            forecast: order as f64,
            last_placed: 0,
            raw_order: order as f64,
            stabilized: Stabilized {
                smoothed: order as f64,
                rate_limited: order as f64,
                order,
            },
            trace: ControlTrace::default(),
        }
    }
}

/// PID order controller with EWMA forecasting, pipeline reconstruction,
/// anti-windup and output stabilization, configured per role.
#[derive(Debug, Clone, Default)]
pub struct BullwhipController {
    params: ChainParams,
}

impl BullwhipController {
    /// Fails when `ChainParams::validate` rejects `params`. A built controller never panics in `decide`.
    pub fn new(params: ChainParams) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &ChainParams {
        &self.params
    }

    /// The forecast every role reads in glass-box mode, `None` in black-box mode.
    pub fn shared_forecast(&self, history: &[WeekRecord], mode: Mode) -> Option<SharedForecast> {
        match mode {
            Mode::BlackBox => None,
            Mode::GlassBox => {
                let retailer = RoleSeries::extract(Role::Retailer, history);
                Some(SharedForecast::from_retailer(
                    &retailer,
                    self.params.for_role(Role::Retailer),
                ))
            }
        }
    }

    /// Runs the full pipeline for one role.
    pub fn decide_role(&self, series: &RoleSeries, shared: Option<&SharedForecast>) -> RoleDecision {
        let role = series.role;
        let params = self.params.for_role(role);
        if series.is_empty() {
            return RoleDecision::cold_start(role, params);
        }

        let (latest, per_week) = match shared {
            Some(shared) => (shared.latest, shared.series.clone()),
            None => {
                let incoming = series.incoming_orders();
                (forecast(&incoming, params), forecast_series(&incoming, params))
            }
        };
        let per_week = match params.forecast_replay {
            ForecastReplay::AsOfWeek => per_week,
            ForecastReplay::Latest => vec![latest; series.len()],
        };

        let pipeline = estimate_series(series.weeks(), params);
        let trace = replay(series.weeks(), &per_week, &pipeline, params);
        let Some(last) = trace.last().copied() else {
            return RoleDecision::cold_start(role, params);
        };

        let last_placed = series.last_placed_order();
        let raw_order = control_law(latest, &last, params);
        let stabilized = stabilize(raw_order, last_placed, params);

        debug!(
            role = role.name(),
            forecast = latest,
            pipeline = last.pipeline,
            position = last.inventory_position,
            error = last.error,
            integral = last.integral,
            raw_order,
            order = stabilized.order,
            "role decision"
        );

        RoleDecision {
            role,
            order: stabilized.order,
            cold_start: false,
            forecast: latest,
            last_placed,
            raw_order,
            stabilized,
            trace,
        }
    }

    /// Full derived state for every role.
    pub fn explain(&self, history: &[WeekRecord], mode: Mode) -> RoleMap<RoleDecision> {
        let shared = self.shared_forecast(history, mode);
        RoleMap::from_fn(|role| {
            let series = RoleSeries::extract(role, history);
            self.decide_role(&series, shared.as_ref())
        })
    }
}

impl OrderPolicy for BullwhipController {
    fn decide(&self, history: &[WeekRecord], mode: Mode) -> RoleMap<u32> {
        let decisions = self.explain(history, mode);
        decisions.map(|_, decision| decision.order)
    }

    fn label(&self) -> &'static str {
        "controller"
    }
}
