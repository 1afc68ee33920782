// src/strategy/params.rs

//! Tuning for the order controller.
//!
//! Every knob the controller has lives here as data. Variants of the policy
//! (clamped or signed pipeline, causal or retroactive integral replay, with or
//! without a derivative term) are picked by setting fields, never by swapping code.

use crate::error::ConfigError;
use crate::model::role::{Role, RoleMap};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// How a negative pipeline estimate is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineMode {
    /// Negative estimates are measurement noise and read as 0.
    #[default]
    Clamped,
    /// Keep the sign; an apparent surplus in transit lowers the order.
    Signed,
}

/// Which forecast the replayed history is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastReplay {
    /// Week `i` uses the forecast built from weeks `0..=i` only.
    #[default]
    AsOfWeek,
    /// Every week uses today's forecast.
    Latest,
}

/// Fixed per-role configuration of the order controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerParams {
    /// Weeks between placing an order and receiving the goods.
    pub lead_time: u32,
    /// Weeks summed by the pipeline estimate. Defaults to `lead_time`.
    pub pipeline_window: Option<u32>,
    pub pipeline_mode: PipelineMode,

    pub safety_weeks: f64,
    pub safety_units: f64,

    /// EWMA weight of the newest observation, in (0, 1].
    pub forecast_lambda: f64,
    /// Only the newest `forecast_window` weeks feed the forecast.
    pub forecast_window: Option<usize>,
    pub forecast_replay: ForecastReplay,

    pub kp: f64,
    pub ki: f64,
    /// 0 disables the derivative term.
    pub kd: f64,
    /// The error integral never leaves `[-integral_clamp, integral_clamp]`.
    pub integral_clamp: f64,

    /// Weight of the fresh controller output against the last placed order, in (0, 1].
    pub output_smoothing: f64,
    pub max_step_up: u32,
    pub max_step_down: u32,
    pub max_order: u32,

    /// Order placed when there is no history at all.
    pub initial_order: u32,
}

impl Default for ControllerParams {
    fn default() -> Self {
        Self {
            lead_time: 2,
            pipeline_window: None,
            pipeline_mode: PipelineMode::Clamped,
            safety_weeks: 0.0,
            safety_units: 10.0,
            forecast_lambda: 0.4,
            forecast_window: Some(12),
            forecast_replay: ForecastReplay::AsOfWeek,
            kp: 0.02,
            ki: 0.02,
            kd: 0.1,
            integral_clamp: 20.0,
            output_smoothing: 0.6,
            max_step_up: 12,
            max_step_down: 16,
            max_order: 500,
            initial_order: 10,
        }
    }
}

impl ControllerParams {
    pub fn pipeline_window(&self) -> usize {
        self.pipeline_window.unwrap_or(self.lead_time) as usize
    }

    /// Desired inventory position for a given demand forecast.
    pub fn target_position(&self, forecast: f64) -> f64 {
        forecast * (self.lead_time as f64 + self.safety_weeks) + self.safety_units
    }

    pub fn validate(&self, role: Role) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::Invalid { role, reason };

        let unit_interval = [
            ("forecast_lambda", self.forecast_lambda),
            ("output_smoothing", self.output_smoothing),
        ];
        for (name, value) in unit_interval {
            if !(value > 0.0 && value <= 1.0) {
                return Err(invalid(format!("{name} must be in (0, 1], got {value}")));
            }
        }

        let non_negative = [
            ("safety_weeks", self.safety_weeks),
            ("safety_units", self.safety_units),
            ("kp", self.kp),
            ("ki", self.ki),
            ("kd", self.kd),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(format!("{name} must be finite and >= 0, got {value}")));
            }
        }

        if !self.integral_clamp.is_finite() || self.integral_clamp <= 0.0 {
            return Err(invalid(format!(
                "integral_clamp must be finite and > 0, got {}",
                self.integral_clamp
            )));
        }
        if self.forecast_window == Some(0) {
            return Err(invalid("forecast_window must cover at least one week".into()));
        }
        if self.max_order == 0 {
            return Err(invalid("max_order must be > 0".into()));
        }
        if self.initial_order > self.max_order {
            return Err(invalid(format!(
                "initial_order {} exceeds max_order {}",
                self.initial_order, self.max_order
            )));
        }
        Ok(())
    }
}

/// The process-wide parameter set: exactly one `ControllerParams` per role.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainParams {
    pub roles: RoleMap<ControllerParams>,
}

impl ChainParams {
    /// Loads a JSON file of per-role overrides. Roles and fields left out keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let params: ChainParams =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (role, params) in self.roles.iter() {
            params.validate(role)?;
        }
        Ok(())
    }

    pub fn for_role(&self, role: Role) -> &ControllerParams {
        &self.roles[role]
    }
}
