// src/strategy/pid.rs

//! Feedback control on inventory-position error.
//!
//! The controller keeps no memory between calls. Its integral and derivative
//! state is rebuilt by folding over the supplied history from week 0, so the
//! same history always yields the same correction.

use crate::model::history::RoleWeek;
use crate::strategy::params::ControllerParams;

/// Accumulator threaded through the replay.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControlState {
    pub integral: f64,
    pub previous_error: f64,
}

/// Derived quantities for one replayed week.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WeekControl {
    pub forecast: f64,
    pub pipeline: f64,
    pub inventory_position: f64,
    pub target: f64,
    pub error: f64,
    pub integral: f64,
    pub derivative: f64,
}

impl ControlState {
    /// Advances the state by one week and reports what was derived.
    ///
    /// The integral is clamped to `[-integral_clamp, integral_clamp]` on every step.
    pub fn step(
        self,
        week: &RoleWeek,
        forecast: f64,
        pipeline: f64,
        params: &ControllerParams,
    ) -> (ControlState, WeekControl) {
        let obs = &week.observation;
        let inventory_position = obs.inventory as f64 - obs.backlog as f64 + pipeline;
        let target = params.target_position(forecast);
        let error = target - inventory_position;
        let bound = params.integral_clamp;
        let integral = (self.integral + error).clamp(-bound, bound);
        let derivative = error - self.previous_error;

        let next = ControlState {
            integral,
            previous_error: error,
        };
        let derived = WeekControl {
            forecast,
            pipeline,
            inventory_position,
            target,
            error,
            integral,
            derivative,
        };
        (next, derived)
    }
}

/// Per-week control quantities for a whole history, oldest first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ControlTrace {
    pub weeks: Vec<WeekControl>,
}

impl ControlTrace {
    pub fn last(&self) -> Option<&WeekControl> {
        self.weeks.last()
    }

    pub fn len(&self) -> usize {
        self.weeks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }
}

/// Replays the history from the zero state.
///
/// `forecasts` and `pipeline` carry the value to use for each week and must
/// be as long as `weeks`; extra entries on either side are ignored.
pub fn replay(
    weeks: &[RoleWeek],
    forecasts: &[f64],
    pipeline: &[f64],
    params: &ControllerParams,
) -> ControlTrace {
    let steps = weeks.iter().zip(forecasts).zip(pipeline);
    let (_, derived) = steps.fold(
        (ControlState::default(), Vec::with_capacity(weeks.len())),
        |(state, mut derived), ((week, &forecast), &pipe)| {
            let (next, week_control) = state.step(week, forecast, pipe, params);
            tracing::trace!(
                forecast,
                error = week_control.error,
                integral = week_control.integral,
                "replayed week"
            );
            derived.push(week_control);
            (next, derived)
        },
    );
    ControlTrace { weeks: derived }
}

/// Raw controller output before stabilization:
/// `forecast + kp * error + ki * integral + kd * derivative`.
pub fn control_law(forecast: f64, last: &WeekControl, params: &ControllerParams) -> f64 {
    forecast + params.kp * last.error + params.ki * last.integral + params.kd * last.derivative
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::history::RoleObservation;

    fn week(inventory: u32, backlog: u32) -> RoleWeek {
        RoleWeek {
            observation: RoleObservation {
                inventory,
                backlog,
                ..RoleObservation::default()
            },
            placed_order: 0,
        }
    }

    #[test]
    fn first_step_starts_from_zero_state() {
        let params = ControllerParams::default();
        let (state, derived) = ControlState::default().step(&week(30, 0), 20.0, 0.0, &params);

        assert_eq!(derived.target, 50.0);
        assert_eq!(derived.error, 20.0);
        assert_eq!(derived.integral, 20.0);
        assert_eq!(derived.derivative, 20.0);
        assert_eq!(state.previous_error, 20.0);
    }

    #[test]
    fn backlog_counts_against_position() {
        let params = ControllerParams::default();
        let (_, derived) = ControlState::default().step(&week(10, 25), 20.0, 5.0, &params);
        assert_eq!(derived.inventory_position, -10.0);
    }

    #[test]
    fn integral_is_clamped_every_week() {
        let params = ControllerParams {
            integral_clamp: 50.0,
            ..ControllerParams::default()
        };
        let weeks = vec![week(0, 200); 40];
        let trace = replay(&weeks, &[20.0; 40], &[0.0; 40], &params);

        assert_eq!(trace.len(), 40);
        assert!(trace.weeks.iter().all(|w| w.integral.abs() <= 50.0));
        assert_eq!(trace.last().unwrap().integral, 50.0);
    }

    #[test]
    fn integral_unwinds_immediately_after_reversal() {
        let params = ControllerParams {
            integral_clamp: 50.0,
            ..ControllerParams::default()
        };
        // 10 weeks short by 100, then one week long by 30.
        let mut weeks = vec![week(0, 50); 10];
        weeks.push(week(80, 0));
        let trace = replay(&weeks, &[20.0; 11], &[0.0; 11], &params);

        assert_eq!(trace.last().unwrap().error, -30.0);
        assert_eq!(trace.last().unwrap().integral, 20.0);
    }

    #[test]
    fn control_law_sums_terms() {
        let params = ControllerParams {
            kp: 0.5,
            ki: 0.1,
            kd: 0.2,
            ..ControllerParams::default()
        };
        let last = WeekControl {
            error: 10.0,
            integral: 30.0,
            derivative: -5.0,
            ..WeekControl::default()
        };
        // 20 + 5 + 3 - 1
        assert!((control_law(20.0, &last, &params) - 27.0).abs() < 1e-12);
    }
}
