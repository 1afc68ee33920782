// src/strategy/stabilizer.rs

use crate::strategy::params::ControllerParams;

/// The stages an order passes through on its way out of the stabilizer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Stabilized {
    pub smoothed: f64,
    pub rate_limited: f64,
    pub order: u32,
}

/// Damps the raw controller output against the order actually placed last week.
///
/// 1. blend: `s * raw + (1 - s) * last_placed`
/// 2. rate limit to `[last_placed - max_step_down, last_placed + max_step_up]`
/// 3. bound to `[0, max_order]` and round to whole units
pub fn stabilize(raw_order: f64, last_placed: u32, params: &ControllerParams) -> Stabilized {
    let last = last_placed as f64;
    let s = params.output_smoothing;

    // A non-finite raw order carries no information; hold the last order.
    let raw = if raw_order.is_finite() { raw_order } else { last };
    let smoothed = s * raw + (1.0 - s) * last;

    let floor = last - params.max_step_down as f64;
    let ceiling = last + params.max_step_up as f64;
    let rate_limited = smoothed.clamp(floor, ceiling);

    let bounded = rate_limited.clamp(0.0, params.max_order as f64);
    Stabilized {
        smoothed,
        rate_limited,
        order: bounded.round() as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steady_input_passes_through() {
        let params = ControllerParams::default();
        assert_eq!(stabilize(20.0, 20, &params).order, 20);
    }

    #[test]
    fn smoothing_anchors_to_last_order() {
        let params = ControllerParams {
            output_smoothing: 0.5,
            ..ControllerParams::default()
        };
        // 0.5 * 30 + 0.5 * 20 = 25, inside the step limits.
        let out = stabilize(30.0, 20, &params);
        assert_eq!(out.smoothed, 25.0);
        assert_eq!(out.order, 25);
    }

    #[test]
    fn upward_step_is_limited() {
        let params = ControllerParams::default();
        let out = stabilize(1_000.0, 20, &params);
        assert_eq!(out.order, 20 + params.max_step_up);
    }

    #[test]
    fn downward_step_is_limited_separately() {
        let params = ControllerParams::default();
        let out = stabilize(-1_000.0, 40, &params);
        assert_eq!(out.order, 40 - params.max_step_down);
    }

    #[test]
    fn never_negative_never_above_ceiling() {
        let params = ControllerParams {
            max_order: 25,
            ..ControllerParams::default()
        };
        assert_eq!(stabilize(-50.0, 3, &params).order, 0);
        assert_eq!(stabilize(500.0, 24, &params).order, 25);
    }

    #[test]
    fn nan_holds_last_order() {
        let params = ControllerParams::default();
        assert_eq!(stabilize(f64::NAN, 17, &params).order, 17);
    }
}
