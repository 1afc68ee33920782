// src/strategy/baseline.rs

use crate::model::history::{RoleSeries, WeekRecord};
use crate::model::role::RoleMap;
use crate::strategy::traits::{Mode, OrderPolicy};

/// The "panic" strategy: every role re-orders exactly what was just ordered from it.
///
/// Ignores inventory, backlog and the mode flag. It is the textbook way to
/// produce a bullwhip and serves as the comparison point in simulations.
#[derive(Debug, Clone)]
pub struct NaivePolicy {
    initial_order: u32,
}

impl NaivePolicy {
    pub fn new(initial_order: u32) -> Self {
        Self { initial_order }
    }
}

impl OrderPolicy for NaivePolicy {
    fn decide(&self, history: &[WeekRecord], _mode: Mode) -> RoleMap<u32> {
        RoleMap::from_fn(|role| {
            RoleSeries::extract(role, history)
                .latest()
                .map_or(self.initial_order, |week| week.observation.incoming_orders)
        })
    }

    fn label(&self) -> &'static str {
        "naive"
    }
}
