// src/simulation/config.rs

use crate::strategy::traits::Mode;

#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub max_weeks: usize,
    pub order_delay: usize,
    pub shipment_delay: usize,
    pub initial_inventory: u32,
    /// Weekly flow the lanes are primed with, so week 1 is already in equilibrium.
    pub initial_flow: u32,
    pub holding_cost: f64,
    pub backlog_cost: f64,
    pub mode: Mode,
    /// Weeks between progress log lines.
    pub log_every: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_weeks: 36,
            order_delay: 2,
            shipment_delay: 2,
            initial_inventory: 12,
            initial_flow: 4,
            holding_cost: 0.5,
            backlog_cost: 1.0,
            mode: Mode::BlackBox,
            log_every: 5,
        }
    }
}
