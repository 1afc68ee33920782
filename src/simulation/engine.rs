// src/simulation/engine.rs

//! Closed-loop beer game used to exercise an `OrderPolicy`.
//!
//! The policy only ever sees the `WeekRecord` history the engine accumulates,
//! exactly as a remote caller would send it.

use crate::model::agent::SupplyChainAgent;
use crate::model::history::WeekRecord;
use crate::model::queues::TransitLane;
use crate::model::role::{Role, RoleMap};
use crate::simulation::config::SimulationConfig;
use crate::strategy::traits::OrderPolicy;
use serde::Serialize;
use tracing::info;

// One row per role per week, written straight to CSV.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryRecord {
    pub week: usize,
    pub role: String,
    pub inventory: u32,
    pub backlog: u32,
    pub incoming_orders: u32,
    pub arriving_shipments: u32,
    pub order_placed: u32,
    pub shipped: u32,
    pub cost: f64,
}

pub struct ChainSimulation {
    config: SimulationConfig,
    policy: Box<dyn OrderPolicy>,

    pub agents: RoleMap<SupplyChainAgent>,

    // Lane `i` links `Role::ALL[i]` with the tier above it.
    // Orders flow upstream, shipments flow downstream.
    order_lanes: Vec<TransitLane>,
    shipment_lanes: Vec<TransitLane>,
    // Factory production delay.
    production: TransitLane,

    pub demand_schedule: Vec<u32>,
    pub current_week: usize,
    /// What the policy is shown, oldest week first.
    pub weeks: Vec<WeekRecord>,
    pub history: Vec<HistoryRecord>,
    next_orders: RoleMap<u32>,
}

impl ChainSimulation {
    pub fn new(
        config: SimulationConfig,
        demand_schedule: Vec<u32>,
        policy: Box<dyn OrderPolicy>,
    ) -> Self {
        let agents =
            RoleMap::from_fn(|role| SupplyChainAgent::new(role, config.initial_inventory));
        let order_lanes = (0..3)
            .map(|_| TransitLane::new(config.order_delay, config.initial_flow))
            .collect();
        let shipment_lanes = (0..3)
            .map(|_| TransitLane::new(config.shipment_delay, config.initial_flow))
            .collect();
        let production = TransitLane::new(config.shipment_delay, config.initial_flow);

        // Nothing has been observed yet, so the first orders are the policy's cold start.
        let next_orders = policy.decide(&[], config.mode);

        Self {
            config,
            policy,
            agents,
            order_lanes,
            shipment_lanes,
            production,
            demand_schedule,
            current_week: 1,
            weeks: Vec::new(),
            history: Vec::new(),
            next_orders,
        }
    }

    pub fn run(&mut self) {
        info!(
            policy = self.policy.label(),
            mode = %self.config.mode,
            weeks = self.config.max_weeks,
            "starting simulation"
        );
        while self.current_week <= self.config.max_weeks {
            self.step();
        }
    }

    fn step(&mut self) {
        let week = self.current_week;

        // Morning: orders and goods that left `delay` weeks ago arrive.
        let customer_demand = self.demand_schedule.get(week - 1).copied().unwrap_or(0);
        let incoming = RoleMap::from_fn(|role| match role {
            Role::Retailer => customer_demand,
            _ => self.order_lanes[role.index() - 1].pop_arrival(),
        });
        let arriving = RoleMap::from_fn(|role| match role {
            Role::Factory => self.production.pop_arrival(),
            _ => self.shipment_lanes[role.index()].pop_arrival(),
        });

        // Day: receive, then serve backlog plus new orders.
        let mut shipped = RoleMap::<u32>::default();
        for role in Role::ALL {
            let agent = &mut self.agents[role];
            agent.receive_shipment(arriving[role]);
            shipped[role] = agent.fulfil(incoming[role]);
        }

        // Evening: place the orders decided last week and send goods downstream.
        let orders = self.next_orders;
        for role in Role::ALL {
            let quantity = self.agents[role].place_order(orders[role]);
            match role {
                Role::Factory => self.production.push_departure(quantity),
                _ => self.order_lanes[role.index()].push_departure(quantity),
            }
            if let Some(upstream) = role.upstream() {
                self.shipment_lanes[role.index()].push_departure(shipped[upstream]);
            }
        }

        let observations = self.agents.map(|_, agent| agent.observe());
        self.weeks.push(WeekRecord::new(week as u32, observations, orders));
        self.next_orders = self.policy.decide(&self.weeks, self.config.mode);

        if self.config.log_every > 0 && week % self.config.log_every == 0 {
            let retailer = &self.agents[Role::Retailer];
            info!(
                week,
                demand = customer_demand,
                inventory = retailer.inventory,
                backlog = retailer.backlog,
                factory_order = orders[Role::Factory],
                "retailer status"
            );
        }
        self.record_history();
        self.current_week += 1;
    }

    fn record_history(&mut self) {
        for (role, agent) in self.agents.iter() {
            self.history.push(HistoryRecord {
                week: self.current_week,
                role: role.name().to_string(),
                inventory: agent.inventory,
                backlog: agent.backlog,
                incoming_orders: agent.incoming_orders,
                arriving_shipments: agent.arriving_shipments,
                order_placed: agent.order_placed,
                shipped: agent.shipped,
                cost: agent.weekly_cost(self.config.holding_cost, self.config.backlog_cost),
            });
        }
    }

    fn records_for(&self, role: Role) -> impl Iterator<Item = &HistoryRecord> + '_ {
        self.history
            .iter()
            .filter(move |record| record.role == role.name())
    }

    /// Holding plus backlog cost per role over the whole run.
    pub fn cost_breakdown(&self) -> RoleMap<f64> {
        RoleMap::from_fn(|role| self.records_for(role).map(|record| record.cost).sum())
    }

    pub fn total_supply_chain_cost(&self) -> f64 {
        self.history.iter().map(|record| record.cost).sum()
    }

    /// Variance of each role's placed orders over the variance of customer demand.
    ///
    /// Above 1 means the role amplifies demand swings. `None` when demand never varied.
    pub fn bullwhip_ratios(&self) -> RoleMap<Option<f64>> {
        let weeks = self.current_week.saturating_sub(1);
        let demand: Vec<f64> = (0..weeks)
            .map(|w| self.demand_schedule.get(w).copied().unwrap_or(0) as f64)
            .collect();
        let demand_variance = variance(&demand);

        RoleMap::from_fn(|role| {
            if demand_variance <= f64::EPSILON {
                return None;
            }
            let orders: Vec<f64> = self
                .records_for(role)
                .map(|record| record.order_placed as f64)
                .collect();
            Some(variance(&orders) / demand_variance)
        })
    }
}

/// Population variance, 0 for fewer than two samples.
pub fn variance(samples: &[f64]) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n
}
