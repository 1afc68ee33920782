// src/model/agent.rs

use crate::model::history::RoleObservation;
use crate::model::role::Role;

/// Physical state of one tier inside the simulation harness.
///
/// The decision logic never touches this type: it only sees the
/// `RoleObservation` each agent reports at the end of the week.
#[derive(Debug, Clone)]
pub struct SupplyChainAgent {
    pub role: Role,

    pub inventory: u32,
    pub backlog: u32,

    // This week's flows
    pub incoming_orders: u32,
    pub arriving_shipments: u32,
    pub shipped: u32,
    pub order_placed: u32,
}

impl SupplyChainAgent {
    pub fn new(role: Role, initial_inventory: u32) -> Self {
        Self {
            role,
            inventory: initial_inventory,
            backlog: 0,
            incoming_orders: 0,
            arriving_shipments: 0,
            shipped: 0,
            order_placed: 0,
        }
    }

    /// Goods from upstream land in inventory.
    pub fn receive_shipment(&mut self, quantity: u32) {
        self.inventory += quantity;
        self.arriving_shipments = quantity;
    }

    /// Fills the new order plus any backlog from stock and returns the quantity
    /// shipped downstream. Whatever cannot be filled stays on the backlog.
    pub fn fulfil(&mut self, incoming_order: u32) -> u32 {
        self.incoming_orders = incoming_order;
        let owed = incoming_order + self.backlog;
        let shipped = owed.min(self.inventory);

        self.inventory -= shipped;
        self.backlog = owed - shipped;
        self.shipped = shipped;
        shipped
    }

    pub fn place_order(&mut self, quantity: u32) -> u32 {
        self.order_placed = quantity;
        quantity
    }

    /// End-of-week report handed to the decision logic.
    pub fn observe(&self) -> RoleObservation {
        RoleObservation {
            inventory: self.inventory,
            backlog: self.backlog,
            incoming_orders: self.incoming_orders,
            arriving_shipments: self.arriving_shipments,
        }
    }

    /// Standard beer-game costs: 0.50 per unit held, 1.00 per unit backlogged.
    pub fn weekly_cost(&self, holding_cost: f64, backlog_cost: f64) -> f64 {
        self.inventory as f64 * holding_cost + self.backlog as f64 * backlog_cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortfall_goes_to_backlog() {
        let mut agent = SupplyChainAgent::new(Role::Retailer, 5);
        let shipped = agent.fulfil(8);

        assert_eq!(shipped, 5);
        assert_eq!(agent.inventory, 0);
        assert_eq!(agent.backlog, 3);
    }

    #[test]
    fn backlog_is_served_before_stock_accumulates() {
        let mut agent = SupplyChainAgent::new(Role::Wholesaler, 0);
        agent.fulfil(4);
        agent.receive_shipment(10);
        let shipped = agent.fulfil(2);

        assert_eq!(shipped, 6);
        assert_eq!(agent.inventory, 4);
        assert_eq!(agent.backlog, 0);
        assert_eq!(agent.observe().arriving_shipments, 10);
    }

    #[test]
    fn cost_weights_backlog_double() {
        let mut agent = SupplyChainAgent::new(Role::Factory, 0);
        agent.inventory = 4;
        agent.backlog = 3;
        assert!((agent.weekly_cost(0.5, 1.0) - 5.0).abs() < 1e-9);
    }
}
