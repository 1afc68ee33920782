// src/model/history.rs

use crate::model::role::{Role, RoleMap};
use serde::Serialize;

/// What one role reported at the end of one week. All counts are whole units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RoleObservation {
    pub inventory: u32,
    pub backlog: u32,
    pub incoming_orders: u32,
    pub arriving_shipments: u32,
}

/// One week of the game as supplied by the caller.
///
/// `orders` holds the quantity each role actually placed that week; a role
/// with no recorded order counts as having ordered 0.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct WeekRecord {
    pub week: u32,
    pub roles: RoleMap<RoleObservation>,
    pub orders: RoleMap<u32>,
}

impl WeekRecord {
    pub fn new(week: u32, roles: RoleMap<RoleObservation>, orders: RoleMap<u32>) -> Self {
        Self {
            week,
            roles,
            orders,
        }
    }
}

/// One week of history seen from a single role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoleWeek {
    pub observation: RoleObservation,
    pub placed_order: u32,
}

/// The per-role view of a history, oldest week first.
///
/// Always has exactly one entry per `WeekRecord` it was extracted from.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleSeries {
    pub role: Role,
    weeks: Vec<RoleWeek>,
}

impl RoleSeries {
    /// Slices one role out of the full chain history.
    pub fn extract(role: Role, history: &[WeekRecord]) -> Self {
        let weeks = history
            .iter()
            .map(|record| RoleWeek {
                observation: record.roles[role],
                placed_order: record.orders[role],
            })
            .collect();
        Self { role, weeks }
    }

    pub fn len(&self) -> usize {
        self.weeks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }

    pub fn weeks(&self) -> &[RoleWeek] {
        &self.weeks
    }

    pub fn latest(&self) -> Option<&RoleWeek> {
        self.weeks.last()
    }

    /// The order placed in the most recent week, 0 if there is none.
    pub fn last_placed_order(&self) -> u32 {
        self.latest().map_or(0, |week| week.placed_order)
    }

    pub fn incoming_orders(&self) -> Vec<u32> {
        self.weeks
            .iter()
            .map(|week| week.observation.incoming_orders)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn week(n: u32, incoming: u32, order: u32) -> WeekRecord {
        let mut roles = RoleMap::<RoleObservation>::default();
        roles[Role::Wholesaler].incoming_orders = incoming;
        let mut orders = RoleMap::<u32>::default();
        orders[Role::Wholesaler] = order;
        WeekRecord::new(n, roles, orders)
    }

    #[test]
    fn extract_keeps_one_entry_per_week() {
        let history = vec![week(1, 4, 5), week(2, 8, 6), week(3, 8, 7)];
        let series = RoleSeries::extract(Role::Wholesaler, &history);

        assert_eq!(series.len(), history.len());
        assert_eq!(series.incoming_orders(), vec![4, 8, 8]);
        assert_eq!(series.last_placed_order(), 7);
    }

    #[test]
    fn other_roles_see_zeroes() {
        let history = vec![week(1, 4, 5)];
        let series = RoleSeries::extract(Role::Factory, &history);

        assert_eq!(series.incoming_orders(), vec![0]);
        assert_eq!(series.last_placed_order(), 0);
    }

    #[test]
    fn empty_history_has_no_last_order() {
        let series = RoleSeries::extract(Role::Retailer, &[]);
        assert!(series.is_empty());
        assert_eq!(series.last_placed_order(), 0);
    }
}
