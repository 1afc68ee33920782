// src/io/normalize.rs

//! Lenient decoding of caller-supplied history.
//!
//! Nothing in here can fail: any field that is missing, malformed or negative
//! becomes 0 so the controller always works on well-formed counts.

use crate::model::history::{RoleObservation, WeekRecord};
use crate::model::role::{Role, RoleMap};
use serde_json::Value;

/// Coerces any JSON value to a non-negative whole count.
///
/// Numbers are rounded, strings are parsed as base-10 integers after trimming,
/// everything else is 0. Negative results clamp to 0 and huge ones saturate.
/// String parsing is strict: the whole string must be an integer, so `"4.5"`
/// and `"12abc"` are 0 rather than a parsed prefix.
pub fn to_count(value: Option<&Value>) -> u32 {
    let raw = match value {
        Some(Value::Number(number)) => number
            .as_i64()
            .map(|n| n as f64)
            .or_else(|| number.as_f64())
            .unwrap_or(0.0),
        Some(Value::String(text)) => text.trim().parse::<i64>().map_or(0.0, |n| n as f64),
        _ => 0.0,
    };
    if !raw.is_finite() {
        return 0;
    }
    // `as` saturates at the u32 bounds, which also maps every negative to 0.
    raw.round() as u32
}

fn field(object: Option<&Value>, key: &str) -> u32 {
    to_count(object.and_then(|value| value.get(key)))
}

/// Reads one role's block; a missing or non-object block is an all-zero observation.
pub fn observation(block: Option<&Value>) -> RoleObservation {
    let block = block.filter(|value| value.is_object());
    RoleObservation {
        inventory: field(block, "inventory"),
        backlog: field(block, "backlog"),
        incoming_orders: field(block, "incoming_orders"),
        arriving_shipments: field(block, "arriving_shipments"),
    }
}

/// Decodes one entry of the `weeks` array.
pub fn week_record(raw: &Value) -> WeekRecord {
    let roles = raw.get("roles");
    let orders = raw.get("orders");
    WeekRecord {
        week: field(Some(raw), "week"),
        roles: RoleMap::from_fn(|role: Role| observation(roles.and_then(|r| r.get(role.name())))),
        orders: RoleMap::from_fn(|role: Role| field(orders, role.name())),
    }
}

/// Decodes the `weeks` field of a request. Anything other than an array is an empty history.
pub fn history(raw: Option<&Value>) -> Vec<WeekRecord> {
    raw.and_then(Value::as_array)
        .map(|weeks| weeks.iter().map(week_record).collect())
        .unwrap_or_default()
}
