// src/model/role.rs

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::ops::{Index, IndexMut};

/// The four tiers of the chain, ordered downstream to upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Retailer,
    Wholesaler,
    Distributor,
    Factory,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::Retailer,
        Role::Wholesaler,
        Role::Distributor,
        Role::Factory,
    ];

    /// Name used on the wire and in reports.
    pub fn name(self) -> &'static str {
        match self {
            Role::Retailer => "retailer",
            Role::Wholesaler => "wholesaler",
            Role::Distributor => "distributor",
            Role::Factory => "factory",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// The tier this role orders from, `None` for the factory.
    pub fn upstream(self) -> Option<Role> {
        Role::ALL.get(self.index() + 1).copied()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value for every role, stored in a fixed slot per tier.
///
/// Serializes as a JSON object keyed by role name, in chain order.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(from = "RoleMapFields<T>")]
#[serde(bound(deserialize = "T: Deserialize<'de> + Default"))]
pub struct RoleMap<T>([T; 4]);

impl<T> RoleMap<T> {
    pub fn from_fn(mut f: impl FnMut(Role) -> T) -> Self {
        RoleMap(Role::ALL.map(&mut f))
    }

    pub fn get(&self, role: Role) -> &T {
        &self.0[role.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Role, &T)> {
        Role::ALL.into_iter().zip(self.0.iter())
    }

    pub fn map<U>(&self, mut f: impl FnMut(Role, &T) -> U) -> RoleMap<U> {
        RoleMap::from_fn(|role| f(role, &self.0[role.index()]))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.0.iter()
    }
}

impl<T: Clone> RoleMap<T> {
    pub fn splat(value: T) -> Self {
        RoleMap::from_fn(|_| value.clone())
    }
}

impl<T> Index<Role> for RoleMap<T> {
    type Output = T;

    fn index(&self, role: Role) -> &T {
        &self.0[role.index()]
    }
}

impl<T> IndexMut<Role> for RoleMap<T> {
    fn index_mut(&mut self, role: Role) -> &mut T {
        &mut self.0[role.index()]
    }
}

impl<T: Serialize> Serialize for RoleMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Role::ALL.len()))?;
        for (role, value) in self.iter() {
            map.serialize_entry(role.name(), value)?;
        }
        map.end()
    }
}

// Deserialization helper: any role left out of the object takes its default.
#[derive(Deserialize)]
#[serde(default)]
#[serde(bound(deserialize = "T: Deserialize<'de> + Default"))]
struct RoleMapFields<T> {
    retailer: T,
    wholesaler: T,
    distributor: T,
    factory: T,
}

impl<T: Default> Default for RoleMapFields<T> {
    fn default() -> Self {
        Self {
            retailer: T::default(),
            wholesaler: T::default(),
            distributor: T::default(),
            factory: T::default(),
        }
    }
}

impl<T> From<RoleMapFields<T>> for RoleMap<T> {
    fn from(fields: RoleMapFields<T>) -> Self {
        RoleMap([
            fields.retailer,
            fields.wholesaler,
            fields.distributor,
            fields.factory,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_walks_the_chain() {
        assert_eq!(Role::Retailer.upstream(), Some(Role::Wholesaler));
        assert_eq!(Role::Distributor.upstream(), Some(Role::Factory));
        assert_eq!(Role::Factory.upstream(), None);
    }

    #[test]
    fn role_map_serializes_in_chain_order() {
        let orders = RoleMap::from_fn(|role| role.index() as u32 * 10);
        let json = serde_json::to_string(&orders).unwrap();
        assert_eq!(
            json,
            r#"{"retailer":0,"wholesaler":10,"distributor":20,"factory":30}"#
        );
    }

    #[test]
    fn role_map_fills_missing_roles_with_default() {
        let parsed: RoleMap<u32> = serde_json::from_str(r#"{"factory": 7}"#).unwrap();
        assert_eq!(parsed[Role::Factory], 7);
        assert_eq!(parsed[Role::Retailer], 0);
    }
}
