// src/strategy/traits.rs

use crate::model::history::WeekRecord;
use crate::model::role::RoleMap;
use serde::Serialize;
use std::fmt::{self, Debug};

/// How much of the chain each role's forecast is allowed to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Every role forecasts from its own incoming orders.
    #[default]
    BlackBox,
    /// One forecast built from end-customer demand is shared by every role.
    GlassBox,
}

impl Mode {
    /// Reads the `mode` request field. Absent or unrecognised values mean black-box.
    pub fn from_wire(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("glassbox") => Mode::GlassBox,
            _ => Mode::BlackBox,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::BlackBox => "blackbox",
            Mode::GlassBox => "glassbox",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decides the next order for every tier from the full observed history.
///
/// Implementations must be pure: the same history and mode always give the
/// same orders, and nothing is carried from one call to the next.
/// `Send + Sync` so a single policy can serve overlapping calls.
pub trait OrderPolicy: Debug + Send + Sync {
    fn decide(&self, history: &[WeekRecord], mode: Mode) -> RoleMap<u32>;

    /// Short label for logs and reports.
    fn label(&self) -> &'static str;
}
