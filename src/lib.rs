//! Order decisions for the four tiers of the beer distribution game.
//!
//! Each call is a pure function of the supplied week history: an EWMA demand
//! forecast, a reconstructed in-transit pipeline, a PID correction on
//! inventory-position error with a clamped integral, and a stabilizer that
//! smooths and rate-limits the result against the last order actually placed.

pub mod error;
pub mod io;
pub mod model;
pub mod simulation;
pub mod strategy;
pub mod telemetry;

pub use error::{ConfigError, ReportError};
pub use io::protocol::{DecisionService, Identity, Method, Reply};
pub use model::history::{RoleObservation, WeekRecord};
pub use model::role::{Role, RoleMap};
pub use strategy::controller::{BullwhipController, RoleDecision};
pub use strategy::params::{ChainParams, ControllerParams, ForecastReplay, PipelineMode};
pub use strategy::traits::{Mode, OrderPolicy};
