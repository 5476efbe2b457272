//! Persisted dashboard records and their mutation rules.
//!
//! Field names are camelCase on the wire and on disk, matching the JSON the
//! dashboard has always stored.

pub mod costs;
pub mod status;
pub mod tasks;

pub use costs::{CostEntry, CostLedger, NewCost};
pub use status::{AgentStatus, StatusPatch};
pub use tasks::{NewTask, TaskColumn, TaskPatch, TaskPriority, TaskRecord};
