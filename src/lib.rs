//! Operator dashboard for a background automation agent.
//!
//! Tracks work items through a kanban lifecycle, logs the monetary cost of
//! external API calls, and reports agent liveness, all behind a single
//! shared credential with an optional TOTP second factor.

pub mod auth;
pub mod cli;
pub mod model;
pub mod opsboard;
pub mod store;
