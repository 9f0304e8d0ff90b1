//! Core business logic for Bursar.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. Storage, identity resolution, and category administration
//! are external collaborators behind the traits in [`store`].
//!
//! # Modules
//!
//! - `store` - Collaborator traits (record store, identity, categories)
//! - `uow` - Reentrant unit-of-work demarcation
//! - `record` - The financial record entity and its validation rules
//! - `limits` - Per-principal, per-kind spending ceilings
//! - `authz` - The authorization policy table
//! - `workflow` - Approval policy, status transitions, and the engine
//! - `stats` - Aggregation and anomaly detection

pub mod authz;
pub mod limits;
pub mod record;
pub mod stats;
pub mod store;
pub mod uow;
pub mod workflow;
