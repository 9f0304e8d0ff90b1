//! Shared domain types and configuration for Bursar.
//!
//! This crate provides the vocabulary used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Principals, roles, and categories
//! - Record kind and status enumerations
//! - Configuration management

pub mod config;
pub mod types;

pub use config::EngineConfig;
