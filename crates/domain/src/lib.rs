//! # Frostlink Domain
//!
//! Business domain types and models for Frostlink.
//!
//! This crate contains:
//! - Domain data types (orders, deliveries, session state)
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Wire-protocol constants for the remote form store
//!
//! ## Architecture
//! - No dependencies on other Frostlink crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
