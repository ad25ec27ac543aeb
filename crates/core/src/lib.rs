//! # Frostlink Core
//!
//! Port traits and business logic of the integration core.
//!
//! This crate contains:
//! - `FormStore` / `EntityRepository` port traits
//! - The reconciliation engine joining sales orders to delivery orders
//!
//! ## Architecture
//! - Depends on `frostlink-domain` only
//! - No I/O; network and storage arrive through the port traits
//! - Implementations live in `frostlink-infra` (and, for storage, outside
//!   this workspace)

pub mod ports;
pub mod reconciliation;

pub use ports::{EntityRepository, FormStore};
pub use reconciliation::engine::ReconciliationEngine;
