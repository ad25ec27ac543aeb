//! Reconciliation of sales orders against delivery orders
//!
//! The remote platform paginates sales orders and delivery orders as two
//! independent collections, linked only through a denormalized comma-encoded
//! cross-reference field. This module joins them and derives the shipment
//! views the remote API cannot answer directly.

pub mod engine;
pub mod shipment;

pub use engine::ReconciliationEngine;
pub use shipment::{build_code_index, classify_shipment, normalize_attachment, shipped_rate};
