//! Remote platform access
//!
//! Session lifecycle ([`SessionManager`]) and the form-store gateway
//! ([`FormGateway`]) that every business query goes through.

pub mod cookies;
mod gateway;
mod session;

pub use gateway::FormGateway;
pub use session::SessionManager;
