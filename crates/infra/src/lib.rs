//! # Frostlink Infrastructure
//!
//! I/O implementations behind the `frostlink-core` ports:
//! - HTTP transport ([`http::HttpClient`])
//! - Remote session lifecycle ([`saas::SessionManager`])
//! - Form-store gateway ([`saas::FormGateway`], implements
//!   `frostlink_core::FormStore`)
//! - Configuration loading ([`config`])
//!
//! Everything here converts its external failure modes into
//! `frostlink_domain::FrostlinkError` at the boundary; no external error type
//! leaks upward.

pub mod config;
pub mod errors;
pub mod http;
pub mod saas;

pub use errors::InfraError;
pub use http::HttpClient;
pub use saas::{FormGateway, SessionManager};
