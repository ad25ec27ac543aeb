//! Local records exchanged across the storage boundary
//!
//! Persistence itself is an external collaborator; these are the only shapes
//! that cross the `EntityRepository` port.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Binding between a mobile-client user and a remote customer account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyBinding {
    pub id: String,
    /// Mobile-platform user identifier.
    pub open_id: String,
    /// Customer id in the remote form store.
    pub customer_id: String,
    pub company_code: String,
    pub company_name: String,
    /// Invite code the binding was established with.
    pub invite_code: String,
    pub bound_at: DateTime<Utc>,
}

/// Audit row for one completed remote call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteCallRecord {
    pub id: String,
    pub endpoint: String,
    pub method: String,
    pub status: u16,
    pub elapsed_ms: u64,
    pub called_at: DateTime<Utc>,
}

impl RemoteCallRecord {
    pub fn new(endpoint: impl Into<String>, method: impl Into<String>, status: u16, elapsed_ms: u64) -> Self {
        Self {
            id: Uuid::new_v4().simple().to_string(),
            endpoint: endpoint.into(),
            method: method.into(),
            status,
            elapsed_ms,
            called_at: Utc::now(),
        }
    }
}
