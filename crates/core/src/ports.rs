//! Port interfaces implemented outside this crate

use async_trait::async_trait;
use frostlink_domain::{
    CompanyBinding, DatasourceRequest, FieldMap, PageRequest, QueryResult, RecordRequest,
    RemoteCallRecord, Result, UpdateRequest,
};

/// Generic, authenticated access to the remote form store.
///
/// Every entity type is addressed by an opaque numeric form id; the store is
/// deliberately schema-agnostic and returns raw field maps. Implementations
/// must not retry and must surface every expected failure as an error value.
#[async_trait]
pub trait FormStore: Send + Sync {
    /// Execute one paged/filtered query against a named form.
    async fn query_page(&self, request: PageRequest) -> Result<QueryResult>;

    /// Fetch a single record by remote id.
    async fn fetch_record(&self, request: RecordRequest) -> Result<FieldMap>;

    /// Query a column datasource (small lookup sets).
    async fn query_datasource(&self, request: DatasourceRequest) -> Result<QueryResult>;

    /// Apply a field update to one record.
    async fn update_record(&self, request: UpdateRequest) -> Result<()>;
}

/// Durable storage for local user/binding/audit records.
///
/// Persistence is an external collaborator; the core only names the three
/// operations it needs from it.
#[async_trait]
pub trait EntityRepository: Send + Sync {
    /// Look up the company binding of a mobile-platform user.
    async fn find_binding(&self, open_id: &str) -> Result<Option<CompanyBinding>>;

    /// Store a newly established binding.
    async fn insert_binding(&self, binding: CompanyBinding) -> Result<()>;

    /// Record a completed remote call for auditing.
    async fn record_remote_call(&self, record: RemoteCallRecord) -> Result<()>;
}
