//! Generic query types for the remote form store
//!
//! The remote schema varies per form id, so query results carry raw field
//! maps; callers convert to strong types at the point of consumption.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw record as returned by the form store.
pub type FieldMap = serde_json::Map<String, Value>;

/// One paged/filtered query against a named form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRequest {
    pub app_name: String,
    pub form_id: i64,
    /// Server-side query condition, passed through verbatim.
    pub condition: Value,
    pub columns: Vec<String>,
    /// 0-based page index.
    pub page: u32,
    pub page_size: u32,
    /// Server-side filters, passed through verbatim.
    pub filters: Value,
    pub order_by: String,
}

impl PageRequest {
    pub fn new(app_name: impl Into<String>, form_id: i64) -> Self {
        Self {
            app_name: app_name.into(),
            form_id,
            condition: Value::Object(FieldMap::new()),
            columns: Vec::new(),
            page: 0,
            page_size: 20,
            filters: Value::Object(FieldMap::new()),
            order_by: String::new(),
        }
    }
}

/// Fetch of a single record by remote id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordRequest {
    pub app_name: String,
    pub form_id: i64,
    pub condition: Value,
    pub id: String,
}

/// Lookup-set query against a column datasource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasourceRequest {
    pub app_name: String,
    pub form_id: i64,
    pub datasource_id: i64,
    pub col_id: i64,
    pub columns: Vec<String>,
    pub page: u32,
    pub page_size: u32,
}

/// Generic record mutation (the platform's `action: 2` update).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRequest {
    pub app_name: String,
    pub form_id: i64,
    pub id: String,
    /// Field name → new value, passed through verbatim.
    pub data: FieldMap,
}

/// One page of raw results plus server-computed aggregates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryResult {
    pub total_count: u64,
    /// Server-side sums keyed by column name; absent columns are omitted.
    pub aggregates: HashMap<String, f64>,
    pub items: Vec<FieldMap>,
}
