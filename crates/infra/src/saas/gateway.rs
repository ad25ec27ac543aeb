//! Form-store gateway
//!
//! Every business operation is a POST against one of four generic endpoints,
//! parameterized by numeric form id and authenticated with the session
//! cookie triple. Responses arrive in a `{success, data}` / `{error}`
//! envelope; both envelope shapes and transport failures are surfaced as
//! error values, never retried here.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use frostlink_core::{EntityRepository, FormStore};
use frostlink_domain::constants::{
    DATASOURCE_PATH, PAGE_QUERY_PATH, RECORD_FETCH_PATH, RECORD_UPDATE_PATH,
};
use frostlink_domain::{
    DatasourceRequest, FieldMap, FrostlinkError, PageRequest, PlatformConfig, QueryResult,
    RecordRequest, RemoteCallRecord, Result, UpdateRequest,
};
use reqwest::header::COOKIE;
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::errors::InfraError;
use crate::http::HttpClient;
use crate::saas::SessionManager;

/// Authenticated access to the remote form store.
pub struct FormGateway {
    http: HttpClient,
    session: Arc<SessionManager>,
    gateway_url: String,
    audit: Option<Arc<dyn EntityRepository>>,
}

impl FormGateway {
    pub fn new(session: Arc<SessionManager>, config: &PlatformConfig) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.http.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            session,
            gateway_url: config.gateway_url.trim_end_matches('/').to_owned(),
            audit: None,
        })
    }

    /// Record every completed remote call through the given repository.
    /// Audit failures are logged and swallowed; they never fail the call.
    pub fn with_audit(mut self, audit: Arc<dyn EntityRepository>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Authenticate, POST `body` to `path` and unwrap the response envelope.
    /// Returns the envelope's `data` member, if any.
    async fn post_envelope(&self, path: &str, body: &Value) -> Result<Option<Value>> {
        let cookie = self.session.auth_cookie().await?;
        let url = format!("{}{}", self.gateway_url, path);

        let started = Instant::now();
        let result = self
            .http
            .send(self.http.request(Method::POST, &url).header(COOKIE, cookie).json(body))
            .await;
        let status = result.as_ref().map(|response| response.status().as_u16()).unwrap_or(0);
        self.audit_call(path, status, started.elapsed()).await;

        let response = result?;
        let status = response.status();
        if !status.is_success() {
            return Err(FrostlinkError::transport(format!("{path} answered HTTP {status}")));
        }

        let envelope: Envelope = response
            .json()
            .await
            .map_err(|err| FrostlinkError::from(InfraError::from(err)))?;

        if let Some(error) = envelope.error {
            return Err(FrostlinkError::remote(render_remote_error(&error)));
        }
        if envelope.success == Some(false) {
            return Err(FrostlinkError::remote(format!(
                "{path} reported an unsuccessful operation"
            )));
        }

        Ok(envelope.data)
    }

    async fn audit_call(&self, endpoint: &str, status: u16, elapsed: Duration) {
        let Some(repo) = &self.audit else { return };
        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        let record = RemoteCallRecord::new(endpoint, "POST", status, elapsed_ms);
        if let Err(err) = repo.record_remote_call(record).await {
            warn!(endpoint, error = %err, "failed to record remote call audit entry");
        }
    }
}

#[async_trait]
impl FormStore for FormGateway {
    async fn query_page(&self, request: PageRequest) -> Result<QueryResult> {
        let body = json!({
            "appName": request.app_name,
            "formId": request.form_id,
            "condition": request.condition,
            "columns": request.columns,
            "page": request.page,
            "pageSize": request.page_size,
            "filters": request.filters,
            "orderby": request.order_by,
        });
        let data = self.post_envelope(PAGE_QUERY_PATH, &body).await?;
        decode_page(data)
    }

    async fn fetch_record(&self, request: RecordRequest) -> Result<FieldMap> {
        let body = json!({
            "appName": request.app_name,
            "formId": request.form_id,
            "condition": request.condition,
            "id": request.id,
        });
        match self.post_envelope(RECORD_FETCH_PATH, &body).await? {
            Some(Value::Object(record)) => Ok(record),
            _ => Err(FrostlinkError::decode("record fetch returned no object payload")),
        }
    }

    async fn query_datasource(&self, request: DatasourceRequest) -> Result<QueryResult> {
        let body = json!({
            "appName": request.app_name,
            "formId": request.form_id,
            "datasourceId": request.datasource_id,
            "colId": request.col_id,
            "isNonfilter": true,
            "columns": request.columns,
            "condition": {},
            "filters": {},
            "page": request.page,
            "pageSize": request.page_size,
            "orderby": "",
        });
        let data = self.post_envelope(DATASOURCE_PATH, &body).await?;
        decode_page(data)
    }

    async fn update_record(&self, request: UpdateRequest) -> Result<()> {
        let body = json!({
            "appName": request.app_name,
            "formId": request.form_id,
            "condition": {},
            "action": 2,
            "id": request.id,
            "data": request.data,
        });
        self.post_envelope(RECORD_UPDATE_PATH, &body).await.map(|_| ())
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct PageData {
    #[serde(rename = "_count", default)]
    count: Option<u64>,
    #[serde(rename = "_sum", default)]
    sum: Option<HashMap<String, f64>>,
    #[serde(rename = "_dataList", default)]
    data_list: Option<Vec<FieldMap>>,
}

fn decode_page(data: Option<Value>) -> Result<QueryResult> {
    let data = match data {
        Some(value) if !value.is_null() => value,
        _ => return Ok(QueryResult::default()),
    };
    let page: PageData = serde_json::from_value(data)
        .map_err(|err| FrostlinkError::from(InfraError::from(err)))?;
    Ok(QueryResult {
        total_count: page.count.unwrap_or_default(),
        aggregates: page.sum.unwrap_or_default(),
        items: page.data_list.unwrap_or_default(),
    })
}

fn render_remote_error(error: &Value) -> String {
    match error {
        Value::String(message) => message.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn page_decode_reads_count_sum_and_rows() {
        let data = json!({
            "_count": 12,
            "_sum": {"rmbAmount": 340.5},
            "_dataList": [{"id": "1"}, {"id": "2"}],
        });
        let page = decode_page(Some(data)).unwrap();
        assert_eq!(page.total_count, 12);
        assert_eq!(page.aggregates["rmbAmount"], 340.5);
        assert_eq!(page.items.len(), 2);
    }

    #[test]
    fn missing_or_null_data_decodes_to_an_empty_page() {
        assert_eq!(decode_page(None).unwrap().total_count, 0);
        let page = decode_page(Some(Value::Null)).unwrap();
        assert!(page.items.is_empty());
    }

    #[test]
    fn null_members_inside_data_are_tolerated() {
        let data = json!({"_count": null, "_sum": null, "_dataList": null});
        let page = decode_page(Some(data)).unwrap();
        assert_eq!(page.total_count, 0);
        assert!(page.items.is_empty());
    }

    #[test]
    fn remote_error_rendering_prefers_plain_strings() {
        assert_eq!(render_remote_error(&json!("无权限")), "无权限");
        assert_eq!(render_remote_error(&json!({"code": 5})), r#"{"code":5}"#);
    }
}
