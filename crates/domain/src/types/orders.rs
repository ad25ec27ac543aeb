//! Order, delivery and customer types
//!
//! Typed projections of the raw form-store records. Conversion is lenient for
//! descriptive fields and strict for identity fields: a record without its
//! remote id (or cross-reference code) is rejected as a validation error.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{FrostlinkError, Result};
use crate::types::query::FieldMap;

/// Derived shipment status of one sales order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShipmentStatus {
    None,
    Partial,
    Full,
}

/// Sales order header as projected from the sales-order form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesOrder {
    pub id: String,
    /// Human-readable order code; the cross-reference key deliveries point at.
    pub code: String,
    pub customer_id: String,
    pub customer_name: String,
    pub customer_order_code: String,
    pub rmb_amount: f64,
    pub date: Option<String>,
    pub delivery_date: Option<String>,
    pub status: Option<i64>,
    pub remark: Option<String>,
}

impl SalesOrder {
    /// Convert a raw record, rejecting rows without identity fields.
    pub fn from_record(record: &FieldMap) -> Result<Self> {
        let id = require_string(record, "id", "sales order")?;
        let code = require_string(record, "code", "sales order")?;
        Ok(Self {
            id,
            code,
            customer_id: string_field(record, "customerId").unwrap_or_default(),
            customer_name: string_field(record, "customerName").unwrap_or_default(),
            customer_order_code: string_field(record, "customerOrderCode").unwrap_or_default(),
            rmb_amount: number_field(record, "rmbAmount").unwrap_or(0.0),
            date: string_field(record, "date"),
            delivery_date: string_field(record, "deliveryDate"),
            status: integer_field(record, "status"),
            remark: string_field(record, "remark"),
        })
    }
}

/// Delivery (shipment) order as projected from the delivery form.
///
/// One delivery may jointly fulfil several sales orders; the remote encodes
/// that as a comma-joined code list, which is parsed here at ingestion and
/// never passed along raw.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryOrder {
    pub id: String,
    pub code: String,
    pub order_codes: Vec<String>,
    pub rmb_amount: f64,
    pub shipped: bool,
    pub logistics_company_id: Option<String>,
    pub tracking_code: Option<String>,
    pub ship_date: Option<String>,
    /// Raw attachment entries (`"<path>#<query>"`), normalized downstream.
    pub attachments: Vec<String>,
    /// Full raw projection, kept as detail fallback.
    pub raw: FieldMap,
}

impl DeliveryOrder {
    pub fn from_record(record: &FieldMap) -> Result<Self> {
        let id = require_string(record, "id", "delivery order")?;
        let code = require_string(record, "code", "delivery order")?;
        let order_codes = record
            .get("orderCodes")
            .and_then(Value::as_str)
            .map(split_order_codes)
            .unwrap_or_default();
        Ok(Self {
            id,
            code,
            order_codes,
            rmb_amount: number_field(record, "rmbAmount").unwrap_or(0.0),
            shipped: flag_field(record, "是否发货"),
            logistics_company_id: string_field(record, "logisticsCompanyId"),
            tracking_code: string_field(record, "logisticsCode"),
            ship_date: string_field(record, "发货日期"),
            attachments: attachment_entries(record),
            raw: record.clone(),
        })
    }
}

/// Split a comma-joined cross-reference list, trimming whitespace and
/// dropping empty segments.
pub fn split_order_codes(joined: &str) -> Vec<String> {
    joined
        .split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_owned)
        .collect()
}

/// One sales-order line item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: Option<String>,
    pub product_code: String,
    pub product_name: String,
    pub spec: String,
    pub quantity: f64,
    pub shipped_quantity: f64,
    pub produced_quantity: f64,
    pub status: Option<i64>,
}

impl OrderLine {
    pub fn from_record(record: &FieldMap) -> Self {
        Self {
            id: string_field(record, "id"),
            product_code: string_field(record, "productCode").unwrap_or_default(),
            product_name: string_field(record, "productName").unwrap_or_default(),
            spec: string_field(record, "spec").unwrap_or_default(),
            quantity: number_field(record, "quantity").unwrap_or(0.0),
            shipped_quantity: number_field(record, "shippedQuantity").unwrap_or(0.0),
            produced_quantity: number_field(record, "producedQuantity").unwrap_or(0.0),
            status: integer_field(record, "status"),
        }
    }
}

/// Sales order enriched with the derived shipment view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSummary {
    #[serde(flatten)]
    pub order: SalesOrder,
    pub delivery_status: ShipmentStatus,
    /// Fraction of the order value covered by shipped deliveries, in [0, 1].
    pub shipped_rate: f64,
}

/// One page of enriched order summaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSearchPage {
    pub total_count: u64,
    pub orders: Vec<OrderSummary>,
}

/// Delivery sub-record enriched for the detail view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryDetail {
    pub delivery: DeliveryOrder,
    /// Resolved carrier name; empty when the lookup has no match.
    pub carrier_name: String,
    /// Attachment URLs resolved against the tenant file base.
    pub attachment_urls: Vec<String>,
    pub lines: Vec<FieldMap>,
}

/// Full composed detail of one sales order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    pub header: SalesOrder,
    pub lines: Vec<OrderLine>,
    pub deliveries: Vec<DeliveryDetail>,
}

/// Carrier lookup row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticsCompany {
    pub id: String,
    pub name: String,
}

impl LogisticsCompany {
    /// Lenient conversion: lookup rows without an id or name are useless and
    /// yield `None` rather than failing the whole lookup.
    pub fn from_record(record: &FieldMap) -> Option<Self> {
        let id = string_field(record, "id")?;
        let name = string_field(record, "name")?;
        Some(Self { id, name })
    }
}

/// Customer row as returned by the invite-code lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub id: String,
    pub code: String,
    pub name: String,
    pub abbr: String,
    pub disabled: bool,
}

impl CustomerRecord {
    pub fn from_record(record: &FieldMap) -> Result<Self> {
        let id = require_string(record, "id", "customer")?;
        Ok(Self {
            id,
            code: string_field(record, "code").unwrap_or_default(),
            name: string_field(record, "name").unwrap_or_default(),
            abbr: string_field(record, "abbr").unwrap_or_default(),
            disabled: flag_field(record, "disable"),
        })
    }
}

// Field extraction helpers. The remote serializes loosely: ids arrive as
// strings or numbers, flags as booleans, 0/1 or strings.

fn require_string(record: &FieldMap, key: &str, entity: &str) -> Result<String> {
    string_field(record, key).ok_or_else(|| {
        FrostlinkError::validation(format!("{entity} record missing required field '{key}'"))
    })
}

fn string_field(record: &FieldMap, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn number_field(record: &FieldMap, key: &str) -> Option<f64> {
    match record.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn integer_field(record: &FieldMap, key: &str) -> Option<i64> {
    match record.get(key)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn flag_field(record: &FieldMap, key: &str) -> bool {
    match record.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        Some(Value::String(s)) => matches!(s.trim(), "true" | "1" | "是"),
        _ => false,
    }
}

fn attachment_entries(record: &FieldMap) -> Vec<String> {
    match record.get("attachments") {
        Some(Value::Array(entries)) => entries
            .iter()
            .filter_map(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect(),
        // Some tenants store the list as a comma-joined string.
        Some(Value::String(joined)) => split_order_codes(joined),
        _ => Vec::new(),
    }
}
