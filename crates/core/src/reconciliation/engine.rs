//! Reconciliation engine
//!
//! Answers the two read-model questions the remote API cannot answer
//! directly: shipment status/progress per sales order, and the full shipment
//! detail of one order. Stateless; every map it builds is request-scoped.

use std::collections::HashMap;
use std::sync::Arc;

use frostlink_domain::constants::{
    CUSTOMER_FORM, DELIVERY_LINE_PAGE_SIZE, DELIVERY_MATCH_PAGE_SIZE, DELIVERY_ORDER_FORM,
    DELIVERY_ORDER_LINE_FORM, DELIVERY_SCAN_PAGE_SIZE, INVITE_CODE_FIELD, LOGISTICS_COLUMN_ID,
    LOGISTICS_DATASOURCE_ID, LOGISTICS_LOOKUP_PAGE_SIZE, ORDER_LINE_PAGE_SIZE,
    SALES_ORDER_FORM, SALES_ORDER_LINE_FORM,
};
use frostlink_domain::{
    CustomerRecord, DatasourceRequest, DeliveryDetail, DeliveryOrder, FieldMap, FrostlinkError,
    LogisticsCompany, OrderDetail, OrderLine, OrderSearchPage, OrderSummary, PageRequest,
    RecordRequest, Result, SalesOrder, TenantConfig, UpdateRequest,
};
use futures::future::join_all;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::ports::FormStore;
use crate::reconciliation::shipment::{
    build_code_index, classify_shipment, normalize_attachment, shipped_rate,
};

// Column projections requested from the remote forms. Field names are remote
// identifiers and must match the tenant schema exactly.
const SALES_ORDER_COLUMNS: &[&str] = &[
    "id", "code", "customerOrderCode", "date", "customerId", "customerName", "deliveryDate",
    "currency", "amount", "rmbAmount", "shippedAmount", "status", "remark",
];

const DELIVERY_ORDER_COLUMNS: &[&str] = &[
    "id", "finished", "code", "orderCodes", "date", "customerOrSupplierId", "salesOrderCode",
    "rmbAmount", "amount", "logisticsCode", "attachments", "发货日期", "已出库", "是否发货",
];

const ORDER_LINE_COLUMNS: &[&str] = &[
    "id", "productCode", "productName", "spec", "brand", "quantity", "shippedQuantity",
    "producedQuantity", "price", "amount", "rmbAmount", "status", "remark",
];

const CUSTOMER_COLUMNS: &[&str] = &[
    "id", "customerType", "type", "code", "abbr", "name", "currency", "level", "disable",
    INVITE_CODE_FIELD,
];

/// Joins the two independently paginated remote collections and derives the
/// enriched shipment views.
pub struct ReconciliationEngine {
    store: Arc<dyn FormStore>,
    tenant: TenantConfig,
}

impl ReconciliationEngine {
    pub fn new(store: Arc<dyn FormStore>, tenant: TenantConfig) -> Self {
        Self { store, tenant }
    }

    /// Order-list enrichment: one page of sales orders for a customer, each
    /// carrying its derived shipment status and shipped rate.
    ///
    /// The delivery side is read as one wide page covering the customer's
    /// whole delivery history; see `DELIVERY_SCAN_PAGE_SIZE`.
    pub async fn list_orders_with_shipment(
        &self,
        customer_id: &str,
        keyword: Option<&str>,
        page: u32,
        page_size: u32,
    ) -> Result<OrderSearchPage> {
        let mut condition = FieldMap::new();
        condition.insert("customerId".into(), json!(customer_id));
        if let Some(keyword) = keyword.map(str::trim).filter(|k| !k.is_empty()) {
            condition.insert("code".into(), json!(keyword));
        }

        let mut order_request = self.page_request(SALES_ORDER_FORM, SALES_ORDER_COLUMNS);
        order_request.condition = Value::Object(condition);
        order_request.page = page;
        order_request.page_size = page_size;
        let order_page = self.store.query_page(order_request).await?;

        let mut delivery_request = self.page_request(DELIVERY_ORDER_FORM, DELIVERY_ORDER_COLUMNS);
        delivery_request.condition = json!({ "customerOrSupplierId": customer_id });
        delivery_request.page_size = DELIVERY_SCAN_PAGE_SIZE;
        let delivery_page = self.store.query_page(delivery_request).await?;

        let deliveries = parse_deliveries(&delivery_page.items);
        let index = build_code_index(&deliveries);

        let mut orders = Vec::with_capacity(order_page.items.len());
        for record in &order_page.items {
            let order = SalesOrder::from_record(record)?;
            let matches: Vec<&DeliveryOrder> = index
                .get(order.code.as_str())
                .map(|positions| positions.iter().map(|&p| &deliveries[p]).collect())
                .unwrap_or_default();
            let delivery_status = classify_shipment(&matches);
            let rate = shipped_rate(order.rmb_amount, &matches);
            orders.push(OrderSummary { order, delivery_status, shipped_rate: rate });
        }

        debug!(
            customer_id,
            orders = orders.len(),
            deliveries = deliveries.len(),
            "reconciled order page"
        );

        Ok(OrderSearchPage { total_count: order_page.total_count, orders })
    }

    /// Order-detail enrichment: header, line items and enriched delivery
    /// sub-records for one sales order.
    ///
    /// Header and lines are required; delivery lookup, carrier lookup,
    /// per-delivery detail refresh and per-delivery product lines all degrade
    /// gracefully.
    pub async fn order_detail(&self, order_id: &str) -> Result<OrderDetail> {
        let mut header_request = self.page_request(SALES_ORDER_FORM, SALES_ORDER_COLUMNS);
        header_request.filters = json!({ "id": [order_id] });
        header_request.page_size = 1;
        let header_page = self.store.query_page(header_request).await?;
        let header_record = header_page
            .items
            .first()
            .ok_or_else(|| FrostlinkError::not_found(format!("sales order {order_id} not found")))?;
        let header = SalesOrder::from_record(header_record)?;

        let mut lines_request = self.page_request(SALES_ORDER_LINE_FORM, ORDER_LINE_COLUMNS);
        lines_request.condition = json!({ "form.id": order_id });
        lines_request.page_size = ORDER_LINE_PAGE_SIZE;
        let lines_page = self.store.query_page(lines_request).await?;
        let lines: Vec<OrderLine> = lines_page.items.iter().map(OrderLine::from_record).collect();

        // The carrier lookup depends on nothing below, so it runs alongside
        // the delivery fetch.
        let mut match_request = self.page_request(DELIVERY_ORDER_FORM, DELIVERY_ORDER_COLUMNS);
        match_request.filters = json!({ "orderCodes": header.code });
        match_request.page_size = DELIVERY_MATCH_PAGE_SIZE;
        let (delivery_result, carriers) =
            tokio::join!(self.store.query_page(match_request), self.carrier_names());

        let deliveries = match delivery_result {
            Ok(page) => parse_deliveries(&page.items),
            Err(err) => {
                warn!(order_id, error = %err, "delivery lookup failed; returning detail without deliveries");
                Vec::new()
            }
        };

        let enriched = join_all(
            deliveries.into_iter().map(|delivery| self.enrich_delivery(delivery, &carriers)),
        )
        .await;

        Ok(OrderDetail { header, lines, deliveries: enriched })
    }

    /// Resolve a tenant invite code to its customer record.
    ///
    /// An unknown code and a disabled customer are both rejected as
    /// validation failures so the boundary can surface a specific reason.
    pub async fn verify_invite_code(&self, invite_code: &str) -> Result<CustomerRecord> {
        let invite_code = invite_code.trim();
        if invite_code.is_empty() {
            return Err(FrostlinkError::validation("invite code must not be empty"));
        }

        let mut filters = FieldMap::new();
        filters.insert(INVITE_CODE_FIELD.to_owned(), json!(invite_code));

        let mut request = self.page_request(CUSTOMER_FORM, CUSTOMER_COLUMNS);
        request.filters = Value::Object(filters);
        request.page_size = 1;
        let page = self.store.query_page(request).await?;
        let record = page
            .items
            .first()
            .ok_or_else(|| FrostlinkError::validation("invalid invite code"))?;
        let customer = CustomerRecord::from_record(record)?;
        if customer.disabled {
            return Err(FrostlinkError::validation("customer account is disabled"));
        }
        Ok(customer)
    }

    /// Write an invite code back onto a customer record.
    pub async fn assign_invite_code(&self, customer_id: &str, invite_code: &str) -> Result<()> {
        let mut data = FieldMap::new();
        data.insert(INVITE_CODE_FIELD.to_owned(), json!(invite_code));
        self.store
            .update_record(UpdateRequest {
                app_name: self.tenant.app_name.clone(),
                form_id: CUSTOMER_FORM,
                id: customer_id.to_owned(),
                data,
            })
            .await
    }

    /// Enrich one delivery: detail refresh (falling back to the list
    /// projection), carrier-name resolution, attachment normalization and
    /// product lines.
    async fn enrich_delivery(
        &self,
        listed: DeliveryOrder,
        carriers: &HashMap<String, String>,
    ) -> DeliveryDetail {
        let detail_request = RecordRequest {
            app_name: self.tenant.app_name.clone(),
            form_id: DELIVERY_ORDER_FORM,
            condition: json!({ "salesOrderProductIds": null }),
            id: listed.id.clone(),
        };
        let delivery = match self.store.fetch_record(detail_request).await {
            Ok(record) => match DeliveryOrder::from_record(&record) {
                Ok(detail) => detail,
                Err(err) => {
                    warn!(delivery_id = %listed.id, error = %err, "delivery detail record malformed; using list projection");
                    listed
                }
            },
            Err(err) => {
                warn!(delivery_id = %listed.id, error = %err, "delivery detail fetch failed; using list projection");
                listed
            }
        };

        let carrier_name = delivery
            .logistics_company_id
            .as_deref()
            .and_then(|id| carriers.get(id))
            .cloned()
            .unwrap_or_default();

        let attachment_urls = delivery
            .attachments
            .iter()
            .map(|entry| {
                normalize_attachment(entry, &self.tenant.file_base_url, &self.tenant.app_name)
            })
            .collect();

        let mut lines_request = self.page_request(DELIVERY_ORDER_LINE_FORM, &[]);
        lines_request.condition =
            json!({ "parent.id": delivery.id, "category": 1, "exchangeRate": 1 });
        lines_request.page_size = DELIVERY_LINE_PAGE_SIZE;
        let lines = match self.store.query_page(lines_request).await {
            Ok(page) => page.items,
            Err(err) => {
                warn!(delivery_id = %delivery.id, error = %err, "delivery line fetch failed; omitting lines");
                Vec::new()
            }
        };

        DeliveryDetail { delivery, carrier_name, attachment_urls, lines }
    }

    /// Fetch the logistics lookup set once and key it by company id. Degrades
    /// to an empty map; detail callers then render carrier names as empty.
    async fn carrier_names(&self) -> HashMap<String, String> {
        let request = DatasourceRequest {
            app_name: self.tenant.app_name.clone(),
            form_id: DELIVERY_ORDER_FORM,
            datasource_id: LOGISTICS_DATASOURCE_ID,
            col_id: LOGISTICS_COLUMN_ID,
            columns: vec!["name".to_owned()],
            page: 0,
            page_size: LOGISTICS_LOOKUP_PAGE_SIZE,
        };
        match self.store.query_datasource(request).await {
            Ok(page) => page
                .items
                .iter()
                .filter_map(LogisticsCompany::from_record)
                .map(|company| (company.id, company.name))
                .collect(),
            Err(err) => {
                warn!(error = %err, "logistics lookup failed; carrier names unavailable");
                HashMap::new()
            }
        }
    }

    fn page_request(&self, form_id: i64, columns: &[&str]) -> PageRequest {
        let mut request = PageRequest::new(&self.tenant.app_name, form_id);
        request.columns = columns.iter().map(|&c| c.to_owned()).collect();
        request
    }
}

/// Parse delivery rows leniently: a corrupt row is logged and skipped rather
/// than failing the whole reconciliation.
fn parse_deliveries(items: &[FieldMap]) -> Vec<DeliveryOrder> {
    items
        .iter()
        .filter_map(|record| match DeliveryOrder::from_record(record) {
            Ok(delivery) => Some(delivery),
            Err(err) => {
                warn!(error = %err, "skipping malformed delivery record");
                None
            }
        })
        .collect()
}
