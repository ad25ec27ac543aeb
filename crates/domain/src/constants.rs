//! Wire-protocol constants for the remote form store
//!
//! The remote platform addresses every entity type by an opaque numeric form
//! identifier instead of a REST resource name. These values must stay
//! bit-exact for wire compatibility; they are tenant-level identifiers, not
//! tunables.

// Form identifiers (one per entity type)
pub const SALES_ORDER_FORM: i64 = 100001;
pub const SALES_ORDER_LINE_FORM: i64 = 100185;
pub const DELIVERY_ORDER_FORM: i64 = 100039;
pub const DELIVERY_ORDER_LINE_FORM: i64 = 100041;
pub const CUSTOMER_FORM: i64 = 100004;

// Logistics-company lookup (datasource endpoint)
pub const LOGISTICS_DATASOURCE_ID: i64 = 100292;
pub const LOGISTICS_COLUMN_ID: i64 = 110673;

// Endpoint paths
pub const LOGIN_PATH: &str = "/login";
pub const OPEN_APP_PATH_PREFIX: &str = "/apps/user/open-app";
pub const PAGE_QUERY_PATH: &str = "/business/getBusinessPageList";
pub const RECORD_FETCH_PATH: &str = "/business/getBusiness";
pub const DATASOURCE_PATH: &str = "/business/getDatasource";
pub const RECORD_UPDATE_PATH: &str = "/business/updateBusiness";

// Cookie names set by the platform
pub const PRIMARY_SESSION_COOKIE: &str = "JSESSIONID";
pub const SECONDARY_SESSION_COOKIE: &str = "sid";
pub const LOCALE_COOKIE: &str = "lang=zh-cn";

// Remote field carrying the tenant invite code on the customer form
pub const INVITE_CODE_FIELD: &str = "微信邀请码";

// Session lifetime; the platform invalidates chained cookies shortly after
// five minutes, so re-login happens on the next use past this age.
pub const SESSION_TTL_SECS: u64 = 300;

// One wide page covering all delivery orders of a customer. Inherited scale
// assumption from the source system; see DESIGN.md before changing the
// strategy, the remote pagination limits are undocumented.
pub const DELIVERY_SCAN_PAGE_SIZE: u32 = 5000;

// Bounded page sizes for supplementary fetches
pub const LOGISTICS_LOOKUP_PAGE_SIZE: u32 = 1000;
pub const DELIVERY_LINE_PAGE_SIZE: u32 = 5000;
pub const ORDER_LINE_PAGE_SIZE: u32 = 200;
pub const DELIVERY_MATCH_PAGE_SIZE: u32 = 200;

// Redirect-walk bound for the app-session exchange
pub const MAX_REDIRECT_HOPS: usize = 10;

// Default network timeout
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
