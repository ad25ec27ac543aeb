//! Session manager integration tests against a mock platform.

use std::sync::Arc;

use frostlink_domain::{AuthStage, FrostlinkError, HttpConfig, PlatformConfig, TenantConfig};
use frostlink_infra::SessionManager;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_logs() {
    let _ = tracing_subscriber::fmt().with_env_filter("frostlink_infra=debug").try_init();
}

fn config(server: &MockServer) -> PlatformConfig {
    PlatformConfig {
        service_url: server.uri(),
        gateway_url: server.uri(),
        account: "ops@example.com".into(),
        password: "hashed-secret".into(),
        tenant: TenantConfig {
            app_id: "82886".into(),
            app_name: "SnowInventory-82886".into(),
            file_base_url: format!("{}/files", server.uri()),
        },
        http: HttpConfig { timeout_secs: 5, session_ttl_secs: 300 },
    }
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "JSESSIONID=svc-1; Path=/; HttpOnly")
                .append_header("set-cookie", "sid=sid-9; Path=/")
                .set_body_json(json!({"success": true})),
        )
        .mount(server)
        .await;
}

async fn mount_open_app(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/apps/user/open-app/82886"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("Location", "/apps/app-entry")
                .insert_header("set-cookie", "JSESSIONID=hop-1; Path=/"),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/apps/app-entry"))
        .respond_with(ResponseTemplate::new(200).insert_header("set-cookie", "JSESSIONID=app-7; Path=/"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn login_chain_assembles_the_cookie_triple() {
    init_logs();
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_open_app(&server).await;

    let session = SessionManager::new(config(&server)).unwrap();
    let cookie = session.auth_cookie().await.unwrap();

    assert_eq!(cookie, "JSESSIONID=app-7; lang=zh-cn; sid=sid-9");
}

#[tokio::test]
async fn app_token_from_redirect_history_survives_a_cookieless_terminal_hop() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/apps/user/open-app/82886"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("Location", "/apps/app-entry")
                .insert_header("set-cookie", "JSESSIONID=hop-1; Path=/"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/apps/app-entry"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let session = SessionManager::new(config(&server)).unwrap();
    let cookie = session.auth_cookie().await.unwrap();

    assert_eq!(cookie, "JSESSIONID=hop-1; lang=zh-cn; sid=sid-9");
}

#[tokio::test]
async fn valid_session_is_reused_without_another_login() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_open_app(&server).await;

    let session = SessionManager::new(config(&server)).unwrap();
    let first = session.auth_cookie().await.unwrap();
    let second = session.auth_cookie().await.unwrap();
    assert_eq!(first, second);

    let requests = server.received_requests().await.unwrap();
    let logins = requests.iter().filter(|r| r.url.path() == "/login").count();
    assert_eq!(logins, 1);
}

#[tokio::test]
async fn expired_session_is_reestablished_on_next_use() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_open_app(&server).await;

    let mut cfg = config(&server);
    cfg.http.session_ttl_secs = 0;
    let session = SessionManager::new(cfg).unwrap();
    session.auth_cookie().await.unwrap();
    session.auth_cookie().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let logins = requests.iter().filter(|r| r.url.path() == "/login").count();
    assert_eq!(logins, 2);
}

#[tokio::test]
async fn invalidated_session_is_reestablished_on_next_use() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_open_app(&server).await;

    let session = SessionManager::new(config(&server)).unwrap();
    let first = session.auth_cookie().await.unwrap();
    session.invalidate().await;
    let second = session.auth_cookie().await.unwrap();
    assert_eq!(first, second);

    let requests = server.received_requests().await.unwrap();
    let logins = requests.iter().filter(|r| r.url.path() == "/login").count();
    assert_eq!(logins, 2);
}

#[tokio::test]
async fn concurrent_callers_share_a_single_login() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_open_app(&server).await;

    let session = Arc::new(SessionManager::new(config(&server)).unwrap());
    let mut handles = Vec::new();
    for _ in 0..8 {
        let session = session.clone();
        handles.push(tokio::spawn(async move { session.auth_cookie().await }));
    }
    for handle in handles {
        let cookie = handle.await.unwrap().unwrap();
        assert_eq!(cookie, "JSESSIONID=app-7; lang=zh-cn; sid=sid-9");
    }

    let requests = server.received_requests().await.unwrap();
    let logins = requests.iter().filter(|r| r.url.path() == "/login").count();
    assert_eq!(logins, 1);
}

#[tokio::test]
async fn rejected_login_reports_the_primary_stage() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let session = SessionManager::new(config(&server)).unwrap();
    let err = session.auth_cookie().await.unwrap_err();
    assert!(matches!(err, FrostlinkError::Auth { stage: AuthStage::Primary, .. }));
}

#[tokio::test]
async fn login_without_sid_cookie_reports_the_primary_stage() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "JSESSIONID=svc-1; Path=/")
                .set_body_json(json!({"success": true})),
        )
        .mount(&server)
        .await;

    let session = SessionManager::new(config(&server)).unwrap();
    let err = session.auth_cookie().await.unwrap_err();
    assert!(matches!(err, FrostlinkError::Auth { stage: AuthStage::Primary, .. }));
}

#[tokio::test]
async fn exchange_without_app_cookie_reports_the_exchange_stage() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/apps/user/open-app/82886"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let session = SessionManager::new(config(&server)).unwrap();
    let err = session.auth_cookie().await.unwrap_err();
    assert!(matches!(err, FrostlinkError::Auth { stage: AuthStage::Exchange, .. }));
}

#[tokio::test]
async fn unbounded_redirect_chain_is_cut_off() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/apps/user/open-app/82886"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("Location", "/apps/user/open-app/82886"),
        )
        .mount(&server)
        .await;

    let session = SessionManager::new(config(&server)).unwrap();
    let err = session.auth_cookie().await.unwrap_err();
    assert!(matches!(err, FrostlinkError::Auth { stage: AuthStage::Exchange, .. }));
}
