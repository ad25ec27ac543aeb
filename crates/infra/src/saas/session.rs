//! Remote session lifecycle
//!
//! The platform authenticates through a two-stage login chain producing three
//! chained cookie credentials:
//!
//! 1. Credential login against the service endpoint issues `JSESSIONID` and
//!    `sid`.
//! 2. An open-app exchange against the gateway, authenticated by `sid` alone,
//!    walks a redirect chain and re-issues `JSESSIONID` scoped to the tenant
//!    app. The token can appear on any hop, so redirects are walked by hand.
//!
//! Sessions live for a fixed TTL and are re-established lazily on first use
//! past expiry; concurrent callers share one login through a single-flight
//! gate.

use std::time::Duration;

use frostlink_domain::constants::{
    LOGIN_PATH, MAX_REDIRECT_HOPS, OPEN_APP_PATH_PREFIX, PRIMARY_SESSION_COOKIE,
    SECONDARY_SESSION_COOKIE,
};
use frostlink_domain::{AuthStage, FrostlinkError, PlatformConfig, Result, SessionState};
use reqwest::header::{COOKIE, LOCATION};
use reqwest::Method;
use serde_json::json;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use url::Url;

use crate::errors::InfraError;
use crate::http::HttpClient;
use crate::saas::cookies;

/// Owns the credential triple and re-establishes it on demand.
pub struct SessionManager {
    http: HttpClient,
    config: PlatformConfig,
    state: RwLock<Option<SessionState>>,
    /// Serializes re-login so a burst of expired callers produces one chain.
    refresh_gate: Mutex<()>,
}

impl SessionManager {
    /// Build a manager with its own redirect-free HTTP client.
    pub fn new(config: PlatformConfig) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.http.timeout_secs))
            .disable_redirects()
            .build()?;
        Ok(Self { http, config, state: RwLock::new(None), refresh_gate: Mutex::new(()) })
    }

    /// Return the assembled `Cookie` header for business calls, running the
    /// login chain first if no valid session exists.
    pub async fn auth_cookie(&self) -> Result<String> {
        if let Some(cookie) = self.cached_cookie().await {
            return Ok(cookie);
        }

        let _gate = self.refresh_gate.lock().await;
        // Another caller may have refreshed while this one waited.
        if let Some(cookie) = self.cached_cookie().await {
            return Ok(cookie);
        }

        match self.login_chain().await {
            Ok(state) => {
                let cookie =
                    cookies::auth_cookie_value(&state.app_session_id, &state.secondary_session_id);
                *self.state.write().await = Some(state);
                info!("remote session established");
                Ok(cookie)
            }
            Err(err) => {
                if let Some(state) = self.state.write().await.as_mut() {
                    state.logged_in = false;
                }
                Err(err)
            }
        }
    }

    /// Verify a usable session exists, establishing one if needed.
    pub async fn ensure_authenticated(&self) -> Result<()> {
        self.auth_cookie().await.map(|_| ())
    }

    /// Drop the current session; the next call re-runs the login chain.
    pub async fn invalidate(&self) {
        if let Some(state) = self.state.write().await.as_mut() {
            state.logged_in = false;
        }
    }

    async fn cached_cookie(&self) -> Option<String> {
        let guard = self.state.read().await;
        guard
            .as_ref()
            .filter(|state| state.is_valid())
            .map(|state| {
                cookies::auth_cookie_value(&state.app_session_id, &state.secondary_session_id)
            })
    }

    async fn login_chain(&self) -> Result<SessionState> {
        let (primary, secondary) = self.primary_login().await?;
        let app_session = self.exchange_app_session(&secondary).await?;
        Ok(SessionState::new(
            primary,
            secondary,
            app_session,
            Duration::from_secs(self.config.http.session_ttl_secs),
        ))
    }

    /// Stage one: credential login. Both service-level cookies must be issued.
    async fn primary_login(&self) -> Result<(String, String)> {
        let url = format!("{}{}", self.config.service_url.trim_end_matches('/'), LOGIN_PATH);
        let body = json!({
            "state": true,
            "account": self.config.account,
            "token": "",
            "password": self.config.password,
        });

        let response = self.http.send(self.http.request(Method::POST, &url).json(&body)).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FrostlinkError::auth(
                AuthStage::Primary,
                format!("login rejected with HTTP {status}"),
            ));
        }

        let primary =
            cookies::find_cookie(response.headers(), PRIMARY_SESSION_COOKIE).ok_or_else(|| {
                FrostlinkError::auth(AuthStage::Primary, "login issued no session cookie")
            })?;
        let secondary =
            cookies::find_cookie(response.headers(), SECONDARY_SESSION_COOKIE).ok_or_else(
                || FrostlinkError::auth(AuthStage::Primary, "login issued no sid cookie"),
            )?;

        debug!("primary login succeeded");
        Ok((primary, secondary))
    }

    /// Stage two: open-app exchange. Walks the redirect chain manually and
    /// keeps the last app-context session cookie seen on any hop.
    async fn exchange_app_session(&self, secondary: &str) -> Result<String> {
        let start = format!(
            "{}{}/{}",
            self.config.gateway_url.trim_end_matches('/'),
            OPEN_APP_PATH_PREFIX,
            self.config.tenant.app_id,
        );
        let mut url =
            Url::parse(&start).map_err(|err| FrostlinkError::from(InfraError::from(err)))?;
        let sid_cookie = format!("{SECONDARY_SESSION_COOKIE}={secondary}");

        let mut app_session = None;
        for hop in 0..=MAX_REDIRECT_HOPS {
            let response = self
                .http
                .send(self.http.request(Method::GET, url.clone()).header(COOKIE, &sid_cookie))
                .await?;

            if let Some(token) = cookies::find_cookie(response.headers(), PRIMARY_SESSION_COOKIE) {
                debug!(hop, "app session cookie observed");
                app_session = Some(token);
            }

            let status = response.status();
            if status.is_redirection() {
                let location = response
                    .headers()
                    .get(LOCATION)
                    .and_then(|value| value.to_str().ok())
                    .ok_or_else(|| {
                        FrostlinkError::auth(
                            AuthStage::Exchange,
                            "redirect without a Location header",
                        )
                    })?;
                url = url
                    .join(location)
                    .map_err(|err| FrostlinkError::from(InfraError::from(err)))?;
                continue;
            }

            if !status.is_success() {
                return Err(FrostlinkError::auth(
                    AuthStage::Exchange,
                    format!("app exchange ended with HTTP {status}"),
                ));
            }

            return app_session.ok_or_else(|| {
                FrostlinkError::auth(AuthStage::Exchange, "app session cookie never issued")
            });
        }

        Err(FrostlinkError::auth(AuthStage::Exchange, "redirect chain exceeded the hop limit"))
    }
}
