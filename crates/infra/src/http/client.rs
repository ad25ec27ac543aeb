use std::time::Duration;

use frostlink_domain::FrostlinkError;
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tracing::debug;

use crate::errors::InfraError;

/// Thin HTTP client with timeout support.
///
/// Deliberately retry-free: the remote platform's failures are surfaced to
/// callers as error values exactly once, and retry policy (if any) lives at
/// the boundary that owns the user interaction.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self, FrostlinkError> {
        Self::builder().build()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the provided request builder exactly once.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, FrostlinkError> {
        let request = builder.build().map_err(|err| {
            let infra: InfraError = err.into();
            FrostlinkError::from(infra)
        })?;

        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "sending HTTP request");

        match self.client.execute(request).await {
            Ok(response) => {
                let status = response.status();
                debug!(%method, %url, %status, "received HTTP response");
                Ok(response)
            }
            Err(err) => {
                debug!(%method, %url, error = %err, "HTTP request failed");
                let infra: InfraError = err.into();
                Err(FrostlinkError::from(infra))
            }
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    follow_redirects: bool,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(30), follow_redirects: true }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Disable automatic redirect following. The session login chain walks
    /// redirects by hand so it can inspect every hop's Set-Cookie headers.
    pub fn disable_redirects(mut self) -> Self {
        self.follow_redirects = false;
        self
    }

    pub fn build(self) -> Result<HttpClient, FrostlinkError> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();

        if !self.follow_redirects {
            builder = builder.redirect(reqwest::redirect::Policy::none());
        }

        let client = builder.build().map_err(|err| {
            let infra: InfraError = err.into();
            FrostlinkError::from(infra)
        })?;

        Ok(HttpClient { client })
    }
}
