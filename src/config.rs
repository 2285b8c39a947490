// src/config.rs

use crate::error::OidccError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;
use url::Url;

/// The API root of a locally deployed conformance suite.
pub const DEFAULT_ROOT_URL: &str = "https://localhost:8443/api";

/// What a bulk delete does when one deletion fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeletePolicy {
    /// Stop at the first failure. Plans deleted before it stay deleted.
    #[default]
    FailFast,
    /// Attempt every deletion and report the last failure afterwards.
    BestEffort,
}

/// Settings for the transport built by `PlanApiClient::new`.
///
/// These are ignored when a pre-configured `reqwest::Client` is injected.
#[derive(Debug, Clone)]
pub struct TransportSettings {
    /// Accept self-signed certificates. The suite ships with one, so this defaults to `true`.
    pub accept_invalid_certs: bool,
    pub connect_timeout: Duration,
    pub tcp_keepalive: Duration,
    pub pool_idle_timeout: Duration,
    pub pool_max_idle_per_host: usize,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            accept_invalid_certs: true,
            connect_timeout: Duration::from_secs(30),
            tcp_keepalive: Duration::from_secs(30),
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: 100,
        }
    }
}

impl TransportSettings {
    /// Builds a `reqwest::Client` from these settings. Proxies are taken from the environment.
    pub fn build_client(&self) -> Result<reqwest::Client, OidccError> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .connect_timeout(self.connect_timeout)
            .tcp_keepalive(self.tcp_keepalive)
            .pool_idle_timeout(self.pool_idle_timeout)
            .pool_max_idle_per_host(self.pool_max_idle_per_host)
            .build()?;
        Ok(client)
    }
}

/// The configuration of a `PlanApiClient`. Construct it with `ApiClientConfigBuilder`.
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Root of the suite's API. Plan endpoints live at `<root>/plan`.
    pub root_url: Url,
    /// Sent on every request, e.g. an `Authorization` header.
    pub headers: HeaderMap,
    pub transport: TransportSettings,
    pub delete_policy: DeletePolicy,
}

impl Default for ApiClientConfig {
    // `DEFAULT_ROOT_URL` is an absolute https URL, so parsing it cannot fail.
    #[allow(clippy::expect_used)]
    fn default() -> Self {
        Self {
            root_url: Url::parse(DEFAULT_ROOT_URL).expect("DEFAULT_ROOT_URL is an absolute URL"),
            headers: HeaderMap::new(),
            transport: TransportSettings::default(),
            delete_policy: DeletePolicy::default(),
        }
    }
}

/// A builder for creating an `ApiClientConfig` instance.
#[derive(Debug, Default)]
pub struct ApiClientConfigBuilder {
    config: ApiClientConfig,
}

impl ApiClientConfigBuilder {
    /// Creates a builder holding the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API root. Defaults to `https://localhost:8443/api`.
    pub fn root_url(mut self, url: &str) -> Result<Self, OidccError> {
        let parsed_url = Url::parse(url).map_err(|e| OidccError::InvalidUrl(format!("{}: {}", url, e)))?;
        if parsed_url.cannot_be_a_base() {
            return Err(OidccError::InvalidUrl(format!("{} cannot be used as a base URL", url)));
        }
        self.config.root_url = parsed_url;
        Ok(self)
    }

    /// Adds a header sent with every request.
    pub fn header(mut self, name: &str, value: &str) -> Result<Self, OidccError> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| OidccError::InvalidConfiguration(format!("header name '{}': {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| OidccError::InvalidConfiguration(format!("header '{}' value: {}", name, e)))?;
        self.config.headers.append(name, value);
        Ok(self)
    }

    /// Adds every header of `headers` to the defaults sent with each request.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.config.headers.extend(headers);
        self
    }

    /// Whether the built transport accepts self-signed certificates. Defaults to `true`.
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.config.transport.accept_invalid_certs = accept;
        self
    }

    /// Sets the TCP connect timeout. Defaults to 30 seconds.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.transport.connect_timeout = timeout;
        self
    }

    /// Sets the TCP keepalive interval. Defaults to 30 seconds.
    pub fn tcp_keepalive(mut self, keepalive: Duration) -> Self {
        self.config.transport.tcp_keepalive = keepalive;
        self
    }

    /// Sets how long an idle pooled connection is kept. Defaults to 90 seconds.
    pub fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.config.transport.pool_idle_timeout = timeout;
        self
    }

    /// Sets the maximum idle connections kept per host. Defaults to 100.
    pub fn pool_max_idle_per_host(mut self, max: usize) -> Self {
        self.config.transport.pool_max_idle_per_host = max;
        self
    }

    /// Sets how `delete_all_plans` handles a failed deletion. Defaults to `FailFast`.
    pub fn delete_policy(mut self, policy: DeletePolicy) -> Self {
        self.config.delete_policy = policy;
        self
    }

    /// Builds the `ApiClientConfig`.
    pub fn build(self) -> ApiClientConfig {
        self.config
    }
}
