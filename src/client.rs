use anyhow::{Context, Result};
use reqwest::blocking::Client as HttpClient;
use reqwest::header::{ACCEPT, CACHE_CONTROL, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

use crate::config::{Overrides, load_config};
use crate::error::ApiError;
use crate::util::urljoin;

/// Header carrying the API product subscription key.
pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base API URL, typically `https://api.sec.or.th`.
    pub url: String,
    /// Subscription key for the Fund Factsheet API product.
    pub factsheet_key: String,
    /// Subscription key for the Fund Daily Info API product, if available.
    pub daily_info_key: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// Blocking client for the SEC Fund APIs.
///
/// Every call is a single attempt: there are no retries, and a failure is
/// reported to the caller as an [`ApiError`].
#[derive(Debug, Clone)]
pub struct Client {
    url: String,
    factsheet_key: String,
    daily_info_key: Option<String>,
    timeout: Duration,

    http: HttpClient,
}

impl Client {
    /// Creates a client using environment variables and/or `.secfundrc`.
    ///
    /// This is equivalent to `Client::new(Overrides::default())`.
    pub fn from_env() -> Result<Self> {
        Self::new(Overrides::default())
    }

    /// Creates a client using (in order of precedence):
    /// - explicit `overrides`
    /// - environment variables `SEC_API_URL`, `SEC_FUND_FACTSHEET_KEY`,
    ///   `SEC_FUND_DAILY_INFO_KEY`, `SEC_API_TIMEOUT_SECS`
    /// - config file from `SECFUND_RC` or `.secfundrc`
    pub fn new(overrides: Overrides) -> Result<Self> {
        let cfg = load_config(overrides)?;
        Self::with_config(cfg)
    }

    pub fn with_config(cfg: ClientConfig) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("secfund-rs/{}", env!("CARGO_PKG_VERSION")))
                .unwrap_or(HeaderValue::from_static("secfund-rs")),
        );
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        default_headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));

        let http = HttpClient::builder()
            .default_headers(default_headers)
            .timeout(cfg.timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            url: cfg.url,
            factsheet_key: cfg.factsheet_key,
            daily_info_key: cfg.daily_info_key,
            timeout: cfg.timeout,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn factsheet_key(&self) -> &str {
        &self.factsheet_key
    }

    pub fn daily_info_key(&self) -> Option<&str> {
        self.daily_info_key.as_deref()
    }

    /// Issues `GET {base_url}{path}` with `api_key` as the subscription key and
    /// returns the decoded JSON body.
    pub fn call(&self, path: &str, api_key: &str) -> Result<Value, ApiError> {
        self.get_json(path, api_key)
    }

    /// Like [`Client::call`], decoding the body into `T`.
    pub fn get_json<T: DeserializeOwned>(&self, path: &str, api_key: &str) -> Result<T, ApiError> {
        let url = urljoin(&self.url, path);
        tracing::debug!(%url, "calling SEC API");

        let resp = self
            .http
            .get(&url)
            .header(SUBSCRIPTION_KEY_HEADER, api_key.trim())
            .send()
            .map_err(|e| ApiError::Transport {
                url: url.clone(),
                status: e.status(),
                body: String::new(),
                source: Some(e),
            })?;

        let status = resp.status();
        let text = resp.text().map_err(|e| ApiError::Transport {
            url: url.clone(),
            status: Some(status),
            body: String::new(),
            source: Some(e),
        })?;

        if !status.is_success() {
            return Err(ApiError::Transport {
                url,
                status: Some(status),
                body: text,
                source: None,
            });
        }

        match serde_json::from_str::<T>(&text) {
            Ok(v) => Ok(v),
            Err(source) => Err(ApiError::Decode { url, text, source }),
        }
    }
}
