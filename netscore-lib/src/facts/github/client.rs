//! GitHub API client and paginated fetcher.

use crate::Result;
use core::fmt::{Debug, Formatter};
use core::time::Duration;
use ohno::{EnrichableExt, IntoAppError, app_err, bail};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

const LOG_TARGET: &str = "    github";

pub const GITHUB_API_URL: &str = "https://api.github.com";

/// Number of records requested per page; the maximum GitHub allows.
pub const PAGE_SIZE: usize = 100;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// When the paginated fetcher stops requesting pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopRule {
    /// Stop once a page comes back with no records.
    EmptyPage,

    /// Also stop after a page that holds fewer than [`PAGE_SIZE`] records.
    ShortPage,
}

/// Connection settings for the GitHub API, resolved once at startup.
#[derive(Clone)]
pub struct ClientConfig {
    token: Arc<str>,
    base_url: String,
    request_timeout: Duration,
}

impl ClientConfig {
    /// Create a configuration for the given credential.
    ///
    /// A missing or blank token is a configuration error: every request is
    /// authenticated.
    pub fn new(token: Option<&str>) -> Result<Self> {
        let token = token.map(str::trim).filter(|t| !t.is_empty()).ok_or_else(|| {
            app_err!("a GitHub token is required; set the GITHUB_TOKEN environment variable or pass --github-token")
        })?;

        Ok(Self {
            token: Arc::from(token),
            base_url: GITHUB_API_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Debug for ClientConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Authenticated GitHub REST client.
#[derive(Debug, Clone)]
#[expect(clippy::struct_field_names, reason = "client field stores the underlying HTTP client")]
pub struct Client {
    client: reqwest::Client,
    base_url: Arc<str>,
}

impl Client {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut auth_val = HeaderValue::from_str(&format!("Bearer {}", config.token)).into_app_err("invalid characters in GitHub token")?;
        auth_val.set_sensitive(true);

        let mut headers = HeaderMap::new();
        let _ = headers.insert(AUTHORIZATION, auth_val);
        let _ = headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));

        let client = reqwest::Client::builder()
            .user_agent("netscore")
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()
            .into_app_err("could not create HTTP client")?;

        Ok(Self {
            client,
            base_url: Arc::from(config.base_url.trim_end_matches('/')),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch every record of a collection whose pages are JSON arrays.
    ///
    /// `endpoint` is relative to the API root, e.g. `repos/owner/repo/issues`.
    pub async fn fetch_all<T: DeserializeOwned>(&self, endpoint: &str, query: &[(&str, &str)], stop: StopRule) -> Result<Vec<T>> {
        self.paginate(endpoint, query, stop, |page| {
            serde_json::from_value::<Vec<T>>(page).into_app_err("page is not an array of the expected records")
        })
        .await
    }

    /// Fetch every record of a collection whose pages wrap the array in an object,
    /// such as `{ "total_count": 3, "workflow_runs": [...] }`.
    pub async fn fetch_all_wrapped<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
        field: &str,
        stop: StopRule,
    ) -> Result<Vec<T>> {
        self.paginate(endpoint, query, stop, |mut page| {
            let items = page
                .get_mut(field)
                .map(Value::take)
                .into_app_err_with(|| format!("page has no '{field}' field"))?;
            serde_json::from_value::<Vec<T>>(items).into_app_err_with(|| format!("'{field}' is not an array of the expected records"))
        })
        .await
    }

    async fn paginate<T, F>(&self, endpoint: &str, query: &[(&str, &str)], stop: StopRule, extract: F) -> Result<Vec<T>>
    where
        F: Fn(Value) -> Result<Vec<T>>,
    {
        let url = format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'));
        let mut records = Vec::new();
        let mut page: u32 = 1;

        loop {
            let batch = match self.fetch_page(&url, query, page).await.and_then(&extract) {
                Ok(batch) => batch,
                Err(e) => {
                    log::debug!(target: LOG_TARGET, "Fetching page {page} of '{endpoint}' failed: {e:#}");
                    return Err(e.enrich_with(|| format!("could not fetch '{endpoint}'")));
                }
            };

            let count = batch.len();
            log::debug!(target: LOG_TARGET, "Fetched page {page} of '{endpoint}' with {count} records");

            if count == 0 {
                break;
            }

            records.extend(batch);

            if stop == StopRule::ShortPage && count < PAGE_SIZE {
                break;
            }

            page += 1;
        }

        log::debug!(target: LOG_TARGET, "Fetched {} records from '{endpoint}'", records.len());
        Ok(records)
    }

    async fn fetch_page(&self, url: &str, query: &[(&str, &str)], page: u32) -> Result<Value> {
        let page = page.to_string();
        let per_page = PAGE_SIZE.to_string();

        let resp = self
            .client
            .get(url)
            .query(query)
            .query(&[("page", page.as_str()), ("per_page", per_page.as_str())])
            .send()
            .await
            .into_app_err_with(|| format!("sending HTTP request to {url}"))?;

        let status = resp.status();
        if !status.is_success() {
            bail!("unexpected HTTP status {status} from {url}");
        }

        resp.json::<Value>().await.into_app_err_with(|| format!("malformed JSON from {url}"))
    }
}
