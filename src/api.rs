use async_trait::async_trait;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use url::Url;
use tokio::time::Duration;

use crate::error::ApiError;
use crate::metrics;
use crate::settings::ApiSettings;
use crate::types::{BranchEntry, LookupRecord};

/// Remote proxy endpoints consumed by the cascade controller and the lookup
/// service. Behind a trait so tests can count calls with an in-memory stub.
///
/// All endpoints are plain GET, query parameters URL-encoded, no auth.
#[async_trait]
pub trait DirectoryApi: Send + Sync {
    /// `GET /banks` - all bank names.
    async fn banks(&self) -> Result<Vec<String>, ApiError>;

    /// `GET /states?bank=` - states where the bank operates.
    async fn states(&self, bank: &str) -> Result<Vec<String>, ApiError>;

    /// `GET /cities?bank=&state=` - districts/cities of the bank in a state.
    async fn cities(&self, bank: &str, state: &str) -> Result<Vec<String>, ApiError>;

    /// `GET /branches?bank=&state=&city=` - branches with their IFSC codes.
    async fn branches(
        &self,
        bank: &str,
        state: &str,
        city: &str,
    ) -> Result<Vec<BranchEntry>, ApiError>;

    /// `GET /ifsc/<code>` - the full branch record for one IFSC code.
    async fn lookup_ifsc(&self, code: &str) -> Result<LookupRecord, ApiError>;
}

/// reqwest-backed production client.
pub struct HttpDirectoryApi {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpDirectoryApi {
    pub fn new(settings: &ApiSettings) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(settings.request_timeout_ms))
            .build()?;

        // Trailing slash so Url::join keeps the base path segment.
        let base_url = Url::parse(&format!("{}/", settings.base_url.trim_end_matches('/')))?;

        Ok(Self { client, base_url })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = self.base_url.join(endpoint).expect("valid endpoint path");
        metrics::increment_api_call(endpoint);
        debug!("DirectoryApi: GET {} {:?}", endpoint, query);

        let result = async {
            let response = self.client.get(url).query(query).send().await?;
            if !response.status().is_success() {
                return Err(ApiError::Status(response.status()));
            }
            Ok(response.json::<T>().await?)
        }
        .await;

        if let Err(ref e) = result {
            metrics::increment_api_failure(endpoint);
            warn!("DirectoryApi: GET {} failed: {}", endpoint, e);
        }
        result
    }
}

#[async_trait]
impl DirectoryApi for HttpDirectoryApi {
    async fn banks(&self) -> Result<Vec<String>, ApiError> {
        self.get_json("banks", &[]).await
    }

    async fn states(&self, bank: &str) -> Result<Vec<String>, ApiError> {
        self.get_json("states", &[("bank", bank)]).await
    }

    async fn cities(&self, bank: &str, state: &str) -> Result<Vec<String>, ApiError> {
        self.get_json("cities", &[("bank", bank), ("state", state)])
            .await
    }

    async fn branches(
        &self,
        bank: &str,
        state: &str,
        city: &str,
    ) -> Result<Vec<BranchEntry>, ApiError> {
        self.get_json("branches", &[("bank", bank), ("state", state), ("city", city)])
            .await
    }

    async fn lookup_ifsc(&self, code: &str) -> Result<LookupRecord, ApiError> {
        let mut url = self.base_url.join("ifsc/").expect("valid endpoint path");
        // push() percent-encodes the code as a single path segment
        url.path_segments_mut()
            .expect("http base url always has path segments")
            .pop_if_empty()
            .push(code);

        metrics::increment_api_call("ifsc");
        debug!("DirectoryApi: GET ifsc/{}", code);

        let result = async {
            let response = self.client.get(url).send().await?;
            if !response.status().is_success() {
                return Err(ApiError::Status(response.status()));
            }
            let record = response.json::<LookupRecord>().await?;
            // Error payloads carry no IFSC field; treat them as not-found.
            if record.ifsc.is_none() {
                return Err(ApiError::NotFound(code.to_string()));
            }
            Ok(record)
        }
        .await;

        if let Err(ref e) = result {
            metrics::increment_api_failure("ifsc");
            warn!("DirectoryApi: GET ifsc/{} failed: {}", code, e);
        }
        result
    }
}
