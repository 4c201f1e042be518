use std::time::Duration;

use serde::de::DeserializeOwned;
use url::Url;

use crate::{EmployeeRecord, FailureKind, FetchError, PageRecord, TransactionRecord};

#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// The three reads the transaction views depend on.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    async fn employees(&self) -> Result<Vec<EmployeeRecord>, FetchError>;

    /// `cursor == None` requests the first page.
    async fn transactions_page(&self, cursor: Option<&str>) -> Result<PageRecord, FetchError>;

    async fn transactions_by_employee(
        &self,
        employee_id: &str,
    ) -> Result<Vec<TransactionRecord>, FetchError>;
}

/// JSON-over-HTTP backend.
///
/// Routes, relative to the base URL:
/// `GET employees`, `GET transactions?cursor=..` and `GET employees/{id}/transactions`.
#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    base_url: Url,
    client: reqwest::Client,
}

impl ReqwestBackend {
    pub fn new(settings: BackendSettings) -> Result<Self, FetchError> {
        let mut base_url = Url::parse(&settings.base_url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(FetchError::new(
                FailureKind::InvalidUrl,
                format!("{} cannot be used as a base url", settings.base_url),
            ));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|()| {
                FetchError::new(FailureKind::InvalidUrl, "base url cannot be a base")
            })?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let body = response.bytes().await.map_err(map_reqwest_error)?;
        serde_json::from_slice(&body)
            .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))
    }
}

#[async_trait::async_trait]
impl Backend for ReqwestBackend {
    async fn employees(&self) -> Result<Vec<EmployeeRecord>, FetchError> {
        let url = self.endpoint(&["employees"])?;
        self.get_json(url).await
    }

    async fn transactions_page(&self, cursor: Option<&str>) -> Result<PageRecord, FetchError> {
        let mut url = self.endpoint(&["transactions"])?;
        if let Some(cursor) = cursor {
            url.query_pairs_mut().append_pair("cursor", cursor);
        }
        self.get_json(url).await
    }

    async fn transactions_by_employee(
        &self,
        employee_id: &str,
    ) -> Result<Vec<TransactionRecord>, FetchError> {
        let url = self.endpoint(&["employees", employee_id, "transactions"])?;
        self.get_json(url).await
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return FetchError::new(FailureKind::Decode, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
