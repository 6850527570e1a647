use std::time::Duration;

use browser_logging::browser_debug;
use futures_util::StreamExt;
use reqwest::Url;

use crate::decode::{decode_job_id, decode_sites, decode_status};
use crate::{CopyOrder, FailureKind, SiteInfo, StatusPayload, TransportError};

#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// Prefix of the listing service, e.g. `http://host/web/js`.
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/web/js".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 16 * 1024 * 1024,
        }
    }
}

impl ApiSettings {
    /// URL of one backend route below `base_url`.
    pub fn route(&self, name: &str) -> Result<Url, TransportError> {
        let base = format!("{}/", self.base_url.trim_end_matches('/'));
        Url::parse(&base)
            .and_then(|url| url.join(name))
            .map_err(|err| TransportError::new(FailureKind::InvalidUrl, err.to_string()))
    }
}

/// The backend HTTP surface.
#[async_trait::async_trait]
pub trait ListingApi: Send + Sync {
    /// `GET /list`; returns the job id.
    async fn submit_listing(&self, site: &str, path: &str) -> Result<String, TransportError>;

    /// `GET /status`.
    async fn job_status(&self, job_id: &str) -> Result<StatusPayload, TransportError>;

    /// `GET /copy`; returns the acknowledgment body.
    async fn copy(&self, order: &CopyOrder) -> Result<String, TransportError>;

    /// `GET /sites`.
    async fn sites(&self) -> Result<Vec<SiteInfo>, TransportError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestListingApi {
    settings: ApiSettings,
    client: reqwest::Client,
}

impl ReqwestListingApi {
    pub fn new(settings: ApiSettings) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| TransportError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    async fn get(&self, route: &str, query: &[(&str, &str)]) -> Result<Vec<u8>, TransportError> {
        let url = self.settings.route(route)?;
        browser_debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let max_bytes = self.settings.max_bytes;
        if response
            .content_length()
            .is_some_and(|content_len| content_len > max_bytes)
        {
            return Err(TransportError::new(
                FailureKind::TooLarge { max_bytes },
                "response too large",
            ));
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            if bytes.len() as u64 + chunk.len() as u64 > max_bytes {
                return Err(TransportError::new(
                    FailureKind::TooLarge { max_bytes },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl ListingApi for ReqwestListingApi {
    async fn submit_listing(&self, site: &str, path: &str) -> Result<String, TransportError> {
        let body = self
            .get("list", &[("siteid", site), ("sitepath", path)])
            .await?;
        decode_job_id(&String::from_utf8_lossy(&body))
    }

    async fn job_status(&self, job_id: &str) -> Result<StatusPayload, TransportError> {
        let body = self.get("status", &[("jobid", job_id)]).await?;
        decode_status(&body)
    }

    async fn copy(&self, order: &CopyOrder) -> Result<String, TransportError> {
        let body = self
            .get(
                "copy",
                &[
                    ("source_site", order.source_site.as_str()),
                    ("source_path", order.source_path.as_str()),
                    ("dest_site", order.dest_site.as_str()),
                    ("dest_dir_path", order.dest_dir_path.as_str()),
                ],
            )
            .await?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    async fn sites(&self) -> Result<Vec<SiteInfo>, TransportError> {
        let body = self.get("sites", &[]).await?;
        decode_sites(&body)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        return TransportError::new(FailureKind::Timeout, err.to_string());
    }
    TransportError::new(FailureKind::Network, err.to_string())
}
