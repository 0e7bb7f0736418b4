//! Access to the node's `rdm/*` JSON endpoints.

use crate::error::{RdmError, Result};
use crate::types::{PortId, PortStatus, QueueState, TodResponse};
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;

pub const PORT_STATUS_PATH: &str = "rdm/portstatus";
pub const TOD_PATH: &str = "rdm/tod";
pub const QUEUE_PATH: &str = "rdm/queue";

/// Source of the data shown on the status page.
pub trait DeviceSource: Send + Sync {
    fn port_status(&self) -> impl Future<Output = Result<Vec<PortStatus>>> + Send;

    fn tod(&self, port: &PortId) -> impl Future<Output = Result<TodResponse>> + Send;

    fn queue(&self) -> impl Future<Output = Result<QueueState>> + Send;
}

// ---------------------------------------------------------------------------
// HttpSource
// ---------------------------------------------------------------------------

/// [`DeviceSource`] backed by HTTP GETs against the node's web server.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base: Url,
    timeout: Option<Duration>,
}

impl HttpSource {
    /// `base` is the node's root url, e.g. `http://192.168.2.120/`.
    pub fn new(base: &str) -> Result<Self> {
        Ok(Self {
            client: reqwest::Client::new(),
            base: parse_base_url(base)?,
            timeout: None,
        })
    }

    /// Apply a per-request timeout. `None` waits forever.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self, path: &str, query: Option<&str>) -> Result<Url> {
        let mut url = self
            .base
            .join(path)
            .map_err(|_| RdmError::InvalidUrl(format!("{}{path}", self.base)))?;
        url.set_query(query);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let endpoint = url.to_string();
        let mut req = self.client.get(url);
        if let Some(t) = self.timeout {
            req = req.timeout(t);
        }

        let resp = req.send().await.map_err(|e| self.transport(&endpoint, e))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(RdmError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| self.transport(&endpoint, e))?;
        serde_json::from_slice(&body).map_err(|source| RdmError::Decode { endpoint, source })
    }

    fn transport(&self, endpoint: &str, e: reqwest::Error) -> RdmError {
        match self.timeout {
            Some(t) if e.is_timeout() => RdmError::Timeout {
                endpoint: endpoint.to_string(),
                after: t,
            },
            _ => RdmError::Transport {
                endpoint: endpoint.to_string(),
                source: e,
            },
        }
    }
}

impl DeviceSource for HttpSource {
    async fn port_status(&self) -> Result<Vec<PortStatus>> {
        let url = self.endpoint(PORT_STATUS_PATH, None)?;
        self.get_json(url).await
    }

    async fn tod(&self, port: &PortId) -> Result<TodResponse> {
        let url = self.endpoint(TOD_PATH, Some(port.as_str()))?;
        self.get_json(url).await
    }

    async fn queue(&self) -> Result<QueueState> {
        let url = self.endpoint(QUEUE_PATH, None)?;
        self.get_json(url).await
    }
}

/// Parse a node url, adding the trailing slash `Url::join` needs to keep
/// any path prefix.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    let url = Url::parse(&with_slash).map_err(|_| RdmError::InvalidUrl(raw.to_string()))?;
    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(url),
        _ => Err(RdmError::InvalidUrl(raw.to_string())),
    }
}
