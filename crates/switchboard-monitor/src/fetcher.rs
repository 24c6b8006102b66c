//! Status fetcher for the proxy's `/v0/backends` endpoint.
//!
//! One GET per call, no retry. Every failure (connect, status, body,
//! decode, timeout) is reported as a [`FetchError`] so the caller can
//! keep whatever it displayed before.

use std::future::Future;
use std::time::Duration;

use http::StatusCode;
use http_body_util::BodyExt;
use thiserror::Error;
use tracing::debug;

use switchboard_core::{decode_backends, BackendRecord, UpstreamConfig};

/// Result type alias for a single fetch.
pub type FetchResult<T> = Result<T, FetchError>;

/// Reasons a fetch can fail.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("connect to {address} failed: {source}")]
    Connect {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("http handshake failed: {0}")]
    Handshake(#[source] hyper::Error),

    #[error("invalid request: {0}")]
    InvalidRequest(#[from] http::Error),

    #[error("request failed: {0}")]
    Send(#[source] hyper::Error),

    #[error("upstream returned {0}")]
    Status(StatusCode),

    #[error("failed to read response body: {0}")]
    Body(#[source] hyper::Error),

    #[error("malformed backends payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

/// Something that can produce the current backend list.
///
/// The poll loop only talks to this trait, so tests can script responses.
pub trait BackendSource: Send + Sync + 'static {
    fn fetch(&self) -> impl Future<Output = FetchResult<Vec<BackendRecord>>> + Send;
}

/// Fetches backends over HTTP/1.1 from the proxy API.
#[derive(Debug, Clone)]
pub struct HttpBackendSource {
    address: String,
    path: String,
    timeout: Duration,
}

impl HttpBackendSource {
    pub fn new(address: &str, path: &str, timeout: Duration) -> Self {
        Self {
            address: address.to_string(),
            path: path.to_string(),
            timeout,
        }
    }

    pub fn from_config(config: &UpstreamConfig) -> Self {
        Self::new(&config.address, &config.path, config.timeout())
    }

    pub fn uri(&self) -> String {
        format!("http://{}{}", self.address, self.path)
    }
}

impl BackendSource for HttpBackendSource {
    async fn fetch(&self) -> FetchResult<Vec<BackendRecord>> {
        fetch_backends(&self.address, &self.path, self.timeout).await
    }
}

/// GET `path` from `address` and decode the JSON array of backends.
pub async fn fetch_backends(
    address: &str,
    path: &str,
    timeout: Duration,
) -> FetchResult<Vec<BackendRecord>> {
    let uri = format!("http://{address}{path}");

    let result = tokio::time::timeout(timeout, get_backends(address, &uri)).await;

    match result {
        Ok(Ok(records)) => {
            debug!(%uri, count = records.len(), "fetched backends");
            Ok(records)
        }
        Ok(Err(e)) => {
            debug!(error = %e, %uri, "backends fetch failed");
            Err(e)
        }
        Err(_) => {
            debug!(%uri, "backends fetch timed out");
            Err(FetchError::Timeout(timeout))
        }
    }
}

async fn get_backends(address: &str, uri: &str) -> FetchResult<Vec<BackendRecord>> {
    let stream = tokio::net::TcpStream::connect(address)
        .await
        .map_err(|source| FetchError::Connect {
            address: address.to_string(),
            source,
        })?;

    let io = hyper_util::rt::TokioIo::new(stream);
    let (mut sender, conn) = hyper::client::conn::http1::handshake(io)
        .await
        .map_err(FetchError::Handshake)?;

    // Drive the connection in the background.
    tokio::spawn(async move {
        let _ = conn.await;
    });

    let req = http::Request::builder()
        .method("GET")
        .uri(uri)
        .header("host", address)
        .header("accept", "application/json")
        .header("user-agent", "switchboard-dashboard/0.1")
        .body(http_body_util::Empty::<bytes::Bytes>::new())?;

    let resp = sender.send_request(req).await.map_err(FetchError::Send)?;
    if !resp.status().is_success() {
        return Err(FetchError::Status(resp.status()));
    }

    let body = resp
        .into_body()
        .collect()
        .await
        .map_err(FetchError::Body)?
        .to_bytes();

    Ok(decode_backends(&body)?)
}
