//! Forwarding of (rewritten) requests to the RESTful backend.

use async_trait::async_trait;
use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderMap, StatusCode, Uri},
    response::Response,
};
use thiserror::Error;
use tracing::debug;
use url::Url;
use wmts_common::WmtsError;

/// Upper bound on a buffered request body.
const MAX_REQUEST_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Headers that describe a single connection and must not be forwarded.
const HOP_BY_HOP_HEADERS: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("Failed to read request body: {0}")]
    Body(String),

    #[error("Unsupported request: {0}")]
    Request(String),

    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("Invalid upstream response: {0}")]
    Response(String),
}

impl From<ForwardError> for WmtsError {
    fn from(err: ForwardError) -> Self {
        WmtsError::Internal(err.to_string())
    }
}

/// Hands a request to the backend and returns its response.
#[async_trait]
pub trait Forwarder: Send + Sync {
    async fn forward(&self, request: Request) -> Result<Response, ForwardError>;
}

/// Reverse proxy to a single backend over HTTP.
pub struct HttpForwarder {
    client: reqwest::Client,
    target: Url,
}

impl HttpForwarder {
    pub fn new(target: Url) -> Result<Self, ForwardError> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self { client, target })
    }

    /// Target URL for a request: the backend's own path prefix followed by
    /// the request path and query. Dot segments in the request path may not
    /// climb out of the prefix.
    fn upstream_url(&self, uri: &Uri) -> Result<Url, ForwardError> {
        let mut url = self.target.clone();
        let prefix = self.target.path().trim_end_matches('/');
        url.set_path(&format!("{}{}", prefix, uri.path()));
        url.set_query(uri.query());

        let path = url.path();
        if !prefix.is_empty() && path != prefix && !path.starts_with(&format!("{}/", prefix)) {
            return Err(ForwardError::Request(format!(
                "path {} leaves the target prefix {}",
                uri.path(),
                prefix
            )));
        }
        Ok(url)
    }

    fn target_host(&self) -> String {
        let host = self.target.host_str().unwrap_or_default();
        match self.target.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        }
    }
}

fn is_hop_by_hop(name: &str) -> bool {
    HOP_BY_HOP_HEADERS.contains(&name)
}

fn incoming_host(headers: &HeaderMap, uri: &Uri) -> Option<String> {
    headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .or_else(|| uri.authority().map(|authority| authority.to_string()))
}

#[async_trait]
impl Forwarder for HttpForwarder {
    async fn forward(&self, request: Request) -> Result<Response, ForwardError> {
        let (parts, body) = request.into_parts();
        let url = self.upstream_url(&parts.uri)?;
        debug!(method = %parts.method, url = %url, "Forwarding request");

        let method = reqwest::Method::from_bytes(parts.method.as_str().as_bytes())
            .map_err(|e| ForwardError::Request(e.to_string()))?;
        let body = axum::body::to_bytes(body, MAX_REQUEST_BODY_BYTES)
            .await
            .map_err(|e| ForwardError::Body(e.to_string()))?;

        let mut upstream = self.client.request(method, url);
        for (name, value) in parts.headers.iter() {
            if *name == header::HOST || is_hop_by_hop(name.as_str()) {
                continue;
            }
            upstream = upstream.header(name.as_str(), value.as_bytes());
        }
        if let Some(host) = incoming_host(&parts.headers, &parts.uri) {
            upstream = upstream.header("x-forwarded-host", host);
        }
        upstream = upstream.header("x-origin-host", self.target_host());

        let upstream = upstream.body(body).send().await?;

        let status = StatusCode::from_u16(upstream.status().as_u16())
            .map_err(|e| ForwardError::Response(e.to_string()))?;
        let mut response = Response::builder().status(status);
        for (name, value) in upstream.headers() {
            if is_hop_by_hop(name.as_str()) {
                continue;
            }
            response = response.header(name.as_str(), value.as_bytes());
        }

        response
            .body(Body::from_stream(upstream.bytes_stream()))
            .map_err(|e| ForwardError::Response(e.to_string()))
    }
}
