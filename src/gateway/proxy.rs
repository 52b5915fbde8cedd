use async_trait::async_trait;
use axum::body::Body;
use axum::extract::Request;
use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};
use axum::http::Uri;
use axum::response::Response;
use tracing::debug;

use super::handler::{HandlerError, McpHandler, Mount};
use crate::utils::url::construct_api_url;

const MAX_REQUEST_BODY: usize = 16 * 1024 * 1024;

static HOP_BY_HOP: [HeaderName; 8] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

fn strip_hop_by_hop(headers: &mut HeaderMap) {
    for name in &HOP_BY_HOP {
        headers.remove(name);
    }
}

/// Relays requests to a tool server running at `upstream`.
///
/// Method, path, query, headers and body are forwarded; the upstream status,
/// headers and body are streamed back unchanged. Headers added with
/// [`ProxyHandler::with_header`] replace any the client sent.
#[derive(Debug, Clone)]
pub struct ProxyHandler {
    mount: Mount,
    client: reqwest::Client,
    upstream: String,
    extra_headers: HeaderMap,
}

impl ProxyHandler {
    pub fn new(mount: Mount, client: reqwest::Client, upstream: impl Into<String>) -> Self {
        Self {
            mount,
            client,
            upstream: upstream.into(),
            extra_headers: HeaderMap::new(),
        }
    }

    pub fn mount(&self) -> Mount {
        self.mount
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.extra_headers.insert(name, value);
        self
    }

    fn target_url(&self, uri: &Uri) -> String {
        let path_and_query = uri.path_and_query().map_or("/", |pq| pq.as_str());
        construct_api_url(&self.upstream, path_and_query)
    }
}

#[async_trait]
impl McpHandler for ProxyHandler {
    async fn handle(&self, request: Request) -> Result<Response, HandlerError> {
        let (parts, body) = request.into_parts();
        let url = self.target_url(&parts.uri);
        let body = axum::body::to_bytes(body, MAX_REQUEST_BODY)
            .await
            .map_err(|err| HandlerError::with_source("failed to read request body", err))?;

        let mut headers = parts.headers;
        strip_hop_by_hop(&mut headers);
        headers.remove(header::HOST);
        headers.remove(header::CONTENT_LENGTH);
        for (name, value) in &self.extra_headers {
            headers.insert(name.clone(), value.clone());
        }

        debug!(mount = %self.mount, method = %parts.method, %url, "forwarding request");

        let upstream = self
            .client
            .request(parts.method, &url)
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(|err| {
                HandlerError::with_source(
                    format!("{} upstream request failed: {err}", self.mount),
                    err,
                )
            })?;

        let status = upstream.status();
        let mut response_headers = upstream.headers().clone();
        strip_hop_by_hop(&mut response_headers);

        let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
        *response.status_mut() = status;
        *response.headers_mut() = response_headers;
        Ok(response)
    }
}
