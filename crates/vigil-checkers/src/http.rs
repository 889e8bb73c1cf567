//! HTTP endpoint checker.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http::{header, Method, StatusCode, Uri};
use http_body_util::{BodyExt, Full};
use hyper_util::rt::TokioIo;
use serde_json::json;
use tokio::net::TcpStream;
use tracing::debug;
use vigil_core::{CheckResult, Checker};

use crate::CheckerError;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Configuration for an [`HttpChecker`]. Only `url` is required.
#[derive(Debug, Clone, Default)]
pub struct HttpConfig {
    /// Endpoint to probe. Must be an `http://` URL with a host; the probe
    /// speaks plain HTTP/1.1.
    pub url: String,
    /// Request method. Defaults to `GET`.
    pub method: Option<Method>,
    /// Optional JSON payload sent as the request body.
    pub payload: Option<serde_json::Value>,
    /// Status code that counts as healthy. Defaults to `200`.
    pub status_code: Option<StatusCode>,
    /// If set, the response body must contain this substring.
    pub expect: Option<String>,
    /// Timeout for the whole probe. Defaults to 3s.
    pub timeout: Option<Duration>,
}

/// Probes an HTTP endpoint and fails the tick on connection errors, an
/// unexpected status code or a missing body substring. The observed status
/// code is reported as the check's details.
pub struct HttpChecker {
    uri: Uri,
    /// `host:port` the TCP connection is made to.
    authority: String,
    host: String,
    method: Method,
    expected_status: StatusCode,
    expect: Option<String>,
    payload: Option<Bytes>,
    timeout: Duration,
}

impl HttpChecker {
    pub fn new(config: HttpConfig) -> Result<Self, CheckerError> {
        let uri: Uri = config
            .url
            .parse()
            .map_err(|e| CheckerError::InvalidConfig(format!("unable to parse url: {e}")))?;

        match uri.scheme_str() {
            Some("http") => {}
            Some(other) => {
                return Err(CheckerError::InvalidConfig(format!(
                    "unsupported scheme '{other}': the probe speaks plain http"
                )))
            }
            None => {
                return Err(CheckerError::InvalidConfig(
                    "url must carry an http:// scheme".to_string(),
                ))
            }
        }

        let host = uri
            .host()
            .ok_or_else(|| CheckerError::InvalidConfig("url must contain a host".to_string()))?
            .to_string();
        let authority = format!("{host}:{}", uri.port_u16().unwrap_or(80));

        let payload = match &config.payload {
            Some(value) => Some(Bytes::from(serde_json::to_vec(value).map_err(|e| {
                CheckerError::InvalidConfig(format!("unable to serialize payload: {e}"))
            })?)),
            None => None,
        };

        Ok(Self {
            uri,
            authority,
            host,
            method: config.method.unwrap_or(Method::GET),
            expected_status: config.status_code.unwrap_or(StatusCode::OK),
            expect: config.expect,
            payload,
            timeout: config.timeout.unwrap_or(DEFAULT_TIMEOUT),
        })
    }

    async fn probe(&self) -> CheckResult {
        let stream = match TcpStream::connect(&self.authority).await {
            Ok(stream) => stream,
            Err(e) => {
                debug!(authority = %self.authority, error = %e, "http probe connection failed");
                return CheckResult::failed(format!(
                    "unable to connect to '{}': {e}",
                    self.authority
                ));
            }
        };

        let io = TokioIo::new(stream);
        let (mut sender, conn) = match hyper::client::conn::http1::handshake(io).await {
            Ok(pair) => pair,
            Err(e) => {
                return CheckResult::failed(format!(
                    "http handshake with '{}' failed: {e}",
                    self.authority
                ))
            }
        };

        // Drive the connection in the background.
        tokio::spawn(async move {
            let _ = conn.await;
        });

        let path = self
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        let mut builder = http::Request::builder()
            .method(self.method.clone())
            .uri(path)
            .header(header::HOST, self.host.as_str())
            .header(header::USER_AGENT, "vigil-checkers/0.1");
        if self.payload.is_some() {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
        }
        let body = Full::new(self.payload.clone().unwrap_or_default());
        let request = match builder.body(body) {
            Ok(request) => request,
            Err(e) => return CheckResult::failed(format!("unable to build request: {e}")),
        };

        let response = match sender.send_request(request).await {
            Ok(response) => response,
            Err(e) => {
                return CheckResult::failed(format!(
                    "error while performing '{}' request: {e}",
                    self.method
                ))
            }
        };

        let status = response.status();
        let details = json!({ "status_code": status.as_u16() });
        if status != self.expected_status {
            return CheckResult::failed_with(
                details,
                format!(
                    "received status code '{}' does not match expected status code '{}'",
                    status.as_u16(),
                    self.expected_status.as_u16()
                ),
            );
        }

        if let Some(expect) = &self.expect {
            let collected = match response.into_body().collect().await {
                Ok(collected) => collected.to_bytes(),
                Err(e) => {
                    return CheckResult::failed(format!(
                        "unable to read response body for content check: {e}"
                    ))
                }
            };
            if !String::from_utf8_lossy(&collected).contains(expect.as_str()) {
                return CheckResult::failed_with(
                    details,
                    format!("response body does not contain expected content '{expect}'"),
                );
            }
        }

        CheckResult::ok_with(details)
    }
}

#[async_trait]
impl Checker for HttpChecker {
    async fn check(&self) -> CheckResult {
        match tokio::time::timeout(self.timeout, self.probe()).await {
            Ok(result) => result,
            Err(_) => CheckResult::failed(format!(
                "request to '{}' timed out after {:?}",
                self.uri, self.timeout
            )),
        }
    }
}
