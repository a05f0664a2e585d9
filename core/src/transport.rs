//! The I/O seam: executes an `HttpRequest` and returns an `HttpResponse`.
//!
//! [`HttpTransport`] is the only place the client touches the network.
//! [`UreqTransport`] is the production implementation; tests substitute
//! scripted transports.

use std::future::Future;
use std::time::Duration;

use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Failures where no HTTP response was obtained.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum TransportError {
    /// The round-trip did not finish within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// DNS, TCP, TLS or protocol failure.
    #[error("connection failed: {0}")]
    Connection(String),
}

/// Async transport that performs one HTTP round-trip per call.
///
/// Any status code, including 4xx and 5xx, is returned as an
/// `HttpResponse`; status interpretation belongs to `ApiService`.
pub trait HttpTransport: Send + Sync {
    fn execute(
        &self,
        request: &HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

/// [`HttpTransport`] backed by a blocking `ureq` agent.
///
/// Each call runs on tokio's blocking pool so the caller's runtime threads
/// are never held by network I/O. Polled outside a tokio runtime, a call
/// fails with `TransportError::Connection` instead of panicking.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        // Status codes are data here, not errors.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl HttpTransport for UreqTransport {
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let handle = tokio::runtime::Handle::try_current()
            .map_err(|e| TransportError::Connection(e.to_string()))?;
        let agent = self.agent.clone();
        let request = request.clone();
        handle
            .spawn_blocking(move || execute_blocking(&agent, request))
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?
    }
}

fn execute_blocking(
    agent: &ureq::Agent,
    request: HttpRequest,
) -> Result<HttpResponse, TransportError> {
    let HttpRequest {
        method,
        url,
        headers,
        body,
    } = request;

    let result = match method {
        HttpMethod::Get => {
            let mut builder = agent.get(url.as_str());
            for (name, value) in &headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            builder.call()
        }
        HttpMethod::Delete => {
            let mut builder = agent.delete(url.as_str());
            for (name, value) in &headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            builder.call()
        }
        HttpMethod::Post => {
            let mut builder = agent.post(url.as_str());
            for (name, value) in &headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            match body {
                Some(body) => builder.send(body.as_bytes()),
                None => builder.send_empty(),
            }
        }
    };

    let mut response = result.map_err(map_ureq_error)?;
    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(map_ureq_error)?;

    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}

fn map_ureq_error(err: ureq::Error) -> TransportError {
    match err {
        ureq::Error::Timeout(_) => TransportError::Timeout,
        other => TransportError::Connection(other.to_string()),
    }
}
