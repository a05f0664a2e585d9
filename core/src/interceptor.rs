//! Request interceptors run by `HttpClient` before every transport send.

use serde::Deserialize;

use crate::http::{HttpRequest, HttpResponse};
use crate::session::SessionToken;
use crate::transport::TransportError;

pub const AUTHORIZATION: &str = "authorization";

/// A hook that rewrites outgoing requests and observes their outcome.
pub trait Interceptor: Send + Sync {
    fn intercept(&self, request: HttpRequest) -> HttpRequest;

    /// Called once per request with the transport outcome.
    fn on_response(
        &self,
        _request: &HttpRequest,
        _outcome: &Result<HttpResponse, TransportError>,
    ) {
    }
}

/// Attaches the session token as the `authorization` header.
///
/// With no token held the request is forwarded untouched. With a token,
/// any existing `authorization` header is replaced so exactly one is sent.
#[derive(Debug, Clone)]
pub struct AuthInterceptor {
    session: SessionToken,
}

impl AuthInterceptor {
    pub fn new(session: SessionToken) -> Self {
        Self { session }
    }
}

impl Interceptor for AuthInterceptor {
    fn intercept(&self, mut request: HttpRequest) -> HttpRequest {
        if let Some(token) = self.session.get() {
            request.set_header(AUTHORIZATION, token);
        }
        request
    }
}

/// How much of each exchange `LoggingInterceptor` records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpLogLevel {
    None,
    /// Request line, response status and body size.
    #[default]
    Basic,
    /// Basic plus headers. The authorization value is redacted.
    Headers,
    /// Headers plus request and response bodies.
    Body,
}

impl std::str::FromStr for HttpLogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(HttpLogLevel::None),
            "basic" => Ok(HttpLogLevel::Basic),
            "headers" => Ok(HttpLogLevel::Headers),
            "body" => Ok(HttpLogLevel::Body),
            other => Err(format!("unknown http log level: {other}")),
        }
    }
}

/// Emits `tracing` debug events for each request and its outcome.
#[derive(Debug, Clone, Copy)]
pub struct LoggingInterceptor {
    level: HttpLogLevel,
}

impl LoggingInterceptor {
    pub fn new(level: HttpLogLevel) -> Self {
        Self { level }
    }
}

impl Interceptor for LoggingInterceptor {
    fn intercept(&self, request: HttpRequest) -> HttpRequest {
        if self.level == HttpLogLevel::None {
            return request;
        }
        tracing::debug!(method = %request.method, url = %request.url, "--> request");
        if self.level >= HttpLogLevel::Headers {
            for (name, value) in &request.headers {
                let value = if name.eq_ignore_ascii_case(AUTHORIZATION) {
                    "<redacted>"
                } else {
                    value.as_str()
                };
                tracing::debug!(header = %name, value, "--> header");
            }
        }
        if self.level >= HttpLogLevel::Body {
            if let Some(body) = &request.body {
                tracing::debug!(body = %body, "--> body");
            }
        }
        request
    }

    fn on_response(&self, request: &HttpRequest, outcome: &Result<HttpResponse, TransportError>) {
        if self.level == HttpLogLevel::None {
            return;
        }
        match outcome {
            Ok(response) => {
                tracing::debug!(
                    status = response.status,
                    url = %request.url,
                    bytes = response.body.len(),
                    "<-- response"
                );
                if self.level >= HttpLogLevel::Headers {
                    for (name, value) in &response.headers {
                        tracing::debug!(header = %name, value = %value, "<-- header");
                    }
                }
                if self.level >= HttpLogLevel::Body && !response.body.is_empty() {
                    tracing::debug!(body = %response.body, "<-- body");
                }
            }
            Err(err) => {
                tracing::debug!(url = %request.url, error = %err, "<-- HTTP FAILED");
            }
        }
    }
}
