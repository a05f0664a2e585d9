//! Interceptor pipeline in front of an [`HttpTransport`].

use crate::http::{HttpRequest, HttpResponse};
use crate::interceptor::Interceptor;
use crate::transport::{HttpTransport, TransportError};

/// Runs the ordered interceptor chain over each request, then sends it.
pub struct HttpClient<T> {
    transport: T,
    interceptors: Vec<Box<dyn Interceptor>>,
}

impl<T: HttpTransport> HttpClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            interceptors: Vec::new(),
        }
    }

    /// Append an interceptor. Interceptors run in the order they were added.
    pub fn with_interceptor(mut self, interceptor: impl Interceptor + 'static) -> Self {
        self.interceptors.push(Box::new(interceptor));
        self
    }

    pub async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let request = self
            .interceptors
            .iter()
            .fold(request, |request, interceptor| interceptor.intercept(request));
        let outcome = self.transport.execute(&request).await;
        for interceptor in &self.interceptors {
            interceptor.on_response(&request, &outcome);
        }
        outcome
    }
}

impl<T> std::fmt::Debug for HttpClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("interceptors", &self.interceptors.len())
            .finish_non_exhaustive()
    }
}
