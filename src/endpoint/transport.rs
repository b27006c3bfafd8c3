//! Transport-level pass-through logging.

use std::task::{Context, Poll};

use futures_util::future::BoxFuture;
use tower::{Layer, Service};

/// Layer producing [`TransportLogging`] for one named endpoint.
#[derive(Debug, Clone, Copy)]
pub struct TransportLoggingLayer {
    endpoint: &'static str,
}

impl TransportLoggingLayer {
    pub fn new(endpoint: &'static str) -> Self {
        Self { endpoint }
    }
}

impl<S> Layer<S> for TransportLoggingLayer {
    type Service = TransportLogging<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TransportLogging {
            inner,
            endpoint: self.endpoint,
        }
    }
}

/// Logs `calling endpoint` and `called endpoint` around the inner service.
#[derive(Debug, Clone)]
pub struct TransportLogging<S> {
    inner: S,
    endpoint: &'static str,
}

struct Called(&'static str);

impl Drop for Called {
    fn drop(&mut self) {
        tracing::debug!(method = self.0, "called endpoint");
    }
}

impl<S, Req> Service<Req> for TransportLogging<S>
where
    S: Service<Req>,
    S::Future: Send + 'static,
    S::Response: 'static,
    S::Error: 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<S::Response, S::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Req) -> Self::Future {
        tracing::debug!(method = self.endpoint, "calling endpoint");
        let called = Called(self.endpoint);
        let fut = self.inner.call(req);
        Box::pin(async move {
            let result = fut.await;
            drop(called);
            result
        })
    }
}
