// Tower middleware for request timing
// Wraps any axum handler, method router or router; the wrapped service sees
// the same request and produces the same response as the bare one
//
// Numan Thabit 2025 Nov

use super::identity::{RequestIdentity, RequestName};
use super::RequestObservation;
use crate::metrics::Metrics;
use axum::http::{Request, Response};
use futures::future::BoxFuture;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

#[derive(Clone)]
pub struct TrackLayer {
    metrics: Arc<Metrics>,
    identity: RequestIdentity,
}

impl TrackLayer {
    /// Track under an explicit request label.
    pub fn new(metrics: Arc<Metrics>, request: impl Into<Arc<str>>) -> Self {
        Self::with_identity(metrics, RequestIdentity::fixed(request))
    }

    /// Track under the matched route template.
    pub fn matched_path(metrics: Arc<Metrics>) -> Self {
        Self::with_identity(metrics, RequestIdentity::MatchedPath)
    }

    /// Track under the literal request path.
    pub fn path(metrics: Arc<Metrics>) -> Self {
        Self::with_identity(metrics, RequestIdentity::Path)
    }

    pub fn with_identity(metrics: Arc<Metrics>, identity: RequestIdentity) -> Self {
        Self { metrics, identity }
    }
}

impl<S> Layer<S> for TrackLayer {
    type Service = TrackService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TrackService {
            inner,
            metrics: Arc::clone(&self.metrics),
            identity: self.identity.clone(),
        }
    }
}

#[derive(Clone)]
pub struct TrackService<S> {
    inner: S,
    metrics: Arc<Metrics>,
    identity: RequestIdentity,
}

impl<S, B, R> Service<Request<B>> for TrackService<S>
where
    S: Service<Request<B>, Response = Response<R>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
    R: 'static,
{
    type Response = Response<R>;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<B>) -> Self::Future {
        // keep the service that was driven to readiness
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        let request = self.identity.resolve(&req);
        let method = req.method().as_str().to_string();
        let mut observation = RequestObservation::start(Arc::clone(&self.metrics), request, method);

        Box::pin(async move {
            let result = inner.call(req).await;
            if let Ok(response) = &result {
                if let Some(name) = response.extensions().get::<RequestName>() {
                    observation.rename(name.as_str());
                }
                observation.finish(i32::from(response.status().as_u16()));
            }
            result
        })
    }
}
