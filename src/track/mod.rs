// Request-timing middleware
// Brackets a handler with two clock reads and records the elapsed time into
// `http_response_time`, labelled by status class, request identity and method
//
// Numan Thabit 2025 Nov

pub mod identity;
pub mod layer;

pub use identity::{RequestIdentity, RequestName, UNMATCHED};
pub use layer::{TrackLayer, TrackService};

use crate::metrics::Metrics;
use crate::status::{classify, StatusClass};
use std::sync::Arc;
use std::time::Instant;

/// One pending `http_response_time` sample.
///
/// The sample is written when the guard is dropped, so a handler that
/// panics or a future that is cancelled is still counted. Without a status
/// it lands in `5xx`.
pub(crate) struct RequestObservation {
    metrics: Arc<Metrics>,
    request: String,
    method: String,
    start: Instant,
    class: Option<StatusClass>,
}

impl RequestObservation {
    pub(crate) fn start(metrics: Arc<Metrics>, request: String, method: String) -> Self {
        Self {
            metrics,
            request,
            method,
            start: Instant::now(),
            class: None,
        }
    }

    pub(crate) fn rename(&mut self, request: &str) {
        self.request = request.to_string();
    }

    pub(crate) fn finish(mut self, status: i32) {
        self.class = Some(classify(status));
    }
}

impl Drop for RequestObservation {
    fn drop(&mut self) {
        let class = self.class.unwrap_or(StatusClass::ServerError);
        self.metrics
            .observe_request(class, &self.request, &self.method, self.start.elapsed());
    }
}

impl Metrics {
    /// Time a handler that reports its own status code.
    ///
    /// The handler runs synchronously on the caller's thread; its status is
    /// returned unchanged.
    pub fn track_request<F>(self: &Arc<Self>, request: &str, method: &str, handler: F) -> i32
    where
        F: FnOnce() -> i32,
    {
        let observation =
            RequestObservation::start(Arc::clone(self), request.to_string(), method.to_string());
        let status = handler();
        observation.finish(status);
        status
    }
}
