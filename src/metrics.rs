// Metrics registry and instruments
// Creates and registers the task-count gauge and the two latency histograms,
// and renders the registry in Prometheus text exposition format
//
// Numan Thabit 2025 Nov

use crate::errors::TrackError;
use crate::status::StatusClass;
use prometheus::core::Collector;
use prometheus::{Encoder, Gauge, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};
use std::time::Duration;
use tracing::debug;

/// Label names of `http_response_time`, in observation order.
pub const HTTP_LABELS: [&str; 3] = ["status_class", "request", "method"];
/// Label names of `dependency_response_time`, in observation order.
pub const DEPENDENCY_LABELS: [&str; 3] = ["type", "request", "status_class"];

/// Process-wide instruments. Build once at startup and share as `Arc<Metrics>`.
pub struct Metrics {
    registry: Registry,
    goroutine_count: Gauge,
    request_time: HistogramVec,
    dependency_time: HistogramVec,
}

impl Metrics {
    /// Create the instruments in a fresh registry.
    pub fn new() -> Result<Self, TrackError> {
        Self::with_registry(Registry::new())
    }

    /// Create the instruments and register them into `registry`.
    ///
    /// Fails if any of the metric names is already registered there.
    pub fn with_registry(registry: Registry) -> Result<Self, TrackError> {
        let goroutine_count = Gauge::with_opts(
            Opts::new("goroutine", "Number of live async tasks").namespace("go"),
        )
        .map_err(TrackError::Registration)?;

        let request_time = HistogramVec::new(
            HistogramOpts::new("response_time", "Http Request response time for all endpoints")
                .namespace("http"),
            &HTTP_LABELS,
        )
        .map_err(TrackError::Registration)?;

        let dependency_time = HistogramVec::new(
            HistogramOpts::new("response_time", "Response time for all dependencies")
                .namespace("dependency"),
            &DEPENDENCY_LABELS,
        )
        .map_err(TrackError::Registration)?;

        let collectors = || -> [Box<dyn Collector>; 3] {
            [
                Box::new(goroutine_count.clone()),
                Box::new(request_time.clone()),
                Box::new(dependency_time.clone()),
            ]
        };
        for (i, collector) in collectors().into_iter().enumerate() {
            if let Err(err) = registry.register(collector) {
                // leave the caller's registry as it was
                for done in collectors().into_iter().take(i) {
                    let _ = registry.unregister(done);
                }
                return Err(TrackError::Registration(err));
            }
        }
        debug!("registered go_goroutine, http_response_time, dependency_response_time");

        Ok(Self {
            registry,
            goroutine_count,
            request_time,
            dependency_time,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn goroutine_count(&self) -> &Gauge {
        &self.goroutine_count
    }

    pub fn request_time(&self) -> &HistogramVec {
        &self.request_time
    }

    pub fn dependency_time(&self) -> &HistogramVec {
        &self.dependency_time
    }

    /// Record one HTTP response time sample.
    pub fn observe_request(
        &self,
        class: StatusClass,
        request: &str,
        method: &str,
        elapsed: Duration,
    ) {
        self.request_time
            .with_label_values(&[class.as_str(), request, method])
            .observe(elapsed.as_secs_f64());
    }

    /// Overwrite the live task gauge.
    pub fn set_task_count(&self, tasks: usize) {
        self.goroutine_count.set(tasks as f64);
    }

    /// Render every registered family in text exposition format.
    pub fn encode(&self) -> Result<String, TrackError> {
        let encoder = TextEncoder::new();
        let families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&families, &mut buffer)
            .map_err(|e| TrackError::Encode(e.to_string()))?;
        String::from_utf8(buffer).map_err(|e| TrackError::Encode(e.to_string()))
    }

    pub fn content_type(&self) -> &'static str {
        prometheus::TEXT_FORMAT
    }
}
