// Dependency call tracking
// Times outbound calls (HTTP, Redis, database) and records them into
// `dependency_response_time`, labelled Success or Failure
//
// Numan Thabit 2025 Nov

use crate::metrics::Metrics;
use std::future::Future;
use std::time::Instant;

pub const HTTP: &str = "HTTP";
pub const REDIS: &str = "Redis";
pub const DB: &str = "DB";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Success => "Success",
            Outcome::Failure => "Failure",
        }
    }

    pub fn of<T, E>(result: &Result<T, E>) -> Self {
        if result.is_ok() {
            Outcome::Success
        } else {
            Outcome::Failure
        }
    }
}

/// Pending dependency sample, written on drop. A call that never reports
/// back (panic, cancelled future) counts as a Failure.
struct DependencyObservation<'a> {
    metrics: &'a Metrics,
    dependency: &'a str,
    request: &'a str,
    start: Instant,
    outcome: Outcome,
}

impl<'a> DependencyObservation<'a> {
    fn start(metrics: &'a Metrics, dependency: &'a str, request: &'a str) -> Self {
        Self {
            metrics,
            dependency,
            request,
            start: Instant::now(),
            outcome: Outcome::Failure,
        }
    }

    fn finish(mut self, outcome: Outcome) {
        self.outcome = outcome;
    }
}

impl Drop for DependencyObservation<'_> {
    fn drop(&mut self) {
        self.metrics.record_dependency(
            self.dependency,
            self.request,
            self.outcome.as_str(),
            self.start.elapsed().as_secs_f64(),
        );
    }
}

impl Metrics {
    /// Record a dependency duration measured by the caller.
    ///
    /// `status` is expected to be "Success" or "Failure" but is not checked.
    pub fn record_dependency(&self, dependency: &str, request: &str, status: &str, seconds: f64) {
        self.dependency_time()
            .with_label_values(&[dependency, request, status])
            .observe(seconds);
    }

    /// Call `f(input)` and record how long it took. The result is returned
    /// as produced; an `Err` only selects the Failure label.
    pub fn track_dependency<I, O, E, F>(
        &self,
        request: &str,
        dependency: &str,
        input: I,
        f: F,
    ) -> Result<O, E>
    where
        F: FnOnce(I) -> Result<O, E>,
    {
        let observation = DependencyObservation::start(self, dependency, request);
        let result = f(input);
        observation.finish(Outcome::of(&result));
        result
    }

    /// Async form of [`Metrics::track_dependency`]. The clock stops when the
    /// returned future resolves.
    pub async fn track_dependency_async<I, O, E, F, Fut>(
        &self,
        request: &str,
        dependency: &str,
        input: I,
        f: F,
    ) -> Result<O, E>
    where
        F: FnOnce(I) -> Fut,
        Fut: Future<Output = Result<O, E>>,
    {
        let observation = DependencyObservation::start(self, dependency, request);
        let result = f(input).await;
        observation.finish(Outcome::of(&result));
        result
    }
}
