// Library root module for promtrack
// Latency instrumentation for HTTP handlers and outbound dependency calls,
// recorded into a Prometheus registry owned by `Metrics`
//
// Numan Thabit 2025 Nov

pub mod api;
pub mod config;
pub mod dependency;
pub mod errors;
pub mod metrics;
pub mod sampler;
pub mod status;
pub mod track;

pub use dependency::Outcome;
pub use errors::TrackError;
pub use metrics::Metrics;
pub use status::{classify, StatusClass};
pub use track::{RequestIdentity, RequestName, TrackLayer};
