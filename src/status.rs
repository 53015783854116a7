// Status classification for HTTP response metrics
// Maps a raw status code onto the coarse class used as the `status_class` label
//
// Numan Thabit 2025 Nov

use axum::http::StatusCode;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusClass {
    ServerError,
    ClientError,
    Redirection,
    Success,
}

impl StatusClass {
    /// Label value as it appears on `http_response_time`.
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusClass::ServerError => "5xx",
            StatusClass::ClientError => "4xx",
            StatusClass::Redirection => "3xx",
            StatusClass::Success => "2xx",
        }
    }
}

impl fmt::Display for StatusClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<StatusCode> for StatusClass {
    fn from(status: StatusCode) -> Self {
        classify(i32::from(status.as_u16()))
    }
}

/// Classify a status code. Codes below 200 (including 0 and negatives)
/// fall into `2xx`; existing dashboards depend on that bucket.
pub fn classify(status: i32) -> StatusClass {
    match status {
        s if s >= 500 => StatusClass::ServerError,
        s if s >= 400 => StatusClass::ClientError,
        s if s >= 300 => StatusClass::Redirection,
        _ => StatusClass::Success,
    }
}
