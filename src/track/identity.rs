// Request identity resolution
// Decides which `request` label an HTTP observation is filed under
//
// Numan Thabit 2025 Nov

use axum::extract::MatchedPath;
use axum::http::Request;
use std::sync::Arc;

/// `request` label for requests that did not match any route.
pub const UNMATCHED: &str = "unmatched";

/// How the `request` label is derived for a tracked route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestIdentity {
    /// Caller-supplied label, independent of the literal URL.
    Fixed(Arc<str>),
    /// The route template axum matched (`/users/:id`). Requests that hit no
    /// route (fallback 404s) all share the [`UNMATCHED`] label.
    MatchedPath,
    /// The literal request path, query string excluded.
    Path,
}

impl RequestIdentity {
    pub fn fixed(label: impl Into<Arc<str>>) -> Self {
        RequestIdentity::Fixed(label.into())
    }

    pub(crate) fn resolve<B>(&self, req: &Request<B>) -> String {
        match self {
            RequestIdentity::Fixed(label) => label.to_string(),
            RequestIdentity::MatchedPath => req
                .extensions()
                .get::<MatchedPath>()
                .map(|p| p.as_str().to_string())
                .unwrap_or_else(|| UNMATCHED.to_string()),
            RequestIdentity::Path => req.uri().path().to_string(),
        }
    }
}

/// Response extension a handler can attach to name its own request,
/// overriding the identity configured on the layer.
///
/// ```ignore
/// async fn get_user() -> impl IntoResponse {
///     (Extension(RequestName::new("getUser")), "ok")
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestName(Arc<str>);

impl RequestName {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
