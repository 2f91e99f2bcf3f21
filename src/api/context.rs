//! Where a request originates.
//!
//! During server-side rendering there is no ambient cookie store, so the
//! session cookie from the inbound page request has to be forwarded by hand
//! for the backend to see it. `RequestContext` carries that distinction.

use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use tracing::warn;

/// Execution context for outgoing requests.
///
/// `Browser` relies on the HTTP client's cookie store, which holds whatever
/// the signin endpoint set. `Server` is for render-time calls, where the
/// caller passes along the inbound request's `Cookie` header, if any.
#[derive(Debug, Clone, Default)]
pub enum RequestContext {
    #[default]
    Browser,
    Server { cookie: Option<String> },
}

impl RequestContext {
    /// Context for a server-rendered request, forwarding the inbound
    /// `Cookie` header when one is present.
    pub fn server(cookie: Option<String>) -> Self {
        Self::Server { cookie }
    }

    pub fn is_server(&self) -> bool {
        matches!(self, Self::Server { .. })
    }

    /// Extra headers this context adds to a request.
    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Self::Server { cookie: Some(cookie) } = self {
            match HeaderValue::from_str(cookie) {
                Ok(value) => {
                    headers.insert(COOKIE, value);
                }
                Err(_) => {
                    warn!("Dropping forwarded cookie header with invalid characters");
                }
            }
        }
        headers
    }
}
