//! REST API client module for the grocery list backend.
//!
//! This module provides the `ApiClient` for the session and list endpoints.
//!
//! The API authenticates with a JWT carried in an HTTP-only cookie that the
//! signin endpoint sets. `RequestContext` distinguishes browser-style calls
//! (cookie store) from server-rendered ones (forwarded cookie header).

pub mod client;
pub mod context;
pub mod error;

pub use client::ApiClient;
pub use context::RequestContext;
pub use error::ApiError;
