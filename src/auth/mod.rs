//! Authentication module for the session check cache.
//!
//! This module provides:
//! - `AuthSession`: Shared guard in front of the `/me` endpoint
//! - `SessionState`: Snapshot of the last observed session
//! - `AuthStatus`: Coarse signed-in / signed-out / unknown view
//!
//! A completed check stays fresh for five minutes; server-side checks
//! bypass the cache entirely.

pub mod session;

pub use session::{AuthSession, AuthStatus, SessionState};
