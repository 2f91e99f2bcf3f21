//! Client-side data access for GrocerMe, a shared grocery list app.
//!
//! The backend owns the data; this crate gives frontends a typed way to talk
//! to it. `ApiClient` covers every endpoint, and `AuthSession` answers "is
//! anyone signed in?" without hitting the network on every page navigation.
//!
//! ```no_run
//! use grocerme_client::{ApiClient, AuthSession, Config};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let client = ApiClient::new(Config::from_env())?;
//! let session = AuthSession::new(client.clone());
//!
//! if session.check_authenticated(false).await {
//!     for list in client.lists().await? {
//!         println!("{} ({} to buy)", list.name, list.open_items());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod models;

pub use api::{ApiClient, ApiError, RequestContext};
pub use auth::{AuthSession, AuthStatus, SessionState};
pub use config::Config;
