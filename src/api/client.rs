//! HTTP client for the grocery list backend.
//!
//! This module provides the `ApiClient` struct with one method per backend
//! endpoint. Authentication rides on the HTTP-only `jwt_token` cookie: the
//! signin response stores it in the client's cookie store and every later
//! request sends it back automatically. Server-rendered callers instead
//! forward the inbound request's cookie through a `RequestContext`.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::models::{
    AddItemRequest, AuthResponse, CreateListRequest, List, RemoveItemRequest,
    SetItemCheckedRequest, SigninRequest, SignupRequest, UpdateItemRequest, UpdateListRequest,
    User,
};

use super::{ApiError, RequestContext};

/// Acknowledgement body the backend sends for logout and delete
#[derive(Debug, Deserialize)]
struct MessageResponse {
    #[allow(dead_code)]
    message: String,
}

/// API client for the grocery list backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    bare_client: Client,
    config: Config,
    context: RequestContext,
}

impl ApiClient {
    /// Create a new API client for the given backend.
    ///
    /// The cookie store carries the session for browser-context calls:
    /// signin sets the `jwt_token` cookie there and every authenticated
    /// endpoint reads it back. Server-context calls go through a second
    /// client without a cookie store, so only a cookie forwarded from the
    /// inbound request can authenticate them.
    pub fn new(config: Config) -> Result<Self> {
        let client = Client::builder().cookie_store(true).build()?;
        let bare_client = Client::builder().build()?;

        Ok(Self {
            client,
            bare_client,
            config,
            context: RequestContext::Browser,
        })
    }

    /// Create a client bound to the given request context, sharing the
    /// connection pools and the cookie store. A server-context clone sends
    /// only the cookie its context forwards; a cookie stored by an earlier
    /// browser-context signin never rides along.
    pub fn with_context(&self, context: RequestContext) -> Self {
        Self {
            client: self.client.clone(), // Cheap clone, shares pool and cookie store
            bare_client: self.bare_client.clone(),
            config: self.config.clone(),
            context,
        }
    }

    /// The context this client sends requests under
    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    /// The underlying client for the current context. Browser calls use the
    /// jar-backed client, server calls the bare one.
    fn http(&self) -> &Client {
        match self.context {
            RequestContext::Browser => &self.client,
            RequestContext::Server { .. } => &self.bare_client,
        }
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.config.endpoint(path);
        debug!(url = %url, server = self.context.is_server(), "GET");

        let response = self
            .http()
            .get(&url)
            .headers(self.context.headers())
            .send()
            .await
            .with_context(|| format!("Failed to send GET request to {}", url))?;

        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.config.endpoint(path);
        debug!(url = %url, server = self.context.is_server(), "POST");

        let response = self
            .http()
            .post(&url)
            .headers(self.context.headers())
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to send POST request to {}", url))?;

        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    /// POST to an endpoint that takes no request body
    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.config.endpoint(path);
        debug!(url = %url, server = self.context.is_server(), "POST");

        let response = self
            .http()
            .post(&url)
            .headers(self.context.headers())
            .send()
            .await
            .with_context(|| format!("Failed to send POST request to {}", url))?;

        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    async fn put<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.config.endpoint(path);
        debug!(url = %url, server = self.context.is_server(), "PUT");

        let response = self
            .http()
            .put(&url)
            .headers(self.context.headers())
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to send PUT request to {}", url))?;

        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.config.endpoint(path);
        debug!(url = %url, server = self.context.is_server(), "DELETE");

        let response = self
            .http()
            .delete(&url)
            .headers(self.context.headers())
            .send()
            .await
            .with_context(|| format!("Failed to send DELETE request to {}", url))?;

        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    /// DELETE with a JSON request body (used for item removal)
    async fn delete_with_body<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.config.endpoint(path);
        debug!(url = %url, server = self.context.is_server(), "DELETE");

        let response = self
            .http()
            .delete(&url)
            .headers(self.context.headers())
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to send DELETE request to {}", url))?;

        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    // ===== Session Endpoints =====

    /// Create an account. On success the backend also signs the new user in
    /// by setting the session cookie.
    pub async fn signup(&self, email: &str, password: &str) -> Result<AuthResponse> {
        let body = SignupRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.post("/signup", &body).await
    }

    /// Sign in with email and password. In browser context the session
    /// cookie lands in the cookie store as a side effect.
    pub async fn signin(&self, email: &str, password: &str) -> Result<AuthResponse> {
        let body = SigninRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.post("/signin", &body).await
    }

    /// Fetch the signed-in user. Fails with `ApiError::Unauthorized` when the
    /// session cookie is missing or expired.
    pub async fn me(&self) -> Result<User> {
        self.get("/me").await
    }

    /// End the session. The backend clears the session cookie.
    pub async fn logout(&self) -> Result<()> {
        let _ack: MessageResponse = self.post_empty("/logout").await?;
        Ok(())
    }

    // ===== List Endpoints =====

    /// Create a list and return it
    pub async fn create_list(&self, name: &str, description: Option<&str>) -> Result<List> {
        let body = CreateListRequest {
            name: name.to_string(),
            description: description.map(str::to_string),
        };
        self.post("/lists", &body).await
    }

    /// Fetch all lists visible to the signed-in user (owned and shared)
    pub async fn lists(&self) -> Result<Vec<List>> {
        self.get("/lists").await
    }

    /// Fetch a single list by id
    pub async fn list(&self, list_id: &str) -> Result<List> {
        self.get(&format!("/lists/{}", list_id)).await
    }

    /// Update a list's name and/or description
    pub async fn update_list(&self, list_id: &str, updates: &UpdateListRequest) -> Result<List> {
        self.put(&format!("/lists/{}", list_id), updates).await
    }

    /// Delete a list. Only the owner may do this.
    pub async fn delete_list(&self, list_id: &str) -> Result<()> {
        let _ack: MessageResponse = self.delete(&format!("/lists/{}", list_id)).await?;
        Ok(())
    }

    /// Add an item to a list and return the updated list
    pub async fn add_item(&self, list_id: &str, item: &AddItemRequest) -> Result<List> {
        self.post(&format!("/lists/{}/items", list_id), item).await
    }

    /// Edit an item in place and return the updated list
    pub async fn update_item(&self, list_id: &str, update: &UpdateItemRequest) -> Result<List> {
        self.put(&format!("/lists/{}/items", list_id), update).await
    }

    /// Remove an item by index and return the updated list
    pub async fn remove_item(&self, list_id: &str, index: usize) -> Result<List> {
        let body = RemoveItemRequest { index };
        self.delete_with_body(&format!("/lists/{}/items", list_id), &body)
            .await
    }

    /// Check or uncheck an item and return the updated list
    pub async fn set_item_checked(
        &self,
        list_id: &str,
        index: usize,
        checked: bool,
    ) -> Result<List> {
        let body = SetItemCheckedRequest { index, checked };
        self.put(&format!("/lists/{}/items/checked", list_id), &body)
            .await
    }

    /// Join a list that was shared with the current user. Joining a list the
    /// user is already on is a no-op and succeeds.
    pub async fn join_shared_list(&self, list_id: &str) -> Result<List> {
        self.post_empty(&format!("/lists/share/{}", list_id)).await
    }
}
