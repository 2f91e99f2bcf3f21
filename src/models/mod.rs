//! Data models for the grocery list API.
//!
//! This module contains the data structures exchanged with the backend:
//!
//! - `User`, `AuthResponse`: Accounts and authentication responses
//! - `List`, `ListItem`, `SharedUser`: Grocery lists and their contents
//! - Request bodies for the mutating endpoints
//!
//! With the `ts` feature enabled, every type here exports a TypeScript
//! binding for the web frontend.

pub mod list;
pub mod user;

pub use list::{
    AddItemRequest, CreateListRequest, List, ListItem, RemoveItemRequest, SetItemCheckedRequest,
    SharedUser, UpdateItemRequest, UpdateListRequest,
};
pub use user::{AuthResponse, SigninRequest, SignupRequest, User};
