use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A grocery list as returned by the API.
///
/// `shared_with` carries the users the owner has shared the list with; the
/// server resolves their IDs to emails and sends an empty email when it
/// cannot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct List {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub items: Vec<ListItem>,
    pub shared_with: Vec<SharedUser>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct ListItem {
    pub name: String,
    pub quantity: i64,
    pub checked: bool,
    pub details: Option<String>,
    pub added_by: String,
    pub added_at: DateTime<Utc>,
}

/// A user a list has been shared with.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct SharedUser {
    pub id: String,
    pub email: String,
}

impl List {
    /// Whether the given user owns this list (as opposed to having it shared).
    pub fn is_owner(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }

    /// Number of items still unchecked.
    pub fn open_items(&self) -> usize {
        self.items.iter().filter(|item| !item.checked).count()
    }
}

// Request bodies. Optional fields are omitted from the JSON entirely when
// unset, matching what the server's omitempty handling expects.

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct CreateListRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct UpdateListRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body for adding an item. The server defaults `quantity` to 1 when it is
/// omitted or not positive.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct AddItemRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Body for editing an item in place. `index` addresses the item within the
/// list; the server rejects out-of-range indexes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct UpdateItemRequest {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct SetItemCheckedRequest {
    pub index: usize,
    pub checked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct RemoveItemRequest {
    pub index: usize,
}
