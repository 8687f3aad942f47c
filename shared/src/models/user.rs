//! User Model
//!
//! Read-only here: users are owned by the identity side and only ever
//! referenced as a ticket assignee.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Option<i64>,
    pub login: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    #[serde(default = "default_true")]
    pub activated: bool,
}

fn default_true() -> bool {
    true
}

impl User {
    /// Reference to an already persisted user
    pub fn reference(id: i64) -> Self {
        Self {
            id: Some(id),
            login: String::new(),
            first_name: None,
            last_name: None,
            email: None,
            activated: true,
        }
    }
}
