//! Label Model

use serde::{Deserialize, Serialize};

/// Label entity (many-to-many with Ticket via `rel_ticket__label`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub id: Option<i64>,
    pub label: String,
}

impl Label {
    /// Reference to an already persisted label
    pub fn reference(id: i64) -> Self {
        Self {
            id: Some(id),
            label: String::new(),
        }
    }
}
