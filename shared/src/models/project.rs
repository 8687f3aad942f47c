//! Project Model

use serde::{Deserialize, Serialize};

/// Project entity
///
/// Tickets point at a project through `ticket.project_id`; the project
/// itself holds no back-reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: Option<i64>,
    pub name: String,
}

impl Project {
    /// Reference to an already persisted project
    pub fn reference(id: i64) -> Self {
        Self {
            id: Some(id),
            name: String::new(),
        }
    }
}
