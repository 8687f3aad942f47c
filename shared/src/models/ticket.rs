//! Ticket Model

use super::{Label, Project, User};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Ticket entity
///
/// `project` and `assigned_to` are nullable foreign keys. `labels` mirrors
/// the `rel_ticket__label` rows for this ticket; order carries no meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub done: bool,
    pub project: Option<Project>,
    pub assigned_to: Option<User>,
    #[serde(default)]
    pub labels: Vec<Label>,
}

impl Ticket {
    /// New, not yet persisted ticket
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: None,
            due_date: None,
            done: false,
            project: None,
            assigned_to: None,
            labels: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn done(mut self, done: bool) -> Self {
        self.done = done;
        self
    }

    pub fn project(mut self, project: Project) -> Self {
        self.project = Some(project);
        self
    }

    pub fn assigned_to(mut self, user: User) -> Self {
        self.assigned_to = Some(user);
        self
    }

    /// Replace the whole label set
    pub fn labels(mut self, labels: impl IntoIterator<Item = Label>) -> Self {
        self.labels = labels.into_iter().collect();
        self
    }

    /// Ids of the referenced labels, duplicates collapsed
    pub fn label_ids(&self) -> BTreeSet<i64> {
        self.labels.iter().filter_map(|l| l.id).collect()
    }

    pub fn project_id(&self) -> Option<i64> {
        self.project.as_ref().and_then(|p| p.id)
    }

    pub fn assigned_to_id(&self) -> Option<i64> {
        self.assigned_to.as_ref().and_then(|u| u.id)
    }
}
