//! Ticket Repository
//!
//! Reads go through [`TicketQuery`], which always joins project and
//! assignee and aggregates labels, so every returned ticket is fully
//! populated. Writes keep `rel_ticket__label` in step with the ticket row:
//!
//! - insert: row, then links for the new id
//! - update: row (must match), then links replaced
//! - delete: links, then row
//!
//! Each write runs inside one transaction on a pooled connection.

use super::ticket_query::{self, LABEL_LINK, TICKET_TABLE};
use super::{Criteria, Pageable, RepoError, RepoResult, TicketColumn, TicketQuery};
use shared::models::Ticket;
use sqlx::SqlitePool;
use std::collections::BTreeSet;

// ── Reads ───────────────────────────────────────────────────

/// Every ticket, store order
pub fn find_all(pool: &SqlitePool) -> TicketQuery<'_> {
    TicketQuery::new(pool, None, None)
}

/// One page of tickets
pub fn find_all_paged<'p>(pool: &'p SqlitePool, pageable: &Pageable) -> TicketQuery<'p> {
    TicketQuery::new(pool, Some(pageable), None)
}

/// Tickets matching `criteria`, optionally paged
pub fn find_all_by<'p>(
    pool: &'p SqlitePool,
    pageable: Option<&Pageable>,
    criteria: Option<&Criteria>,
) -> TicketQuery<'p> {
    TicketQuery::new(pool, pageable, criteria)
}

/// The ticket with `id`, or `None`
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Ticket>> {
    TicketQuery::new(pool, None, Some(&Criteria::id_eq(id)))
        .fetch_first()
        .await
}

/// Same as [`find_by_id`]; relations are always loaded
pub async fn find_one_with_eager_relationships(
    pool: &SqlitePool,
    id: i64,
) -> RepoResult<Option<Ticket>> {
    find_by_id(pool, id).await
}

/// Same as [`find_all`] / [`find_all_paged`]; relations are always loaded
pub fn find_all_with_eager_relationships<'p>(
    pool: &'p SqlitePool,
    pageable: Option<&Pageable>,
) -> TicketQuery<'p> {
    TicketQuery::new(pool, pageable, None)
}

pub fn find_by_project(pool: &SqlitePool, project_id: i64) -> TicketQuery<'_> {
    let criteria = Criteria::eq(TicketColumn::ProjectId, project_id);
    TicketQuery::new(pool, None, Some(&criteria))
}

pub fn find_all_where_project_is_null(pool: &SqlitePool) -> TicketQuery<'_> {
    let criteria = Criteria::is_null(TicketColumn::ProjectId);
    TicketQuery::new(pool, None, Some(&criteria))
}

pub fn find_by_assigned_to(pool: &SqlitePool, user_id: i64) -> TicketQuery<'_> {
    let criteria = Criteria::eq(TicketColumn::AssignedToId, user_id);
    TicketQuery::new(pool, None, Some(&criteria))
}

pub fn find_all_where_assigned_to_is_null(pool: &SqlitePool) -> TicketQuery<'_> {
    let criteria = Criteria::is_null(TicketColumn::AssignedToId);
    TicketQuery::new(pool, None, Some(&criteria))
}

/// Tickets linked to `label_id` through `rel_ticket__label`
pub fn find_by_label(pool: &SqlitePool, label_id: i64) -> TicketQuery<'_> {
    let criteria = Criteria::has_label(label_id);
    TicketQuery::new(pool, None, Some(&criteria))
}

pub async fn count(pool: &SqlitePool, criteria: Option<&Criteria>) -> RepoResult<i64> {
    ticket_query::count(pool, criteria).await
}

pub async fn exists_by_id(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    Ok(count(pool, Some(&Criteria::id_eq(id))).await? > 0)
}

/// Label ids currently linked to the ticket
pub async fn label_ids(pool: &SqlitePool, ticket_id: i64) -> RepoResult<BTreeSet<i64>> {
    let mut conn = pool.acquire().await?;
    LABEL_LINK.find_targets(&mut conn, ticket_id).await
}

// ── Writes ──────────────────────────────────────────────────

/// Foreign keys and link targets resolved from the entity graph
struct References {
    project_id: Option<i64>,
    assigned_to_id: Option<i64>,
    label_ids: BTreeSet<i64>,
}

impl References {
    fn resolve(ticket: &Ticket) -> RepoResult<Self> {
        if ticket.project.as_ref().is_some_and(|p| p.id.is_none()) {
            return Err(RepoError::Validation(
                "ticket references a project without id".into(),
            ));
        }
        if ticket.assigned_to.as_ref().is_some_and(|u| u.id.is_none()) {
            return Err(RepoError::Validation(
                "ticket references a user without id".into(),
            ));
        }
        if ticket.labels.iter().any(|l| l.id.is_none()) {
            return Err(RepoError::Validation(
                "ticket references a label without id".into(),
            ));
        }
        Ok(Self {
            project_id: ticket.project_id(),
            assigned_to_id: ticket.assigned_to_id(),
            label_ids: ticket.label_ids(),
        })
    }
}

/// Persist a new ticket and link its labels
///
/// The ticket must not carry an id; the store assigns it. Returns the
/// same entity with `id` filled in.
pub async fn insert(pool: &SqlitePool, ticket: Ticket) -> RepoResult<Ticket> {
    if ticket.id.is_some() {
        return Err(RepoError::Validation(
            "A new ticket cannot already have an id".into(),
        ));
    }
    let refs = References::resolve(&ticket)?;

    let mut tx = pool.begin().await?;
    let id = sqlx::query_scalar::<_, i64>(&format!(
        "INSERT INTO {TICKET_TABLE} (title, description, due_date, done, project_id, assigned_to_id) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6) RETURNING id"
    ))
    .bind(&ticket.title)
    .bind(&ticket.description)
    .bind(ticket.due_date)
    .bind(ticket.done)
    .bind(refs.project_id)
    .bind(refs.assigned_to_id)
    .fetch_one(&mut *tx)
    .await?;

    LABEL_LINK.replace_links(&mut tx, id, &refs.label_ids).await?;
    tx.commit().await?;

    tracing::debug!(ticket_id = id, labels = refs.label_ids.len(), "Ticket inserted");
    Ok(Ticket {
        id: Some(id),
        ..ticket
    })
}

/// Overwrite an existing ticket and replace its label set
///
/// Fails with [`RepoError::StaleUpdate`] when no row has the ticket's id;
/// the link table is left untouched in that case. Labels absent from
/// `ticket.labels` are unlinked.
pub async fn update(pool: &SqlitePool, ticket: Ticket) -> RepoResult<Ticket> {
    let Some(id) = ticket.id else {
        return Err(RepoError::Validation(
            "Cannot update a ticket without id".into(),
        ));
    };
    let refs = References::resolve(&ticket)?;

    let mut tx = pool.begin().await?;
    let result = sqlx::query(&format!(
        "UPDATE {TICKET_TABLE} SET title = ?1, description = ?2, due_date = ?3, done = ?4, \
         project_id = ?5, assigned_to_id = ?6 WHERE id = ?7"
    ))
    .bind(&ticket.title)
    .bind(&ticket.description)
    .bind(ticket.due_date)
    .bind(ticket.done)
    .bind(refs.project_id)
    .bind(refs.assigned_to_id)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        tracing::warn!(ticket_id = id, "Update matched no ticket");
        return Err(RepoError::StaleUpdate(id));
    }

    LABEL_LINK.replace_links(&mut tx, id, &refs.label_ids).await?;
    tx.commit().await?;

    tracing::debug!(ticket_id = id, labels = refs.label_ids.len(), "Ticket updated");
    Ok(ticket)
}

/// Insert when the ticket has no id, update otherwise
pub async fn save(pool: &SqlitePool, ticket: Ticket) -> RepoResult<Ticket> {
    match ticket.id {
        None => insert(pool, ticket).await,
        Some(_) => update(pool, ticket).await,
    }
}

/// Remove the ticket's links, then the ticket
///
/// Deleting a missing id is a no-op. Returns whether a ticket row was
/// removed.
pub async fn delete_by_id(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let mut tx = pool.begin().await?;
    let links = LABEL_LINK.delete_links(&mut tx, id).await?;
    let result = sqlx::query(&format!("DELETE FROM {TICKET_TABLE} WHERE id = ?"))
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    let deleted = result.rows_affected() > 0;
    tracing::debug!(ticket_id = id, links, deleted, "Ticket deleted");
    Ok(deleted)
}
