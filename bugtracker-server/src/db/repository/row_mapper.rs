//! Row Mappers
//!
//! A joined SELECT flattens several tables into one row, so every column is
//! aliased `<prefix>_<column>`. Each mapper reads only its own prefix and
//! returns `None` when that prefix's primary key is NULL, which is how a
//! LEFT JOIN miss shows up.
//!
//! Mappers are pure: they never touch the store.

use shared::models::{Label, Project, Ticket, User};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

fn column(prefix: &str, name: &str) -> String {
    format!("{prefix}_{name}")
}

fn get<'r, T>(row: &'r SqliteRow, prefix: &str, name: &str) -> Result<T, sqlx::Error>
where
    T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get(column(prefix, name).as_str())
}

/// `project` columns: id, name
pub fn project(row: &SqliteRow, prefix: &str) -> Result<Option<Project>, sqlx::Error> {
    let Some(id) = get::<Option<i64>>(row, prefix, "id")? else {
        return Ok(None);
    };
    Ok(Some(Project {
        id: Some(id),
        name: get(row, prefix, "name")?,
    }))
}

/// `app_user` columns: id, login, first_name, last_name, email, activated
pub fn user(row: &SqliteRow, prefix: &str) -> Result<Option<User>, sqlx::Error> {
    let Some(id) = get::<Option<i64>>(row, prefix, "id")? else {
        return Ok(None);
    };
    Ok(Some(User {
        id: Some(id),
        login: get(row, prefix, "login")?,
        first_name: get(row, prefix, "first_name")?,
        last_name: get(row, prefix, "last_name")?,
        email: get(row, prefix, "email")?,
        activated: get(row, prefix, "activated")?,
    }))
}

/// `ticket` own columns only; relations are left empty
///
/// `due_date` is stored as `YYYY-MM-DD` text and decodes to a calendar
/// date, with no time zone involved.
pub fn ticket(row: &SqliteRow, prefix: &str) -> Result<Option<Ticket>, sqlx::Error> {
    let Some(id) = get::<Option<i64>>(row, prefix, "id")? else {
        return Ok(None);
    };
    Ok(Some(Ticket {
        id: Some(id),
        title: get(row, prefix, "title")?,
        description: get(row, prefix, "description")?,
        due_date: get(row, prefix, "due_date")?,
        done: get(row, prefix, "done")?,
        project: None,
        assigned_to: None,
        labels: Vec::new(),
    }))
}

/// Aggregated label column: a JSON array of `{"id", "label"}` objects
///
/// NULL or `[]` both mean "no labels". The result is sorted by id.
pub fn labels(row: &SqliteRow, prefix: &str) -> Result<Vec<Label>, sqlx::Error> {
    let name = column(prefix, "labels");
    let Some(raw) = row.try_get::<Option<String>, _>(name.as_str())? else {
        return Ok(Vec::new());
    };
    let mut labels: Vec<Label> =
        serde_json::from_str(&raw).map_err(|e| sqlx::Error::ColumnDecode {
            index: name,
            source: Box::new(e),
        })?;
    labels.sort_by_key(|l| l.id);
    Ok(labels)
}
