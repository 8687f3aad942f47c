//! Ticket Query Builder
//!
//! Builds the single eager-loading SELECT used by every ticket read:
//!
//! ```text
//! ticket e
//!   LEFT OUTER JOIN project project     ON e.project_id     = project.id
//!   LEFT OUTER JOIN app_user assignedTo ON e.assigned_to_id = assignedTo.id
//! ```
//!
//! Every selected column is aliased `<prefix>_<column>` (`e_`, `project_`,
//! `assignedTo_`) so the row mappers can split the flat row again. The
//! ticket's labels ride along as one aggregated JSON column (`e_labels`),
//! so one ticket is still one row and no follow-up query is needed.
//!
//! Filters are [`Criteria`] values rendered against the ticket alias only;
//! every value is a bound parameter. Column names come from
//! [`TicketColumn`], never from strings.

use super::link_table::LinkTable;
use super::row_mapper;
use super::RepoResult;
use chrono::NaiveDate;
use futures::stream::BoxStream;
use futures::{StreamExt, TryStreamExt};
use shared::models::Ticket;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, SqlitePool};

pub const TICKET_TABLE: &str = "ticket";
pub const TICKET_ALIAS: &str = "e";
pub const PROJECT_ALIAS: &str = "project";
pub const ASSIGNED_TO_ALIAS: &str = "assignedTo";

/// Ticket <-> Label junction
pub const LABEL_LINK: LinkTable = LinkTable::new("rel_ticket__label", "ticket_id", "label_id");

const TICKET_COLUMNS: &[&str] = &[
    "id",
    "title",
    "description",
    "due_date",
    "done",
    "project_id",
    "assigned_to_id",
];
const PROJECT_COLUMNS: &[&str] = &["id", "name"];
const USER_COLUMNS: &[&str] = &["id", "login", "first_name", "last_name", "email", "activated"];

// ── Columns, values, criteria ───────────────────────────────

/// Columns of the `ticket` table usable in filters and sorting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketColumn {
    Id,
    Title,
    Description,
    DueDate,
    Done,
    ProjectId,
    AssignedToId,
}

impl TicketColumn {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketColumn::Id => "id",
            TicketColumn::Title => "title",
            TicketColumn::Description => "description",
            TicketColumn::DueDate => "due_date",
            TicketColumn::Done => "done",
            TicketColumn::ProjectId => "project_id",
            TicketColumn::AssignedToId => "assigned_to_id",
        }
    }
}

/// A bound parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Integer(i64),
    Text(String),
    Bool(bool),
    Date(NaiveDate),
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Integer(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(v: NaiveDate) -> Self {
        SqlValue::Date(v)
    }
}

/// Typed filter over the ticket's own columns
#[derive(Debug, Clone, PartialEq)]
pub enum Criteria {
    Eq(TicketColumn, SqlValue),
    IsNull(TicketColumn),
    /// Ticket is linked to the label through the junction table
    HasLabel(i64),
    And(Vec<Criteria>),
}

impl Criteria {
    pub fn eq(column: TicketColumn, value: impl Into<SqlValue>) -> Self {
        Criteria::Eq(column, value.into())
    }

    pub fn id_eq(id: i64) -> Self {
        Criteria::eq(TicketColumn::Id, id)
    }

    pub fn is_null(column: TicketColumn) -> Self {
        Criteria::IsNull(column)
    }

    pub fn has_label(label_id: i64) -> Self {
        Criteria::HasLabel(label_id)
    }

    /// Conjunction, flattening nested `And`s
    pub fn and(self, other: Criteria) -> Self {
        let mut parts = match self {
            Criteria::And(parts) => parts,
            single => vec![single],
        };
        match other {
            Criteria::And(more) => parts.extend(more),
            single => parts.push(single),
        }
        Criteria::And(parts)
    }

    fn render(&self, sql: &mut String, binds: &mut Vec<SqlValue>) {
        match self {
            Criteria::Eq(column, value) => {
                sql.push_str(&format!("{TICKET_ALIAS}.{} = ?", column.as_str()));
                binds.push(value.clone());
            }
            Criteria::IsNull(column) => {
                sql.push_str(&format!("{TICKET_ALIAS}.{} IS NULL", column.as_str()));
            }
            Criteria::HasLabel(label_id) => {
                sql.push_str(&format!(
                    "EXISTS (SELECT 1 FROM {table} rl WHERE rl.{owner} = {TICKET_ALIAS}.id AND rl.{target} = ?)",
                    table = LABEL_LINK.table,
                    owner = LABEL_LINK.owner_column,
                    target = LABEL_LINK.target_column,
                ));
                binds.push(SqlValue::Integer(*label_id));
            }
            Criteria::And(parts) if parts.is_empty() => sql.push_str("1 = 1"),
            Criteria::And(parts) => {
                sql.push('(');
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        sql.push_str(" AND ");
                    }
                    part.render(sql, binds);
                }
                sql.push(')');
            }
        }
    }
}

// ── Pagination ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    fn as_sql(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub column: TicketColumn,
    pub direction: Direction,
}

/// Zero-based page request with optional sort keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pageable {
    pub page: u32,
    pub size: u32,
    pub sort: Vec<Sort>,
}

impl Pageable {
    pub fn of(page: u32, size: u32) -> Self {
        Self {
            page,
            size,
            sort: Vec::new(),
        }
    }

    pub fn sort_by(mut self, column: TicketColumn, direction: Direction) -> Self {
        self.sort.push(Sort { column, direction });
        self
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }
}

// ── Statement assembly ──────────────────────────────────────

fn push_columns(sql: &mut String, alias: &str, columns: &[&str]) {
    for column in columns {
        if !sql.ends_with("SELECT ") {
            sql.push_str(", ");
        }
        sql.push_str(&format!("{alias}.{column} AS {alias}_{column}"));
    }
}

fn push_where(sql: &mut String, binds: &mut Vec<SqlValue>, criteria: Option<&Criteria>) {
    if let Some(criteria) = criteria {
        sql.push_str(" WHERE ");
        criteria.render(sql, binds);
    }
}

/// Full eager-loading SELECT plus its bound values
pub fn select_sql(
    pageable: Option<&Pageable>,
    criteria: Option<&Criteria>,
) -> (String, Vec<SqlValue>) {
    let mut sql = String::from("SELECT ");
    let mut binds = Vec::new();

    push_columns(&mut sql, TICKET_ALIAS, TICKET_COLUMNS);
    push_columns(&mut sql, PROJECT_ALIAS, PROJECT_COLUMNS);
    push_columns(&mut sql, ASSIGNED_TO_ALIAS, USER_COLUMNS);
    sql.push_str(&format!(
        ", (SELECT json_group_array(json_object('id', lbl.id, 'label', lbl.label)) \
         FROM {table} rl JOIN label lbl ON lbl.id = rl.{target} \
         WHERE rl.{owner} = {TICKET_ALIAS}.id) AS {TICKET_ALIAS}_labels",
        table = LABEL_LINK.table,
        owner = LABEL_LINK.owner_column,
        target = LABEL_LINK.target_column,
    ));

    sql.push_str(&format!(
        " FROM {TICKET_TABLE} {TICKET_ALIAS} \
         LEFT OUTER JOIN project {PROJECT_ALIAS} ON {TICKET_ALIAS}.project_id = {PROJECT_ALIAS}.id \
         LEFT OUTER JOIN app_user {ASSIGNED_TO_ALIAS} ON {TICKET_ALIAS}.assigned_to_id = {ASSIGNED_TO_ALIAS}.id"
    ));

    push_where(&mut sql, &mut binds, criteria);

    if let Some(pageable) = pageable {
        if !pageable.sort.is_empty() {
            let keys: Vec<String> = pageable
                .sort
                .iter()
                .map(|s| format!("{TICKET_ALIAS}.{} {}", s.column.as_str(), s.direction.as_sql()))
                .collect();
            sql.push_str(&format!(" ORDER BY {}", keys.join(", ")));
        }
        sql.push_str(" LIMIT ? OFFSET ?");
        binds.push(SqlValue::Integer(i64::from(pageable.size)));
        binds.push(SqlValue::Integer(pageable.offset()));
    }

    (sql, binds)
}

/// `COUNT(*)` over the same filter
pub fn count_sql(criteria: Option<&Criteria>) -> (String, Vec<SqlValue>) {
    let mut sql = format!("SELECT COUNT(*) FROM {TICKET_TABLE} {TICKET_ALIAS}");
    let mut binds = Vec::new();
    push_where(&mut sql, &mut binds, criteria);
    (sql, binds)
}

/// Attach bound values in order
pub fn bind_values<'q>(
    mut query: sqlx::query::Query<'q, Sqlite, <Sqlite as sqlx::Database>::Arguments<'q>>,
    values: &'q [SqlValue],
) -> sqlx::query::Query<'q, Sqlite, <Sqlite as sqlx::Database>::Arguments<'q>> {
    for value in values {
        query = match value {
            SqlValue::Integer(v) => query.bind(*v),
            SqlValue::Text(v) => query.bind(v.as_str()),
            SqlValue::Bool(v) => query.bind(*v),
            SqlValue::Date(v) => query.bind(*v),
        };
    }
    query
}

/// Row reducer: one flat joined row into a ticket graph
///
/// A missing project or assignee join leaves the field `None`.
pub fn process(row: &SqliteRow) -> Result<Ticket, sqlx::Error> {
    let mut ticket = row_mapper::ticket(row, TICKET_ALIAS)?
        .ok_or_else(|| sqlx::Error::Decode("ticket row without id".into()))?;
    ticket.project = row_mapper::project(row, PROJECT_ALIAS)?;
    ticket.assigned_to = row_mapper::user(row, ASSIGNED_TO_ALIAS)?;
    ticket.labels = row_mapper::labels(row, TICKET_ALIAS)?;
    Ok(ticket)
}

// ── Deferred query ──────────────────────────────────────────

/// A built, not yet executed ticket query
///
/// Nothing touches the store until one of the `fetch*` methods is awaited
/// or polled; the same query can be run several times.
#[derive(Debug, Clone)]
pub struct TicketQuery<'p> {
    pool: &'p SqlitePool,
    sql: String,
    binds: Vec<SqlValue>,
}

impl<'p> TicketQuery<'p> {
    pub fn new(
        pool: &'p SqlitePool,
        pageable: Option<&Pageable>,
        criteria: Option<&Criteria>,
    ) -> Self {
        let (sql, binds) = select_sql(pageable, criteria);
        Self { pool, sql, binds }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Lazy sequence of tickets; dropping the stream stops reading rows
    pub fn fetch(&self) -> BoxStream<'_, RepoResult<Ticket>> {
        bind_values(sqlx::query(&self.sql), &self.binds)
            .fetch(self.pool)
            .map(|row| -> RepoResult<Ticket> {
                let row = row?;
                Ok(process(&row)?)
            })
            .boxed()
    }

    pub async fn fetch_all(&self) -> RepoResult<Vec<Ticket>> {
        self.fetch().try_collect().await
    }

    /// First match, or `None` when nothing matches
    pub async fn fetch_first(&self) -> RepoResult<Option<Ticket>> {
        let mut stream = self.fetch();
        stream.try_next().await
    }
}

/// Number of tickets matching `criteria`
pub async fn count(pool: &SqlitePool, criteria: Option<&Criteria>) -> RepoResult<i64> {
    let (sql, binds) = count_sql(criteria);
    let row = bind_values(sqlx::query(&sql), &binds).fetch_one(pool).await?;
    Ok(row.try_get::<i64, _>(0)?)
}
