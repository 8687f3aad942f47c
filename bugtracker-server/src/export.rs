//! JSON lines export
//!
//! Streams every ticket out of the store without materializing the full
//! set. The output writer is acquired per line and released before the next
//! row is awaited: the SQLite worker thread logs each statement through the
//! global subscriber, which may share that writer.

use crate::db::repository::ticket;
use crate::utils::AppResult;
use futures::TryStreamExt;
use sqlx::SqlitePool;
use std::io::Write;

/// Write each ticket, fully loaded, as one JSON object per line
///
/// `make_writer` is called once per ticket. Returns the number of tickets
/// written.
pub async fn export_json_lines<W, F>(pool: &SqlitePool, make_writer: F) -> AppResult<usize>
where
    W: Write,
    F: Fn() -> W,
{
    let query = ticket::find_all(pool);
    let mut tickets = query.fetch();
    let mut count = 0usize;
    while let Some(ticket) = tickets.try_next().await? {
        let mut out = make_writer();
        serde_json::to_writer(&mut out, &ticket)?;
        writeln!(out)?;
        count += 1;
    }
    Ok(count)
}
