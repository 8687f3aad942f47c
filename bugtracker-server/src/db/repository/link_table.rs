//! Link Table Manager
//!
//! Maintains a pure junction table `(owner_column, target_column)`. Table and
//! column names come from a `const` [`LinkTable`] definition and are never
//! taken from input; only ids are bound as parameters.

use super::RepoResult;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use std::collections::BTreeSet;

/// SQLite caps bound parameters per statement; two per link row
const MAX_ROWS_PER_INSERT: usize = 400;

/// Junction table definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkTable {
    pub table: &'static str,
    pub owner_column: &'static str,
    pub target_column: &'static str,
}

impl LinkTable {
    pub const fn new(
        table: &'static str,
        owner_column: &'static str,
        target_column: &'static str,
    ) -> Self {
        Self {
            table,
            owner_column,
            target_column,
        }
    }

    /// Replace every link of `owner_id` with exactly `target_ids`
    ///
    /// Delete first, then insert one row per target. An empty set leaves
    /// the owner with no links. Runs on the caller's connection, so it is
    /// atomic when that connection is inside a transaction.
    pub async fn replace_links(
        &self,
        conn: &mut SqliteConnection,
        owner_id: i64,
        target_ids: &BTreeSet<i64>,
    ) -> RepoResult<()> {
        self.delete_links(conn, owner_id).await?;

        let targets: Vec<i64> = target_ids.iter().copied().collect();
        for chunk in targets.chunks(MAX_ROWS_PER_INSERT) {
            let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
                "INSERT INTO {} ({}, {}) ",
                self.table, self.owner_column, self.target_column
            ));
            builder.push_values(chunk, |mut row, target_id| {
                row.push_bind(owner_id).push_bind(*target_id);
            });
            builder.build().execute(&mut *conn).await?;
        }

        tracing::debug!(
            table = self.table,
            owner_id,
            links = targets.len(),
            "Link table synchronized"
        );
        Ok(())
    }

    /// Remove every link of `owner_id`, returning how many rows went away
    pub async fn delete_links(
        &self,
        conn: &mut SqliteConnection,
        owner_id: i64,
    ) -> RepoResult<u64> {
        let sql = format!("DELETE FROM {} WHERE {} = ?", self.table, self.owner_column);
        let result = sqlx::query(&sql).bind(owner_id).execute(&mut *conn).await?;
        Ok(result.rows_affected())
    }

    /// Current targets of `owner_id`
    pub async fn find_targets(
        &self,
        conn: &mut SqliteConnection,
        owner_id: i64,
    ) -> RepoResult<BTreeSet<i64>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ?",
            self.target_column, self.table, self.owner_column
        );
        let targets: Vec<i64> = sqlx::query_scalar(&sql)
            .bind(owner_id)
            .fetch_all(&mut *conn)
            .await?;
        Ok(targets.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Connection;

    const LINK: LinkTable = LinkTable::new("rel_owner__target", "owner_id", "target_id");

    async fn conn() -> SqliteConnection {
        let mut conn = SqliteConnection::connect("sqlite::memory:").await.unwrap();
        sqlx::query(
            "CREATE TABLE rel_owner__target (owner_id INTEGER NOT NULL, target_id INTEGER NOT NULL)",
        )
        .execute(&mut conn)
        .await
        .unwrap();
        conn
    }

    #[tokio::test]
    async fn replace_is_a_full_replace() {
        let mut conn = conn().await;
        LINK.replace_links(&mut conn, 1, &BTreeSet::from([10, 11]))
            .await
            .unwrap();
        LINK.replace_links(&mut conn, 1, &BTreeSet::from([11, 12]))
            .await
            .unwrap();
        assert_eq!(
            LINK.find_targets(&mut conn, 1).await.unwrap(),
            BTreeSet::from([11, 12])
        );
    }

    #[tokio::test]
    async fn empty_set_degenerates_to_delete() {
        let mut conn = conn().await;
        LINK.replace_links(&mut conn, 1, &BTreeSet::from([10]))
            .await
            .unwrap();
        LINK.replace_links(&mut conn, 1, &BTreeSet::new()).await.unwrap();
        assert!(LINK.find_targets(&mut conn, 1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn owners_do_not_interfere() {
        let mut conn = conn().await;
        LINK.replace_links(&mut conn, 1, &BTreeSet::from([10]))
            .await
            .unwrap();
        LINK.replace_links(&mut conn, 2, &BTreeSet::from([10, 20]))
            .await
            .unwrap();

        assert_eq!(LINK.delete_links(&mut conn, 1).await.unwrap(), 1);
        assert!(LINK.find_targets(&mut conn, 1).await.unwrap().is_empty());
        assert_eq!(
            LINK.find_targets(&mut conn, 2).await.unwrap(),
            BTreeSet::from([10, 20])
        );
    }

    #[tokio::test]
    async fn large_sets_are_chunked() {
        let mut conn = conn().await;
        let targets: BTreeSet<i64> = (0..1000).collect();
        LINK.replace_links(&mut conn, 7, &targets).await.unwrap();
        assert_eq!(LINK.find_targets(&mut conn, 7).await.unwrap(), targets);
    }

    #[tokio::test]
    async fn deleting_nothing_is_fine() {
        let mut conn = conn().await;
        assert_eq!(LINK.delete_links(&mut conn, 42).await.unwrap(), 0);
    }
}
