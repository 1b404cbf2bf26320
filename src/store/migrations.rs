//! Schema for the onboarding document table.
//!
//! The `schema_version` ledger holds one row per applied step. On open,
//! [`upgrade`] applies each step above the ledger's highest version inside
//! its own transaction, so a half-applied step never gets recorded.

use libsql::Connection;

use crate::error::StoreError;

struct SchemaStep {
    version: i64,
    description: &'static str,
    sql: &'static str,
}

/// Ordered schema history. New steps go at the end with the next version.
static SCHEMA_STEPS: &[SchemaStep] = &[SchemaStep {
    version: 1,
    description: "documents keyed by collection and key",
    sql: r#"
        CREATE TABLE IF NOT EXISTS documents (
            collection TEXT NOT NULL,
            key TEXT NOT NULL,
            body TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            PRIMARY KEY (collection, key)
        );
        CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection);
    "#,
}];

/// Bring the document schema up to the latest version.
pub async fn upgrade(conn: &Connection) -> Result<(), StoreError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        (),
    )
    .await
    .map_err(|e| StoreError::Migration(format!("schema_version table: {e}")))?;

    let applied = applied_version(conn).await?;
    let pending = SCHEMA_STEPS.iter().filter(|step| step.version > applied);

    for step in pending {
        apply(conn, step).await?;
        tracing::info!(
            version = step.version,
            description = step.description,
            "Document schema upgraded"
        );
    }
    Ok(())
}

async fn apply(conn: &Connection, step: &SchemaStep) -> Result<(), StoreError> {
    let fail = |e: libsql::Error| {
        StoreError::Migration(format!(
            "schema v{} ({}): {e}",
            step.version, step.description
        ))
    };

    let tx = conn.transaction().await.map_err(fail)?;
    tx.execute_batch(step.sql).await.map_err(fail)?;
    tx.execute(
        "INSERT INTO schema_version (version, description) VALUES (?1, ?2)",
        libsql::params![step.version, step.description],
    )
    .await
    .map_err(fail)?;
    tx.commit().await.map_err(fail)
}

/// Highest recorded schema version; 0 for a fresh database.
async fn applied_version(conn: &Connection) -> Result<i64, StoreError> {
    let read = |e: libsql::Error| StoreError::Migration(format!("reading schema version: {e}"));

    let mut rows = conn
        .query("SELECT COALESCE(MAX(version), 0) FROM schema_version", ())
        .await
        .map_err(read)?;
    match rows.next().await.map_err(read)? {
        Some(row) => row.get::<i64>(0).map_err(read),
        None => Ok(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_conn() -> Connection {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .unwrap();
        db.connect().unwrap()
    }

    async fn table_exists(conn: &Connection, name: &str) -> bool {
        let mut rows = conn
            .query(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
                libsql::params![name],
            )
            .await
            .unwrap();
        rows.next().await.unwrap().is_some()
    }

    #[tokio::test]
    async fn fresh_database_gets_documents_table() {
        let conn = memory_conn().await;
        upgrade(&conn).await.unwrap();

        assert!(table_exists(&conn, "documents").await);
        assert_eq!(
            applied_version(&conn).await.unwrap(),
            SCHEMA_STEPS.len() as i64
        );
    }

    #[tokio::test]
    async fn reopening_records_each_step_once() {
        let conn = memory_conn().await;
        upgrade(&conn).await.unwrap();
        upgrade(&conn).await.unwrap();

        let mut rows = conn
            .query("SELECT COUNT(*) FROM schema_version", ())
            .await
            .unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(row.get::<i64>(0).unwrap(), SCHEMA_STEPS.len() as i64);
    }

    #[tokio::test]
    async fn failed_step_is_not_recorded() {
        let conn = memory_conn().await;
        // A foreign `documents` table without a `collection` column makes
        // the index creation fail.
        conn.execute("CREATE TABLE documents (id INTEGER PRIMARY KEY)", ())
            .await
            .unwrap();

        let err = upgrade(&conn).await.unwrap_err();
        assert!(matches!(err, StoreError::Migration(_)));
        assert_eq!(applied_version(&conn).await.unwrap(), 0);
    }
}
