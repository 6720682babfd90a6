//! Schema lifecycle for the work order database.
//!
//! [`initialize`] creates the table on first use and is safe to run every
//! time a process starts. [`status`] reports whether the table exists and
//! how many work orders it holds.

use rusqlite::Connection;
use tracing::debug;

use crate::error::Result;
use crate::schema::{TABLE, schema_sql};

/// Milliseconds a connection waits on a locked database before failing.
pub(crate) const BUSY_TIMEOUT_MS: u64 = 5_000;

/// Creates the work order table and indexes if they are absent.
///
/// Uses `CREATE ... IF NOT EXISTS` inside a transaction, so calling it on
/// an initialized database is a no-op.
pub fn initialize(conn: &mut Connection) -> Result<()> {
    conn.busy_timeout(std::time::Duration::from_millis(BUSY_TIMEOUT_MS))?;
    let tx = conn.transaction()?;
    tx.execute_batch(&schema_sql())?;
    tx.commit()?;
    debug!(table = TABLE, "schema initialized");
    Ok(())
}

/// Returns a snapshot of the work order table.
pub fn status(conn: &Connection) -> Result<StoreStatus> {
    let table_exists: bool = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [TABLE],
        |row| Ok(row.get::<_, i64>(0)? > 0),
    )?;

    if !table_exists {
        return Ok(StoreStatus::default());
    }

    let (open_count, closed_count): (i64, i64) = conn.query_row(
        &format!(
            "SELECT \
                 COALESCE(SUM(CASE WHEN status = 'open' THEN 1 ELSE 0 END), 0), \
                 COALESCE(SUM(CASE WHEN status = 'closed' THEN 1 ELSE 0 END), 0) \
             FROM {TABLE}"
        ),
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    Ok(StoreStatus {
        table_exists,
        open_count: open_count as usize,
        closed_count: closed_count as usize,
    })
}

/// Snapshot of the work order table, returned by [`status`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStatus {
    /// Whether the work order table exists.
    pub table_exists: bool,
    /// Number of open work orders.
    pub open_count: usize,
    /// Number of closed work orders.
    pub closed_count: usize,
}

impl StoreStatus {
    /// Total number of work orders.
    pub fn total(&self) -> usize {
        self.open_count + self.closed_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_on_empty_database() {
        let conn = Connection::open_in_memory().unwrap();
        let status = status(&conn).unwrap();
        assert!(!status.table_exists);
        assert_eq!(status.total(), 0);
    }

    #[test]
    fn test_initialize_and_status() {
        let mut conn = Connection::open_in_memory().unwrap();
        initialize(&mut conn).unwrap();
        let status = status(&conn).unwrap();
        assert!(status.table_exists);
        assert_eq!(status.open_count, 0);
        assert_eq!(status.closed_count, 0);
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let mut conn = Connection::open_in_memory().unwrap();
        initialize(&mut conn).unwrap();
        conn.execute(
            "INSERT INTO work_orders (machine_id, issue, priority, status, created_at) \
             VALUES ('M1', 'Leak', 'med', 'open', '2024-01-01T00:00:00Z')",
            [],
        )
        .unwrap();
        initialize(&mut conn).unwrap();
        assert_eq!(status(&conn).unwrap().open_count, 1);
    }

    #[test]
    fn test_status_counts_by_state() {
        let mut conn = Connection::open_in_memory().unwrap();
        initialize(&mut conn).unwrap();
        conn.execute_batch(
            "INSERT INTO work_orders (machine_id, issue, priority, status, created_at, closed_at) VALUES \
                 ('M1', 'a', 'low', 'open', '2024-01-01T00:00:00Z', NULL), \
                 ('M1', 'b', 'low', 'open', '2024-01-01T00:00:00Z', NULL), \
                 ('M2', 'c', 'high', 'closed', '2024-01-01T00:00:00Z', '2024-01-02T00:00:00Z');",
        )
        .unwrap();
        let status = status(&conn).unwrap();
        assert_eq!(status.open_count, 2);
        assert_eq!(status.closed_count, 1);
        assert_eq!(status.total(), 3);
    }
}
