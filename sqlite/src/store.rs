//! Work order CRUD over SQLite.
//!
//! [`WorkOrderStore`] owns a connection whose schema has already been
//! initialized. Every operation is a single statement, except
//! [`close`](WorkOrderStore::close), which pairs its update with a lookup
//! inside one transaction so it can tell a missing record from a closed one.
//!
//! # Example
//!
//! ```
//! use workorders_core::{NewWorkOrder, Priority, Status};
//! use workorders_sqlite::WorkOrderStore;
//!
//! let store = WorkOrderStore::open_in_memory().unwrap();
//!
//! let order = NewWorkOrder::new("KMT-102", "Hydraulic leak", Priority::Med).unwrap();
//! let id = store.add(&order).unwrap();
//!
//! let closed = store.close(id).unwrap();
//! assert_eq!(closed.status, Status::Closed);
//!
//! let history = store.history("KMT-102", None).unwrap();
//! assert_eq!(history.len(), 1);
//! ```

use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info};
use workorders_core::{NewWorkOrder, Status, ValidationError, WorkOrder, format_timestamp, now_utc};

use crate::convert::{self, WorkOrderRow};
use crate::error::{Result, StoreError};
use crate::migration::{self, StoreStatus};
use crate::schema::{COLUMNS, TABLE};

/// Storage handle for work orders.
///
/// Dropping the store closes its connection, so callers scope a store to
/// the operation they perform.
///
/// # Examples
///
/// ```no_run
/// use workorders_core::Status;
/// use workorders_sqlite::WorkOrderStore;
///
/// let store = WorkOrderStore::open("workorders.db").unwrap();
/// for order in store.list(Some(Status::Open)).unwrap() {
///     println!("#{} {} {}", order.id, order.machine_id, order.issue);
/// }
/// ```
pub struct WorkOrderStore {
    conn: Connection,
}

impl WorkOrderStore {
    /// Opens (creating if needed) the database file at `path` and
    /// initializes the schema.
    ///
    /// Missing parent directories are created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        debug!(path = %path.display(), "opening work order database");
        Self::from_connection(Connection::open(path)?)
    }

    /// Opens a private in-memory database with the schema initialized.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    /// Wraps an existing connection, initializing the schema on it.
    pub fn from_connection(mut conn: Connection) -> Result<Self> {
        migration::initialize(&mut conn)?;
        Ok(Self { conn })
    }

    /// Inserts a new open work order and returns its id.
    ///
    /// `created_at` is set to the current UTC time.
    pub fn add(&self, order: &NewWorkOrder) -> Result<i64> {
        let created_at = format_timestamp(&now_utc());
        self.conn.execute(
            &format!(
                "INSERT INTO {TABLE} (machine_id, issue, priority, status, created_at, closed_at) \
                 VALUES (?1, ?2, ?3, 'open', ?4, NULL)"
            ),
            params![
                order.machine_id,
                order.issue,
                order.priority.as_str(),
                created_at
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        info!(id, machine_id = %order.machine_id, priority = %order.priority, "work order added");
        Ok(id)
    }

    /// Lists work orders, newest first, optionally restricted to `status`.
    ///
    /// Returns an empty vector when nothing matches.
    pub fn list(&self, status: Option<Status>) -> Result<Vec<WorkOrder>> {
        match status {
            Some(status) => self.query(
                &format!("SELECT {COLUMNS} FROM {TABLE} WHERE status = ?1 ORDER BY id DESC"),
                params![status.as_str()],
            ),
            None => self.query(
                &format!("SELECT {COLUMNS} FROM {TABLE} ORDER BY id DESC"),
                params![],
            ),
        }
    }

    /// Lists the work orders filed against `machine_id`, newest first,
    /// optionally restricted to `status`.
    ///
    /// The machine id is trimmed before matching.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyMachineId`] if `machine_id` is blank.
    pub fn history(&self, machine_id: &str, status: Option<Status>) -> Result<Vec<WorkOrder>> {
        let machine_id = machine_id.trim();
        if machine_id.is_empty() {
            return Err(ValidationError::EmptyMachineId.into());
        }
        match status {
            Some(status) => self.query(
                &format!(
                    "SELECT {COLUMNS} FROM {TABLE} \
                     WHERE machine_id = ?1 AND status = ?2 ORDER BY id DESC"
                ),
                params![machine_id, status.as_str()],
            ),
            None => self.query(
                &format!("SELECT {COLUMNS} FROM {TABLE} WHERE machine_id = ?1 ORDER BY id DESC"),
                params![machine_id],
            ),
        }
    }

    /// Loads a work order by id, returning `None` if it does not exist.
    pub fn find_by_id(&self, id: i64) -> Result<Option<WorkOrder>> {
        find_in(&self.conn, id)
    }

    /// Loads a work order by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no work order has that id.
    pub fn get_by_id(&self, id: i64) -> Result<WorkOrder> {
        self.find_by_id(id)?.ok_or(StoreError::NotFound(id))
    }

    /// Closes an open work order, stamping `closed_at` with the current UTC
    /// time, and returns the updated record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no work order has that id, or
    /// [`StoreError::AlreadyClosed`] if it was closed earlier; in both cases
    /// nothing is modified.
    pub fn close(&self, id: i64) -> Result<WorkOrder> {
        let tx = self.conn.unchecked_transaction()?;

        let closed_at = format_timestamp(&now_utc());
        let updated = tx.execute(
            &format!(
                "UPDATE {TABLE} SET status = 'closed', closed_at = ?1 \
                 WHERE id = ?2 AND status = 'open'"
            ),
            params![closed_at, id],
        )?;

        let order = find_in(&tx, id)?.ok_or(StoreError::NotFound(id))?;
        if updated == 0 {
            return Err(StoreError::AlreadyClosed(id));
        }

        tx.commit()?;
        info!(id, machine_id = %order.machine_id, "work order closed");
        Ok(order)
    }

    /// Returns open/closed counts for the work order table.
    pub fn status(&self) -> Result<StoreStatus> {
        migration::status(&self.conn)
    }

    fn query(&self, sql: &str, params: &[&dyn rusqlite::ToSql]) -> Result<Vec<WorkOrder>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, WorkOrderRow::from_row)?;
        convert::collect_work_orders(rows)
    }
}

fn find_in(conn: &Connection, id: i64) -> Result<Option<WorkOrder>> {
    let row = conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM {TABLE} WHERE id = ?1"),
            params![id],
            WorkOrderRow::from_row,
        )
        .optional()?;
    row.map(WorkOrderRow::into_work_order).transpose()
}
