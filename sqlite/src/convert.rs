//! Conversion between [`WorkOrder`] values and SQLite rows.
//!
//! Rows are read in two steps: [`WorkOrderRow::from_row`] copies the raw
//! column values out of the statement (the only step that can fail with a
//! `rusqlite::Error`), then [`WorkOrderRow::into_work_order`] parses the
//! enumerated and timestamp columns, reporting bad data as
//! [`StoreError::Conversion`].

use rusqlite::Row;
use workorders_core::{Priority, Status, WorkOrder, parse_timestamp};

use crate::error::{Result, StoreError};

/// Raw column values of one `work_orders` row, in
/// [`COLUMNS`](crate::schema::COLUMNS) order.
#[derive(Debug)]
pub(crate) struct WorkOrderRow {
    id: i64,
    machine_id: String,
    issue: String,
    priority: String,
    status: String,
    created_at: String,
    closed_at: Option<String>,
}

impl WorkOrderRow {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            machine_id: row.get(1)?,
            issue: row.get(2)?,
            priority: row.get(3)?,
            status: row.get(4)?,
            created_at: row.get(5)?,
            closed_at: row.get(6)?,
        })
    }

    pub(crate) fn into_work_order(self) -> Result<WorkOrder> {
        let priority = string_to_priority(&self.priority)?;
        let status = string_to_status(&self.status)?;
        let created_at = parse_timestamp(&self.created_at).ok_or_else(|| {
            StoreError::Conversion(format!(
                "work order #{}: invalid created_at '{}'",
                self.id, self.created_at
            ))
        })?;
        let closed_at = match self.closed_at {
            Some(text) => Some(parse_timestamp(&text).ok_or_else(|| {
                StoreError::Conversion(format!(
                    "work order #{}: invalid closed_at '{text}'",
                    self.id
                ))
            })?),
            None => None,
        };

        Ok(WorkOrder {
            id: self.id,
            machine_id: self.machine_id,
            issue: self.issue,
            priority,
            status,
            created_at,
            closed_at,
        })
    }
}

/// Parses a stored priority.
pub(crate) fn string_to_priority(s: &str) -> Result<Priority> {
    s.parse()
        .map_err(|_| StoreError::Conversion(format!("unknown priority: {s}")))
}

/// Parses a stored status.
pub(crate) fn string_to_status(s: &str) -> Result<Status> {
    s.parse()
        .map_err(|_| StoreError::Conversion(format!("unknown status: {s}")))
}

/// Collects raw rows and converts each one, failing on the first bad row.
pub(crate) fn collect_work_orders(
    rows: impl Iterator<Item = rusqlite::Result<WorkOrderRow>>,
) -> Result<Vec<WorkOrder>> {
    rows.map(|row| row?.into_work_order()).collect()
}
