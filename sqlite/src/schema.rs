//! SQL schema for the work order table.
//!
//! The table enforces the work order invariants at the storage boundary, so
//! rows written by any tool (not only this crate) stay consistent:
//!
//! - `priority` and `status` are restricted to their enumerated values
//! - `machine_id` and `issue` must not be empty or only spaces
//! - `closed_at` is present exactly when `status` is `closed`

/// Name of the single table holding work orders.
pub const TABLE: &str = "work_orders";

/// Columns selected when loading a [`WorkOrder`](workorders_core::WorkOrder),
/// in the order read by the row converter.
pub(crate) const COLUMNS: &str = "id, machine_id, issue, priority, status, created_at, closed_at";

/// Returns the idempotent schema creation SQL.
pub fn schema_sql() -> String {
    format!(
        r#"
CREATE TABLE IF NOT EXISTS {TABLE} (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    machine_id TEXT NOT NULL CHECK (length(trim(machine_id)) > 0),
    issue TEXT NOT NULL CHECK (length(trim(issue)) > 0),
    priority TEXT NOT NULL CHECK (priority IN ('low', 'med', 'high')),
    status TEXT NOT NULL DEFAULT 'open' CHECK (status IN ('open', 'closed')),
    created_at TEXT NOT NULL,
    closed_at TEXT,
    CHECK ((status = 'open' AND closed_at IS NULL) OR (status = 'closed' AND closed_at IS NOT NULL))
);

CREATE INDEX IF NOT EXISTS idx_{TABLE}_machine ON {TABLE}(machine_id);
CREATE INDEX IF NOT EXISTS idx_{TABLE}_status ON {TABLE}(status);
"#
    )
}
