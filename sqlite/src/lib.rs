//! SQLite storage layer for machine work orders.
//!
//! This crate owns the on-disk database file, creates the schema on first
//! use, and exposes create/list/close/query operations over
//! [`WorkOrder`](workorders_core::WorkOrder) records.
//!
//! # Architecture
//!
//! The crate is organized into four modules:
//!
//! - **`schema`**: table DDL with the work order invariants as `CHECK`s
//! - **`migration`**: idempotent initialization and table status
//! - **`convert`**: SQL row to `WorkOrder` transformation
//! - **`store`**: the [`WorkOrderStore`] read and write API
//!
//! # Quick start
//!
//! ```no_run
//! use workorders_core::{NewWorkOrder, Priority};
//! use workorders_sqlite::WorkOrderStore;
//!
//! let store = WorkOrderStore::open("workorders.db").unwrap();
//! let id = store
//!     .add(&NewWorkOrder::new("KMT-102", "Hydraulic leak", Priority::Med).unwrap())
//!     .unwrap();
//! println!("{:?}", store.get_by_id(id).unwrap());
//! ```
//!
//! # Closing twice
//!
//! Closing a work order that is already closed fails with
//! [`StoreError::AlreadyClosed`] and leaves the original `closed_at` intact.

mod convert;
mod error;
mod migration;
mod schema;
mod store;

pub use error::{Result, StoreError};
pub use migration::{StoreStatus, initialize, status};
pub use schema::{TABLE, schema_sql};
pub use store::WorkOrderStore;
