//! Core work order types, validation, and configuration.
//!
//! This crate defines the foundational types shared by the storage backend
//! and both front ends:
//!
//! - [`WorkOrder`]: a persisted maintenance request tied to a machine.
//! - [`NewWorkOrder`]: validated input for creating a work order.
//! - [`Priority`] and [`Status`]: the enumerated fields, with
//!   [`FromStr`](std::str::FromStr) parsing that reports [`ValidationError`].
//! - [`AppConfig`]: YAML configuration shared by the binaries.
//!
//! Timestamps are always UTC and are rendered by [`format_timestamp`] as
//! ISO-8601 with second precision and a `Z` suffix.
//!
//! # Example
//!
//! ```
//! use workorders_core::*;
//!
//! let order = NewWorkOrder::parse(" KMT-102 ", "Hydraulic leak", "med").unwrap();
//! assert_eq!(order.machine_id, "KMT-102");
//! assert_eq!(order.priority, Priority::Med);
//!
//! assert_eq!(
//!     NewWorkOrder::parse("KMT-102", "Hydraulic leak", "urgent").unwrap_err(),
//!     ValidationError::InvalidPriority("urgent".into()),
//! );
//! ```

pub mod config;
mod timestamp;
mod types;
mod validate;

pub use config::{AppConfig, ConfigError, WebConfig};
pub use timestamp::{TIMESTAMP_FORMAT, format_timestamp, now_utc, parse_timestamp};
pub use types::*;
pub use validate::ValidationError;
