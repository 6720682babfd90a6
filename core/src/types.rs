//! Work order type definitions.
//!
//! This module defines the data model shared by storage and presentation.
//! The enumerated fields serialize with the same lowercase names that are
//! persisted in the database and accepted on the command line.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Severity classification of a work order.
///
/// # Examples
///
/// ```
/// use workorders_core::Priority;
///
/// assert_eq!(Priority::default(), Priority::Med);
/// assert_eq!("high".parse::<Priority>().unwrap(), Priority::High);
/// assert!("urgent".parse::<Priority>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    /// Medium priority (the default when none is given).
    #[default]
    Med,
    High,
}

impl Priority {
    /// All priorities, lowest first.
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Med, Priority::High];

    /// Returns the persisted text form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Med => "med",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "low" => Ok(Priority::Low),
            "med" => Ok(Priority::Med),
            "high" => Ok(Priority::High),
            other => Err(ValidationError::InvalidPriority(other.to_string())),
        }
    }
}

/// Lifecycle state of a work order.
///
/// Every work order starts [`Open`](Status::Open) and moves to
/// [`Closed`](Status::Closed) exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Open,
    Closed,
}

impl Status {
    /// Both statuses, open first.
    pub const ALL: [Status; 2] = [Status::Open, Status::Closed];

    /// Returns the persisted text form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Open => "open",
            Status::Closed => "closed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "open" => Ok(Status::Open),
            "closed" => Ok(Status::Closed),
            other => Err(ValidationError::InvalidStatus(other.to_string())),
        }
    }
}

/// A persisted maintenance request.
///
/// Instances are produced by the storage layer; `closed_at` is `Some` if and
/// only if `status` is [`Status::Closed`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkOrder {
    /// Database-assigned identifier, stable for the record's lifetime.
    pub id: i64,
    /// Machine the work order is filed against (e.g. `KMT-102`).
    pub machine_id: String,
    /// Free-text description of the problem.
    pub issue: String,
    pub priority: Priority,
    pub status: Status,
    /// Creation time (UTC), never changes.
    pub created_at: DateTime<Utc>,
    /// Close time (UTC), set only when the work order is closed.
    pub closed_at: Option<DateTime<Utc>>,
}

impl WorkOrder {
    /// Returns `true` if the work order has been closed.
    pub fn is_closed(&self) -> bool {
        self.status == Status::Closed
    }
}

/// Validated input for creating a work order.
///
/// Both text fields are trimmed and must be non-empty.
///
/// # Examples
///
/// ```
/// use workorders_core::{NewWorkOrder, Priority, ValidationError};
///
/// let order = NewWorkOrder::new("KMT-102", "  Hydraulic leak ", Priority::High).unwrap();
/// assert_eq!(order.issue, "Hydraulic leak");
///
/// assert_eq!(
///     NewWorkOrder::new("   ", "Hydraulic leak", Priority::High).unwrap_err(),
///     ValidationError::EmptyMachineId,
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWorkOrder {
    pub machine_id: String,
    pub issue: String,
    pub priority: Priority,
}

impl NewWorkOrder {
    /// Creates a new work order request from typed input.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyMachineId`] or
    /// [`ValidationError::EmptyIssue`] when a field is blank.
    pub fn new(machine_id: &str, issue: &str, priority: Priority) -> Result<Self, ValidationError> {
        let machine_id = machine_id.trim();
        if machine_id.is_empty() {
            return Err(ValidationError::EmptyMachineId);
        }
        let issue = issue.trim();
        if issue.is_empty() {
            return Err(ValidationError::EmptyIssue);
        }
        Ok(Self {
            machine_id: machine_id.to_string(),
            issue: issue.to_string(),
            priority,
        })
    }

    /// Creates a new work order request from untyped text, as submitted by a
    /// form or another tool.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPriority`] if `priority` is not one
    /// of `low`, `med`, `high`, in addition to the errors of [`new`](Self::new).
    pub fn parse(machine_id: &str, issue: &str, priority: &str) -> Result<Self, ValidationError> {
        let priority = priority.parse::<Priority>()?;
        Self::new(machine_id, issue, priority)
    }
}
