//! Error types for rendezvous-core operations.

use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

/// The kind of record a lookup was made against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Event,
    TimeSlot,
    Availability,
    User,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Entity::Event => "event",
            Entity::TimeSlot => "time slot",
            Entity::Availability => "availability",
            Entity::User => "user",
        };
        f.write_str(name)
    }
}

/// Failures reported by a storage collaborator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: Entity, id: Uuid },

    /// The backing store could not serve the request (connection lost,
    /// poisoned lock, etc.).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced by the scheduling core.
#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: Entity, id: Uuid },

    /// Caller-supplied range where `end <= start`.
    #[error("Invalid time range: end {end} must be after start {start}")]
    InvalidTimeRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Invalid duration: {0} minutes (must be at least 1)")]
    InvalidDuration(u32),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Upstream failure: {0}")]
    Upstream(#[source] StoreError),
}

impl From<StoreError> for SchedulerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => SchedulerError::NotFound { entity, id },
            other => SchedulerError::Upstream(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
