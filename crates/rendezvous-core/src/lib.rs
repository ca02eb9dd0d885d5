//! # rendezvous-core
//!
//! Meeting slot recommendation on top of a small time-range interval algebra.
//!
//! A creator defines an event with a meeting length, proposes candidate slots,
//! and collects availability windows from users. The recommender places the
//! meeting at each slot's start, works out who can attend, and ranks the
//! slots by attendee count.
//!
//! ## Modules
//!
//! - [`interval`] - Closed-interval overlap, containment, intersection, multi-way common availability
//! - [`recommend`] - Slot scoring and ranking, plus the store-backed [`Recommender`]
//! - [`model`] - Events, slots, availability, users, and recommendation output
//! - [`store`] - Storage collaborator traits and an in-memory implementation
//! - [`service`] - Validated create/update/delete operations
//! - [`tz`] - RFC 3339 parsing and timezone presentation
//! - [`error`] - Error types

pub mod error;
pub mod interval;
pub mod model;
pub mod recommend;
pub mod service;
pub mod store;
pub mod tz;

pub use error::{Entity, SchedulerError, StoreError};
pub use interval::{common_slots, filter_by_min_duration, intersect_all, TimeRange};
pub use model::{Recommendation, RecommendationResponse};
pub use recommend::{recommend, Recommender};
pub use store::{InMemoryStore, Snapshot};
