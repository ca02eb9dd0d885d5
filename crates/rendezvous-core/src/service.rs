//! Event, slot and availability operations.
//!
//! These are the only places caller-supplied time strings become ranges, so
//! they are where `end <= start` is rejected. Everything downstream trusts
//! stored ranges.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::error::{Entity, Result, SchedulerError};
use crate::interval::TimeRange;
use crate::model::{
    Availability, AvailabilityRequest, Event, EventRequest, EventStatus, TimeSlot,
    TimeSlotRequest,
};
use crate::store::{AvailabilityStore, EventStore, TimeSlotStore, UserStore};
use crate::tz::parse_instant;

/// Parse and validate a caller-supplied range. `end` must be strictly after
/// `start`.
pub fn parse_range(start: &str, end: &str) -> Result<TimeRange> {
    let start = parse_instant(start)?;
    let end = parse_instant(end)?;
    if end <= start {
        return Err(SchedulerError::InvalidTimeRange { start, end });
    }
    Ok(TimeRange::new(start, end))
}

fn validate_duration(minutes: u32) -> Result<u32> {
    if minutes == 0 {
        return Err(SchedulerError::InvalidDuration(minutes));
    }
    Ok(minutes)
}

pub struct EventService<E> {
    events: E,
}

impl<E: EventStore> EventService<E> {
    pub fn new(events: E) -> Self {
        Self { events }
    }

    /// Create a draft event owned by `creator_id`.
    pub fn create(&self, request: &EventRequest, creator_id: Uuid) -> Result<Event> {
        let duration_minutes = validate_duration(request.duration_minutes)?;
        let now = Utc::now();
        let event = Event {
            id: Uuid::new_v4(),
            title: request.title.clone(),
            description: request.description.clone(),
            creator_id,
            duration_minutes,
            status: EventStatus::Draft,
            created_at: now,
            updated_at: now,
        };
        self.events.create_event(&event)?;
        info!(event_id = %event.id, %creator_id, "created event");
        Ok(event)
    }

    pub fn get(&self, id: Uuid) -> Result<Event> {
        Ok(self.events.get_event(id)?)
    }

    pub fn update(&self, id: Uuid, request: &EventRequest) -> Result<Event> {
        let duration_minutes = validate_duration(request.duration_minutes)?;
        let mut event = self.events.get_event(id)?;
        event.title = request.title.clone();
        event.description = request.description.clone();
        event.duration_minutes = duration_minutes;
        event.updated_at = Utc::now();
        self.events.update_event(&event)?;
        info!(event_id = %id, "updated event");
        Ok(event)
    }

    pub fn set_status(&self, id: Uuid, status: EventStatus) -> Result<Event> {
        let mut event = self.events.get_event(id)?;
        event.status = status;
        event.updated_at = Utc::now();
        self.events.update_event(&event)?;
        info!(event_id = %id, ?status, "changed event status");
        Ok(event)
    }

    pub fn delete(&self, id: Uuid) -> Result<()> {
        self.events.delete_event(id)?;
        info!(event_id = %id, "deleted event");
        Ok(())
    }

    pub fn list(&self, limit: usize, offset: usize) -> Result<Vec<Event>> {
        Ok(self.events.list_events(limit, offset)?)
    }
}

pub struct TimeSlotService<S, E> {
    slots: S,
    events: E,
}

impl<S: TimeSlotStore, E: EventStore> TimeSlotService<S, E> {
    pub fn new(slots: S, events: E) -> Self {
        Self { slots, events }
    }

    /// Propose a slot for an existing event.
    pub fn create(&self, event_id: Uuid, request: &TimeSlotRequest) -> Result<TimeSlot> {
        self.events.get_event(event_id)?;
        let range = parse_range(&request.start_time, &request.end_time)?;
        let now = Utc::now();
        let slot = TimeSlot {
            id: Uuid::new_v4(),
            event_id,
            start_time: range.start,
            end_time: range.end,
            created_at: now,
            updated_at: now,
        };
        self.slots.create_slot(&slot)?;
        info!(slot_id = %slot.id, %event_id, "proposed time slot");
        Ok(slot)
    }

    pub fn get(&self, id: Uuid) -> Result<TimeSlot> {
        Ok(self.slots.get_slot(id)?)
    }

    pub fn update(&self, id: Uuid, request: &TimeSlotRequest) -> Result<TimeSlot> {
        let mut slot = self.slots.get_slot(id)?;
        let range = parse_range(&request.start_time, &request.end_time)?;
        slot.start_time = range.start;
        slot.end_time = range.end;
        slot.updated_at = Utc::now();
        self.slots.update_slot(&slot)?;
        info!(slot_id = %id, event_id = %slot.event_id, "moved time slot");
        Ok(slot)
    }

    pub fn delete(&self, id: Uuid) -> Result<()> {
        self.slots.delete_slot(id)?;
        info!(slot_id = %id, "deleted time slot");
        Ok(())
    }

    pub fn list_for_event(&self, event_id: Uuid) -> Result<Vec<TimeSlot>> {
        Ok(self.slots.slots_for_event(event_id)?)
    }
}

pub struct AvailabilityService<A, E, U> {
    availability: A,
    events: E,
    users: U,
}

impl<A, E, U> AvailabilityService<A, E, U>
where
    A: AvailabilityStore,
    E: EventStore,
    U: UserStore,
{
    pub fn new(availability: A, events: E, users: U) -> Self {
        Self {
            availability,
            events,
            users,
        }
    }

    /// Record a free window for `request.user_id` on an existing event.
    ///
    /// A user may hold any number of windows per event; each call adds one.
    pub fn create(&self, event_id: Uuid, request: &AvailabilityRequest) -> Result<Availability> {
        self.events.get_event(event_id)?;
        self.users.get_user(request.user_id)?;
        let range = parse_range(&request.start_time, &request.end_time)?;
        let now = Utc::now();
        let availability = Availability {
            id: Uuid::new_v4(),
            user_id: request.user_id,
            event_id,
            start_time: range.start,
            end_time: range.end,
            created_at: now,
            updated_at: now,
        };
        self.availability.create_availability(&availability)?;
        info!(
            availability_id = %availability.id,
            user_id = %availability.user_id,
            %event_id,
            "recorded availability"
        );
        Ok(availability)
    }

    pub fn get(&self, id: Uuid) -> Result<Availability> {
        Ok(self.availability.get_availability(id)?)
    }

    /// Move one availability window, addressed by its own id.
    ///
    /// The user's other windows for the event are left alone. A record that
    /// belongs to a different user than `request.user_id` is reported as not
    /// found.
    pub fn update(&self, id: Uuid, request: &AvailabilityRequest) -> Result<Availability> {
        let mut availability = self.availability.get_availability(id)?;
        if availability.user_id != request.user_id {
            return Err(SchedulerError::NotFound {
                entity: Entity::Availability,
                id,
            });
        }
        let range = parse_range(&request.start_time, &request.end_time)?;
        availability.start_time = range.start;
        availability.end_time = range.end;
        availability.updated_at = Utc::now();
        self.availability.update_availability(&availability)?;
        info!(
            availability_id = %id,
            user_id = %availability.user_id,
            "updated availability"
        );
        Ok(availability)
    }

    pub fn delete(&self, id: Uuid) -> Result<()> {
        self.availability.delete_availability(id)?;
        info!(availability_id = %id, "deleted availability");
        Ok(())
    }

    pub fn list_for_user_and_event(
        &self,
        user_id: Uuid,
        event_id: Uuid,
    ) -> Result<Vec<Availability>> {
        Ok(self.availability.availability_for_user(user_id, event_id)?)
    }

    pub fn list_for_event(&self, event_id: Uuid) -> Result<Vec<Availability>> {
        Ok(self.availability.availability_for_event(event_id)?)
    }
}
