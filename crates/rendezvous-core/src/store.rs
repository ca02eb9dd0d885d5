//! Storage collaborators.
//!
//! The core never owns persistence. Services and the recommender receive the
//! stores they need at construction time through these traits; anything that
//! can serve keyed CRUD (a database, a remote API, the [`InMemoryStore`]) can
//! back them.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Entity, StoreError};
use crate::model::{Availability, Event, TimeSlot, User};

pub type StoreResult<T> = std::result::Result<T, StoreError>;

pub trait EventStore {
    fn create_event(&self, event: &Event) -> StoreResult<()>;
    fn get_event(&self, id: Uuid) -> StoreResult<Event>;
    fn update_event(&self, event: &Event) -> StoreResult<()>;
    fn delete_event(&self, id: Uuid) -> StoreResult<()>;
    fn list_events(&self, limit: usize, offset: usize) -> StoreResult<Vec<Event>>;
}

pub trait TimeSlotStore {
    fn create_slot(&self, slot: &TimeSlot) -> StoreResult<()>;
    fn get_slot(&self, id: Uuid) -> StoreResult<TimeSlot>;
    fn update_slot(&self, slot: &TimeSlot) -> StoreResult<()>;
    fn delete_slot(&self, id: Uuid) -> StoreResult<()>;
    fn slots_for_event(&self, event_id: Uuid) -> StoreResult<Vec<TimeSlot>>;
}

pub trait AvailabilityStore {
    fn create_availability(&self, availability: &Availability) -> StoreResult<()>;
    fn get_availability(&self, id: Uuid) -> StoreResult<Availability>;
    fn update_availability(&self, availability: &Availability) -> StoreResult<()>;
    fn delete_availability(&self, id: Uuid) -> StoreResult<()>;
    fn availability_for_event(&self, event_id: Uuid) -> StoreResult<Vec<Availability>>;
    fn availability_for_user(&self, user_id: Uuid, event_id: Uuid)
        -> StoreResult<Vec<Availability>>;
}

pub trait UserStore {
    fn create_user(&self, user: &User) -> StoreResult<()>;
    fn get_user(&self, id: Uuid) -> StoreResult<User>;
    /// Batch lookup. Ids with no matching user are left out of the result.
    fn get_users(&self, ids: &[Uuid]) -> StoreResult<Vec<User>>;
}

impl<T: EventStore + ?Sized> EventStore for &T {
    fn create_event(&self, event: &Event) -> StoreResult<()> {
        (**self).create_event(event)
    }
    fn get_event(&self, id: Uuid) -> StoreResult<Event> {
        (**self).get_event(id)
    }
    fn update_event(&self, event: &Event) -> StoreResult<()> {
        (**self).update_event(event)
    }
    fn delete_event(&self, id: Uuid) -> StoreResult<()> {
        (**self).delete_event(id)
    }
    fn list_events(&self, limit: usize, offset: usize) -> StoreResult<Vec<Event>> {
        (**self).list_events(limit, offset)
    }
}

impl<T: TimeSlotStore + ?Sized> TimeSlotStore for &T {
    fn create_slot(&self, slot: &TimeSlot) -> StoreResult<()> {
        (**self).create_slot(slot)
    }
    fn get_slot(&self, id: Uuid) -> StoreResult<TimeSlot> {
        (**self).get_slot(id)
    }
    fn update_slot(&self, slot: &TimeSlot) -> StoreResult<()> {
        (**self).update_slot(slot)
    }
    fn delete_slot(&self, id: Uuid) -> StoreResult<()> {
        (**self).delete_slot(id)
    }
    fn slots_for_event(&self, event_id: Uuid) -> StoreResult<Vec<TimeSlot>> {
        (**self).slots_for_event(event_id)
    }
}

impl<T: AvailabilityStore + ?Sized> AvailabilityStore for &T {
    fn create_availability(&self, availability: &Availability) -> StoreResult<()> {
        (**self).create_availability(availability)
    }
    fn get_availability(&self, id: Uuid) -> StoreResult<Availability> {
        (**self).get_availability(id)
    }
    fn update_availability(&self, availability: &Availability) -> StoreResult<()> {
        (**self).update_availability(availability)
    }
    fn delete_availability(&self, id: Uuid) -> StoreResult<()> {
        (**self).delete_availability(id)
    }
    fn availability_for_event(&self, event_id: Uuid) -> StoreResult<Vec<Availability>> {
        (**self).availability_for_event(event_id)
    }
    fn availability_for_user(
        &self,
        user_id: Uuid,
        event_id: Uuid,
    ) -> StoreResult<Vec<Availability>> {
        (**self).availability_for_user(user_id, event_id)
    }
}

impl<T: UserStore + ?Sized> UserStore for &T {
    fn create_user(&self, user: &User) -> StoreResult<()> {
        (**self).create_user(user)
    }
    fn get_user(&self, id: Uuid) -> StoreResult<User> {
        (**self).get_user(id)
    }
    fn get_users(&self, ids: &[Uuid]) -> StoreResult<Vec<User>> {
        (**self).get_users(ids)
    }
}

/// A serializable dump of every record kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub time_slots: Vec<TimeSlot>,
    #[serde(default)]
    pub availabilities: Vec<Availability>,
    #[serde(default)]
    pub users: Vec<User>,
}

impl Snapshot {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, Default)]
struct Tables {
    events: HashMap<Uuid, Event>,
    slots: HashMap<Uuid, TimeSlot>,
    availabilities: HashMap<Uuid, Availability>,
    users: HashMap<Uuid, User>,
}

/// Process-local store implementing all four collaborator traits.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let tables = Tables {
            events: snapshot.events.into_iter().map(|e| (e.id, e)).collect(),
            slots: snapshot.time_slots.into_iter().map(|s| (s.id, s)).collect(),
            availabilities: snapshot
                .availabilities
                .into_iter()
                .map(|a| (a.id, a))
                .collect(),
            users: snapshot.users.into_iter().map(|u| (u.id, u)).collect(),
        };
        Self {
            tables: RwLock::new(tables),
        }
    }

    /// Export the current contents, each list in listing order.
    pub fn snapshot(&self) -> StoreResult<Snapshot> {
        let tables = self.read()?;
        let mut events: Vec<Event> = tables.events.values().cloned().collect();
        events.sort_by_key(|e| (e.created_at, e.id));
        let mut time_slots: Vec<TimeSlot> = tables.slots.values().cloned().collect();
        time_slots.sort_by_key(|s| (s.start_time, s.id));
        let mut availabilities: Vec<Availability> =
            tables.availabilities.values().cloned().collect();
        availabilities.sort_by_key(|a| (a.start_time, a.id));
        let mut users: Vec<User> = tables.users.values().cloned().collect();
        users.sort_by_key(|u| u.id);
        Ok(Snapshot {
            events,
            time_slots,
            availabilities,
            users,
        })
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }
}

/// Replace an existing row, or report it missing.
fn replace<T: Clone>(
    table: &mut HashMap<Uuid, T>,
    entity: Entity,
    id: Uuid,
    row: &T,
) -> StoreResult<()> {
    match table.get_mut(&id) {
        Some(existing) => {
            *existing = row.clone();
            Ok(())
        }
        None => Err(StoreError::NotFound { entity, id }),
    }
}

fn remove<T>(table: &mut HashMap<Uuid, T>, entity: Entity, id: Uuid) -> StoreResult<()> {
    table
        .remove(&id)
        .map(|_| ())
        .ok_or(StoreError::NotFound { entity, id })
}

fn fetch<T: Clone>(table: &HashMap<Uuid, T>, entity: Entity, id: Uuid) -> StoreResult<T> {
    table
        .get(&id)
        .cloned()
        .ok_or(StoreError::NotFound { entity, id })
}

impl EventStore for InMemoryStore {
    fn create_event(&self, event: &Event) -> StoreResult<()> {
        self.write()?.events.insert(event.id, event.clone());
        Ok(())
    }

    fn get_event(&self, id: Uuid) -> StoreResult<Event> {
        fetch(&self.read()?.events, Entity::Event, id)
    }

    fn update_event(&self, event: &Event) -> StoreResult<()> {
        replace(&mut self.write()?.events, Entity::Event, event.id, event)
    }

    fn delete_event(&self, id: Uuid) -> StoreResult<()> {
        remove(&mut self.write()?.events, Entity::Event, id)
    }

    fn list_events(&self, limit: usize, offset: usize) -> StoreResult<Vec<Event>> {
        let tables = self.read()?;
        let mut events: Vec<Event> = tables.events.values().cloned().collect();
        events.sort_by_key(|e| (e.created_at, e.id));
        Ok(events.into_iter().skip(offset).take(limit).collect())
    }
}

impl TimeSlotStore for InMemoryStore {
    fn create_slot(&self, slot: &TimeSlot) -> StoreResult<()> {
        self.write()?.slots.insert(slot.id, slot.clone());
        Ok(())
    }

    fn get_slot(&self, id: Uuid) -> StoreResult<TimeSlot> {
        fetch(&self.read()?.slots, Entity::TimeSlot, id)
    }

    fn update_slot(&self, slot: &TimeSlot) -> StoreResult<()> {
        replace(&mut self.write()?.slots, Entity::TimeSlot, slot.id, slot)
    }

    fn delete_slot(&self, id: Uuid) -> StoreResult<()> {
        remove(&mut self.write()?.slots, Entity::TimeSlot, id)
    }

    fn slots_for_event(&self, event_id: Uuid) -> StoreResult<Vec<TimeSlot>> {
        let tables = self.read()?;
        let mut slots: Vec<TimeSlot> = tables
            .slots
            .values()
            .filter(|s| s.event_id == event_id)
            .cloned()
            .collect();
        slots.sort_by_key(|s| (s.start_time, s.id));
        Ok(slots)
    }
}

impl AvailabilityStore for InMemoryStore {
    fn create_availability(&self, availability: &Availability) -> StoreResult<()> {
        self.write()?
            .availabilities
            .insert(availability.id, availability.clone());
        Ok(())
    }

    fn get_availability(&self, id: Uuid) -> StoreResult<Availability> {
        fetch(&self.read()?.availabilities, Entity::Availability, id)
    }

    fn update_availability(&self, availability: &Availability) -> StoreResult<()> {
        replace(
            &mut self.write()?.availabilities,
            Entity::Availability,
            availability.id,
            availability,
        )
    }

    fn delete_availability(&self, id: Uuid) -> StoreResult<()> {
        remove(&mut self.write()?.availabilities, Entity::Availability, id)
    }

    fn availability_for_event(&self, event_id: Uuid) -> StoreResult<Vec<Availability>> {
        let tables = self.read()?;
        let mut rows: Vec<Availability> = tables
            .availabilities
            .values()
            .filter(|a| a.event_id == event_id)
            .cloned()
            .collect();
        rows.sort_by_key(|a| (a.start_time, a.id));
        Ok(rows)
    }

    fn availability_for_user(
        &self,
        user_id: Uuid,
        event_id: Uuid,
    ) -> StoreResult<Vec<Availability>> {
        Ok(self
            .availability_for_event(event_id)?
            .into_iter()
            .filter(|a| a.user_id == user_id)
            .collect())
    }
}

impl UserStore for InMemoryStore {
    fn create_user(&self, user: &User) -> StoreResult<()> {
        self.write()?.users.insert(user.id, user.clone());
        Ok(())
    }

    fn get_user(&self, id: Uuid) -> StoreResult<User> {
        fetch(&self.read()?.users, Entity::User, id)
    }

    fn get_users(&self, ids: &[Uuid]) -> StoreResult<Vec<User>> {
        let tables = self.read()?;
        Ok(ids
            .iter()
            .filter_map(|id| tables.users.get(id).cloned())
            .collect())
    }
}
