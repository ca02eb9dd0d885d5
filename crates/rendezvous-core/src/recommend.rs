//! Rank an event's proposed slots by how many users can attend.
//!
//! For every slot the meeting is placed at the slot start and runs for the
//! event's duration. A user attends when one of their availability windows
//! fully contains that meeting. Windows are never unioned: two back-to-back
//! windows that together cover the meeting still leave the user out.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::Result;
use crate::interval::TimeRange;
use crate::model::{
    Availability, Event, Recommendation, RecommendationResponse, SlotSummary, TimeSlot, User,
    UserSummary,
};
use crate::store::{AvailabilityStore, EventStore, TimeSlotStore, UserStore};

/// One user's availability windows for the event being ranked.
struct Participant<'a> {
    user: &'a User,
    windows: Vec<TimeRange>,
}

impl Participant<'_> {
    fn can_attend(&self, meeting: &TimeRange) -> bool {
        self.windows.iter().any(|w| w.contains(meeting))
    }
}

/// Compute ranked recommendations from already-fetched records.
///
/// - Slots too short for the event's duration produce no recommendation.
/// - Availability rows whose user is absent from `users` are ignored.
/// - Every other user with availability lands in exactly one of `attendees`
///   or `non_attendees` of every recommendation.
/// - The result is stable-sorted by score, highest first. Equal scores keep
///   slot input order.
///
/// Users appear in the order their first availability row appears.
pub fn recommend(
    event: &Event,
    slots: &[TimeSlot],
    availabilities: &[Availability],
    users: &[User],
) -> Vec<Recommendation> {
    if slots.is_empty() {
        return Vec::new();
    }

    let directory: HashMap<Uuid, &User> = users.iter().map(|u| (u.id, u)).collect();
    let participants = group_by_user(availabilities, &directory);
    let duration = event.duration();

    let mut recommendations: Vec<Recommendation> = slots
        .iter()
        .filter_map(|slot| {
            let meeting_end = match slot.start_time.checked_add_signed(duration) {
                Some(end) => end,
                None => {
                    debug!(slot_id = %slot.id, "meeting end out of range, skipping");
                    return None;
                }
            };
            let meeting = TimeRange::new(slot.start_time, meeting_end);
            if meeting.end > slot.end_time {
                debug!(
                    slot_id = %slot.id,
                    meeting_end = %meeting.end,
                    slot_end = %slot.end_time,
                    "meeting does not fit in slot, skipping"
                );
                return None;
            }

            let (attending, absent): (Vec<&Participant>, Vec<&Participant>) =
                participants.iter().partition(|p| p.can_attend(&meeting));
            let attendees: Vec<UserSummary> =
                attending.iter().map(|p| UserSummary::from(p.user)).collect();
            let non_attendees: Vec<UserSummary> =
                absent.iter().map(|p| UserSummary::from(p.user)).collect();

            debug!(slot_id = %slot.id, score = attendees.len(), "scored slot");
            Some(Recommendation {
                time_slot: SlotSummary {
                    id: slot.id,
                    start_time: meeting.start,
                    end_time: meeting.end,
                },
                score: attendees.len(),
                attendees,
                non_attendees,
            })
        })
        .collect();

    // `sort_by` is stable, so ties keep slot order.
    recommendations.sort_by(|a, b| b.score.cmp(&a.score));
    recommendations
}

/// Group availability windows by user, dropping users the directory lacks.
fn group_by_user<'a>(
    availabilities: &[Availability],
    directory: &HashMap<Uuid, &'a User>,
) -> Vec<Participant<'a>> {
    let mut participants: Vec<Participant<'a>> = Vec::new();
    let mut index: HashMap<Uuid, usize> = HashMap::new();
    let mut orphans: HashSet<Uuid> = HashSet::new();

    for availability in availabilities {
        let user = match directory.get(&availability.user_id) {
            Some(user) => *user,
            None => {
                if orphans.insert(availability.user_id) {
                    warn!(
                        user_id = %availability.user_id,
                        "availability references unknown user, excluding"
                    );
                }
                continue;
            }
        };
        match index.get(&availability.user_id) {
            Some(&i) => participants[i].windows.push(availability.range()),
            None => {
                index.insert(availability.user_id, participants.len());
                participants.push(Participant {
                    user,
                    windows: vec![availability.range()],
                });
            }
        }
    }

    participants
}

/// Distinct user ids in first-appearance order.
fn distinct_users(availabilities: &[Availability]) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    availabilities
        .iter()
        .map(|a| a.user_id)
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Fetches everything a recommendation needs and ranks the event's slots.
///
/// The four stores are injected separately; pass the same value for several
/// of them when one backend serves every role.
pub struct Recommender<E, S, A, U> {
    events: E,
    slots: S,
    availability: A,
    users: U,
}

impl<E, S, A, U> Recommender<E, S, A, U>
where
    E: EventStore,
    S: TimeSlotStore,
    A: AvailabilityStore,
    U: UserStore,
{
    pub fn new(events: E, slots: S, availability: A, users: U) -> Self {
        Self {
            events,
            slots,
            availability,
            users,
        }
    }

    /// Rank the proposed slots of `event_id`.
    ///
    /// All fetches happen before any scoring. A failed fetch aborts the call;
    /// an unknown event surfaces as `NotFound`. When the event has no slots
    /// the availability and user stores are not consulted.
    pub fn recommend(&self, event_id: Uuid) -> Result<RecommendationResponse> {
        let event = self.events.get_event(event_id)?;

        let slots = self.slots.slots_for_event(event_id)?;
        if slots.is_empty() {
            info!(%event_id, "event has no proposed slots");
            return Ok(RecommendationResponse::default());
        }

        let availabilities = self.availability.availability_for_event(event_id)?;
        let user_ids = distinct_users(&availabilities);
        let users = self.users.get_users(&user_ids)?;

        let recommendations = recommend(&event, &slots, &availabilities, &users);
        info!(
            %event_id,
            slots = slots.len(),
            users = users.len(),
            recommendations = recommendations.len(),
            "computed recommendations"
        );
        Ok(RecommendationResponse { recommendations })
    }
}
