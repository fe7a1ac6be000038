use std::collections::HashSet;

use uuid::Uuid;

use crate::models::{Event, Score};

/// Tracks which (user, event) pairs recorded a perfect top ten, against an
/// explicitly round-ordered season calendar.
#[derive(Debug, Default)]
pub struct StreakTracker {
    calendar: Vec<Event>,
    perfect: HashSet<(Uuid, Uuid)>,
}

impl StreakTracker {
    /// `season_events` may come in any order; it is sorted by round here.
    pub fn new(season_events: &[Event], scores: &[Score]) -> Self {
        let mut calendar = season_events.to_vec();
        calendar.sort_by_key(|e| e.round);

        let perfect = scores
            .iter()
            .filter(|s| s.is_perfect())
            .map(|s| (s.user_id, s.event_id))
            .collect();

        Self { calendar, perfect }
    }

    /// Length of the user's run of perfect calls ending at the round right
    /// before `event`. A missed, unscored or imperfect round ends the run.
    pub fn consecutive_perfects(&self, user_id: Uuid, event: &Event) -> u32 {
        self.calendar
            .iter()
            .rev()
            .filter(|prior| prior.precedes(event))
            .take_while(|prior| self.perfect.contains(&(user_id, prior.event_id)))
            .count() as u32
    }
}
