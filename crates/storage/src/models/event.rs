use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A race weekend. Rounds are unique within a season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub event_id: Uuid,
    pub season: i32,
    pub round: i32,
    pub name: String,
    pub country: String,
    pub location: String,
    pub circuit_name: String,
    pub starts_at: DateTime<Utc>,
    pub has_sprint: bool,
}

impl Event {
    /// True when `other` comes earlier in the same season.
    pub fn precedes(&self, other: &Event) -> bool {
        self.season == other.season && self.round < other.round
    }
}
