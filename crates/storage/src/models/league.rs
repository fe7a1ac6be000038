use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct LeagueMember {
    pub user_id: Uuid,
    pub joined_at: DateTime<Utc>,
}

/// A named group of users competing on aggregated scores.
///
/// The owner is always part of `members`, and each user appears at most once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct League {
    pub league_id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub members: Vec<LeagueMember>,
}

impl League {
    /// Creates a league whose only member is its owner.
    pub fn new(name: impl Into<String>, owner_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            league_id: Uuid::new_v4(),
            name: name.into(),
            owner_id,
            created_at: now,
            members: vec![LeagueMember {
                user_id: owner_id,
                joined_at: now,
            }],
        }
    }

    pub fn is_member(&self, user_id: Uuid) -> bool {
        self.members.iter().any(|m| m.user_id == user_id)
    }

    pub fn member_ids(&self) -> Vec<Uuid> {
        self.members.iter().map(|m| m.user_id).collect()
    }
}
