use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{League, Standing};

/// Request payload for creating a new league
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateLeagueRequest {
    #[validate(length(
        min = 3,
        max = 50,
        message = "Name must be between 3 and 50 characters"
    ))]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueResponse {
    pub league_id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub member_count: usize,
}

impl From<League> for LeagueResponse {
    fn from(league: League) -> Self {
        Self {
            league_id: league.league_id,
            member_count: league.members.len(),
            name: league.name,
            owner_id: league.owner_id,
            created_at: league.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueStandingsResponse {
    pub league_id: Uuid,
    pub league_name: String,
    pub standings: Vec<Standing>,
    pub last_updated: DateTime<Utc>,
}
