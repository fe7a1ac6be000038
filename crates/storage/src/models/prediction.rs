use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::DriverNumber;

/// Number of finishing positions a prediction covers.
pub const TOP_TEN: usize = 10;

/// Single-driver prediction categories scored by flat awards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Pole,
    Sprint,
    MostPitStops,
    FastestLap,
    MostPositionsGained,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Pole,
        Category::Sprint,
        Category::MostPitStops,
        Category::FastestLap,
        Category::MostPositionsGained,
    ];
}

/// A user's stored guesses for one event. At most one exists per (user, event).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub prediction_id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub top_ten: [DriverNumber; TOP_TEN],
    pub pole: DriverNumber,
    pub sprint_winner: Option<DriverNumber>,
    pub most_pit_stops: DriverNumber,
    pub fastest_lap: DriverNumber,
    pub most_positions_gained: DriverNumber,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Prediction {
    pub fn pick(&self, category: Category) -> Option<DriverNumber> {
        match category {
            Category::Pole => Some(self.pole),
            Category::Sprint => self.sprint_winner,
            Category::MostPitStops => Some(self.most_pit_stops),
            Category::FastestLap => Some(self.fastest_lap),
            Category::MostPositionsGained => Some(self.most_positions_gained),
        }
    }
}
