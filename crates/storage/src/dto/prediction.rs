use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::DriverNumber;

/// Prediction payload as submitted by a user, before any validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitPredictionRequest {
    pub event_id: Uuid,
    pub top_ten: Vec<DriverNumber>,
    pub pole: DriverNumber,
    #[serde(default)]
    pub sprint_winner: Option<DriverNumber>,
    pub most_pit_stops: DriverNumber,
    pub fastest_lap: DriverNumber,
    pub most_positions_gained: DriverNumber,
}

impl SubmitPredictionRequest {
    /// Every driver the request mentions, in field order.
    pub fn referenced_drivers(&self) -> impl Iterator<Item = DriverNumber> + '_ {
        self.top_ten
            .iter()
            .copied()
            .chain([self.pole])
            .chain(self.sprint_winner)
            .chain([
                self.most_pit_stops,
                self.fastest_lap,
                self.most_positions_gained,
            ])
    }
}
