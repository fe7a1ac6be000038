use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Category, DriverNumber, TOP_TEN};

/// Finalized result of an event, as delivered by the outcome feed.
///
/// Callers must only hand over complete outcomes: every category winner is
/// present and `finishing_order` holds distinct drivers. A classification
/// shorter than ten is accepted; the missing slots simply never match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub event_id: Uuid,
    pub finishing_order: Vec<DriverNumber>,
    pub pole: DriverNumber,
    pub sprint_winner: Option<DriverNumber>,
    pub most_pit_stops: DriverNumber,
    pub fastest_lap: DriverNumber,
    pub most_positions_gained: DriverNumber,
}

impl Outcome {
    /// Driver classified at zero-based `slot`, if the slot is inside the top ten.
    pub fn driver_at(&self, slot: usize) -> Option<DriverNumber> {
        if slot >= TOP_TEN {
            return None;
        }
        self.finishing_order.get(slot).copied()
    }

    /// Zero-based slot of `driver` within the actual top ten.
    pub fn top_ten_slot(&self, driver: DriverNumber) -> Option<usize> {
        self.finishing_order
            .iter()
            .take(TOP_TEN)
            .position(|d| *d == driver)
    }

    pub fn winner(&self, category: Category) -> Option<DriverNumber> {
        match category {
            Category::Pole => Some(self.pole),
            Category::Sprint => self.sprint_winner,
            Category::MostPitStops => Some(self.most_pit_stops),
            Category::FastestLap => Some(self.fastest_lap),
            Category::MostPositionsGained => Some(self.most_positions_gained),
        }
    }
}
