use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Itemized points for one prediction. The total is derived, see
/// [`ScoreComponents::total`]. `perfect_top_ten` records an exact top-ten
/// call independently of what the bonus is worth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponents {
    pub top_five_exact: Decimal,
    pub lower_five_exact: Decimal,
    pub perfect_top_ten_bonus: Decimal,
    pub partial_position: Decimal,
    pub pole: Decimal,
    pub sprint: Decimal,
    pub pit_stops: Decimal,
    pub fastest_lap: Decimal,
    pub positions_gained: Decimal,
    pub streak_bonus: Decimal,
    pub underdog_bonus: Decimal,
    pub perfect_top_ten: bool,
}

impl ScoreComponents {
    pub fn total(&self) -> Decimal {
        self.top_five_exact
            + self.lower_five_exact
            + self.perfect_top_ten_bonus
            + self.partial_position
            + self.pole
            + self.sprint
            + self.pit_stops
            + self.fastest_lap
            + self.positions_gained
            + self.streak_bonus
            + self.underdog_bonus
    }

    /// Whether the top ten was called exactly.
    pub fn is_perfect(&self) -> bool {
        self.perfect_top_ten
    }
}

/// Score written for a prediction once its event is finalized.
/// Rescoring replaces the whole value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub prediction_id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub components: ScoreComponents,
    pub computed_at: DateTime<Utc>,
}

impl Score {
    pub fn total(&self) -> Decimal {
        self.components.total()
    }

    pub fn is_perfect(&self) -> bool {
        self.components.is_perfect()
    }
}
