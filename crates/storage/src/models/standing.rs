use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One member's row in a league table. Derived from scores, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub user_id: Uuid,
    pub position: u32,
    pub total_points: Decimal,
    pub predictions_made: u32,
    pub perfect_predictions: u32,
}
