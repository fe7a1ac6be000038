use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Summary of one batch scoring run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventScoringReport {
    pub event_id: Uuid,
    pub season: i32,
    pub round: i32,
    pub scored: usize,
    pub perfect: usize,
    pub top_total: Option<Decimal>,
}
