use std::collections::HashSet;

use async_trait::async_trait;
use uuid::Uuid;

use crate::dto::schedule::{RosterEntry, ScheduledEvent};
use crate::error::Result;
use crate::models::{DriverNumber, Event, League, LeagueMember, Outcome, Prediction, Score};

/// Persistence the scoring engine runs against, keyed by (user, event).
#[async_trait]
pub trait PredictionStore: Send + Sync {
    async fn get_event(&self, event_id: Uuid) -> Result<Option<Event>>;

    /// All events of a season, ordered by round.
    async fn list_season_events(&self, season: i32) -> Result<Vec<Event>>;

    async fn get_prediction(&self, user_id: Uuid, event_id: Uuid) -> Result<Option<Prediction>>;

    /// Inserts or replaces the prediction for `(user_id, event_id)` atomically.
    ///
    /// On replace the stored `prediction_id` and `created_at` are kept. Returns
    /// the row as stored.
    async fn upsert_prediction(&self, prediction: &Prediction) -> Result<Prediction>;

    async fn list_predictions_for_event(&self, event_id: Uuid) -> Result<Vec<Prediction>>;

    /// Replaces every score of an event with `scores`, all or nothing.
    async fn replace_event_scores(&self, event_id: Uuid, scores: &[Score]) -> Result<()>;

    async fn list_scores_for_users(&self, user_ids: &[Uuid]) -> Result<Vec<Score>>;
}

#[async_trait]
pub trait LeagueStore: Send + Sync {
    async fn get_league(&self, league_id: Uuid) -> Result<Option<League>>;

    /// Fails with `ConstraintViolation` when the name is taken.
    async fn create_league(&self, league: &League) -> Result<League>;

    /// No-op if the user already belongs to the league.
    async fn add_member(&self, league_id: Uuid, member: &LeagueMember) -> Result<()>;

    /// Returns false if the user was not a member.
    async fn remove_member(&self, league_id: Uuid, user_id: Uuid) -> Result<bool>;

    async fn list_leagues_for_user(&self, user_id: Uuid) -> Result<Vec<League>>;
}

/// Writes of the season calendar and roster. Both are keyed upserts, so
/// syncing the same schedule twice leaves the store unchanged.
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    /// Inserts or updates the event at `(season, round)`. An existing event
    /// keeps its id.
    async fn upsert_event(&self, season: i32, event: &ScheduledEvent) -> Result<Event>;

    async fn upsert_season_driver(&self, season: i32, driver: &RosterEntry) -> Result<()>;
}

#[async_trait]
pub trait RosterSource: Send + Sync {
    async fn drivers_for_season(&self, season: i32) -> Result<HashSet<DriverNumber>>;
}

/// Supplier of official results. `None` means the event is not finalized yet.
#[async_trait]
pub trait OutcomeFeed: Send + Sync {
    async fn outcome_for(&self, event: &Event) -> Result<Option<Outcome>>;
}
