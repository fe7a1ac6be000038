use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::contract::{LeagueStore, PredictionStore, RosterSource, ScheduleStore};
use super::event::EventRepository;
use super::league::LeagueRepository;
use super::prediction::PredictionRepository;
use super::roster::RosterRepository;
use super::score::ScoreRepository;
use crate::dto::schedule::{RosterEntry, ScheduledEvent};
use crate::error::Result;
use crate::models::{DriverNumber, Event, League, LeagueMember, Prediction, Score};

/// Postgres-backed implementation of the engine's store contracts.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PredictionStore for PgStore {
    async fn get_event(&self, event_id: Uuid) -> Result<Option<Event>> {
        EventRepository::new(&self.pool).find_by_id(event_id).await
    }

    async fn list_season_events(&self, season: i32) -> Result<Vec<Event>> {
        EventRepository::new(&self.pool).list_by_season(season).await
    }

    async fn get_prediction(&self, user_id: Uuid, event_id: Uuid) -> Result<Option<Prediction>> {
        PredictionRepository::new(&self.pool)
            .find(user_id, event_id)
            .await
    }

    async fn upsert_prediction(&self, prediction: &Prediction) -> Result<Prediction> {
        PredictionRepository::new(&self.pool).upsert(prediction).await
    }

    async fn list_predictions_for_event(&self, event_id: Uuid) -> Result<Vec<Prediction>> {
        PredictionRepository::new(&self.pool)
            .list_for_event(event_id)
            .await
    }

    async fn replace_event_scores(&self, event_id: Uuid, scores: &[Score]) -> Result<()> {
        ScoreRepository::new(&self.pool)
            .replace_for_event(event_id, scores)
            .await
    }

    async fn list_scores_for_users(&self, user_ids: &[Uuid]) -> Result<Vec<Score>> {
        ScoreRepository::new(&self.pool)
            .list_for_users(user_ids)
            .await
    }
}

#[async_trait]
impl LeagueStore for PgStore {
    async fn get_league(&self, league_id: Uuid) -> Result<Option<League>> {
        LeagueRepository::new(&self.pool).find_by_id(league_id).await
    }

    async fn create_league(&self, league: &League) -> Result<League> {
        LeagueRepository::new(&self.pool).create(league).await
    }

    async fn add_member(&self, league_id: Uuid, member: &LeagueMember) -> Result<()> {
        LeagueRepository::new(&self.pool)
            .add_member(league_id, member)
            .await
    }

    async fn remove_member(&self, league_id: Uuid, user_id: Uuid) -> Result<bool> {
        LeagueRepository::new(&self.pool)
            .remove_member(league_id, user_id)
            .await
    }

    async fn list_leagues_for_user(&self, user_id: Uuid) -> Result<Vec<League>> {
        LeagueRepository::new(&self.pool).list_for_user(user_id).await
    }
}

#[async_trait]
impl RosterSource for PgStore {
    async fn drivers_for_season(&self, season: i32) -> Result<HashSet<DriverNumber>> {
        RosterRepository::new(&self.pool)
            .driver_numbers(season)
            .await
    }
}

#[async_trait]
impl ScheduleStore for PgStore {
    async fn upsert_event(&self, season: i32, event: &ScheduledEvent) -> Result<Event> {
        EventRepository::new(&self.pool).upsert(season, event).await
    }

    async fn upsert_season_driver(&self, season: i32, driver: &RosterEntry) -> Result<()> {
        RosterRepository::new(&self.pool).upsert(season, driver).await
    }
}
