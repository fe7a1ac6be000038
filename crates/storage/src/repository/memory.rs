use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::contract::{LeagueStore, PredictionStore, RosterSource, ScheduleStore};
use crate::dto::schedule::{RosterEntry, ScheduledEvent};
use crate::error::{Result, StorageError};
use crate::models::{DriverNumber, Event, League, LeagueMember, Prediction, Score};

#[derive(Default)]
struct State {
    events: HashMap<Uuid, Event>,
    rosters: HashMap<i32, HashSet<DriverNumber>>,
    predictions: HashMap<(Uuid, Uuid), Prediction>,
    scores: HashMap<Uuid, Score>,
    leagues: HashMap<Uuid, League>,
}

/// Process-local store. Every operation takes the lock once, so upserts and
/// score replacement are atomic with respect to each other.
#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_event(&self, event: Event) {
        self.state.write().await.events.insert(event.event_id, event);
    }

    pub async fn set_roster(&self, season: i32, drivers: impl IntoIterator<Item = DriverNumber>) {
        self.state
            .write()
            .await
            .rosters
            .insert(season, drivers.into_iter().collect());
    }
}

#[async_trait]
impl PredictionStore for InMemoryStore {
    async fn get_event(&self, event_id: Uuid) -> Result<Option<Event>> {
        Ok(self.state.read().await.events.get(&event_id).cloned())
    }

    async fn list_season_events(&self, season: i32) -> Result<Vec<Event>> {
        let state = self.state.read().await;
        let mut events: Vec<Event> = state
            .events
            .values()
            .filter(|e| e.season == season)
            .cloned()
            .collect();
        events.sort_by_key(|e| e.round);
        Ok(events)
    }

    async fn get_prediction(&self, user_id: Uuid, event_id: Uuid) -> Result<Option<Prediction>> {
        Ok(self
            .state
            .read()
            .await
            .predictions
            .get(&(user_id, event_id))
            .cloned())
    }

    async fn upsert_prediction(&self, prediction: &Prediction) -> Result<Prediction> {
        let mut state = self.state.write().await;
        if !state.events.contains_key(&prediction.event_id) {
            return Err(StorageError::ConstraintViolation(
                "Event does not exist".to_string(),
            ));
        }

        let key = (prediction.user_id, prediction.event_id);
        let stored = match state.predictions.get(&key) {
            Some(existing) => Prediction {
                prediction_id: existing.prediction_id,
                created_at: existing.created_at,
                updated_at: prediction.updated_at.or(Some(prediction.created_at)),
                ..prediction.clone()
            },
            None => prediction.clone(),
        };

        state.predictions.insert(key, stored.clone());
        Ok(stored)
    }

    async fn list_predictions_for_event(&self, event_id: Uuid) -> Result<Vec<Prediction>> {
        let state = self.state.read().await;
        let mut predictions: Vec<Prediction> = state
            .predictions
            .values()
            .filter(|p| p.event_id == event_id)
            .cloned()
            .collect();
        predictions.sort_by_key(|p| (p.created_at, p.prediction_id));
        Ok(predictions)
    }

    async fn replace_event_scores(&self, event_id: Uuid, scores: &[Score]) -> Result<()> {
        let mut state = self.state.write().await;
        state.scores.retain(|_, s| s.event_id != event_id);
        for score in scores {
            state.scores.insert(score.prediction_id, score.clone());
        }
        Ok(())
    }

    async fn list_scores_for_users(&self, user_ids: &[Uuid]) -> Result<Vec<Score>> {
        let state = self.state.read().await;
        let mut scores: Vec<Score> = state
            .scores
            .values()
            .filter(|s| user_ids.contains(&s.user_id))
            .cloned()
            .collect();
        scores.sort_by_key(|s| (s.computed_at, s.prediction_id));
        Ok(scores)
    }
}

#[async_trait]
impl LeagueStore for InMemoryStore {
    async fn get_league(&self, league_id: Uuid) -> Result<Option<League>> {
        Ok(self.state.read().await.leagues.get(&league_id).cloned())
    }

    async fn create_league(&self, league: &League) -> Result<League> {
        let mut state = self.state.write().await;
        if state.leagues.values().any(|l| l.name == league.name) {
            return Err(StorageError::ConstraintViolation(
                "League name already exists".to_string(),
            ));
        }
        state.leagues.insert(league.league_id, league.clone());
        Ok(league.clone())
    }

    async fn add_member(&self, league_id: Uuid, member: &LeagueMember) -> Result<()> {
        let mut state = self.state.write().await;
        let league = state
            .leagues
            .get_mut(&league_id)
            .ok_or(StorageError::NotFound)?;
        if !league.is_member(member.user_id) {
            league.members.push(member.clone());
        }
        Ok(())
    }

    async fn remove_member(&self, league_id: Uuid, user_id: Uuid) -> Result<bool> {
        let mut state = self.state.write().await;
        let league = state
            .leagues
            .get_mut(&league_id)
            .ok_or(StorageError::NotFound)?;
        let before = league.members.len();
        league.members.retain(|m| m.user_id != user_id);
        Ok(league.members.len() < before)
    }

    async fn list_leagues_for_user(&self, user_id: Uuid) -> Result<Vec<League>> {
        let state = self.state.read().await;
        let mut leagues: Vec<League> = state
            .leagues
            .values()
            .filter(|l| l.is_member(user_id))
            .cloned()
            .collect();
        leagues.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(leagues)
    }
}

#[async_trait]
impl RosterSource for InMemoryStore {
    async fn drivers_for_season(&self, season: i32) -> Result<HashSet<DriverNumber>> {
        Ok(self
            .state
            .read()
            .await
            .rosters
            .get(&season)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl ScheduleStore for InMemoryStore {
    async fn upsert_event(&self, season: i32, event: &ScheduledEvent) -> Result<Event> {
        let mut state = self.state.write().await;
        let event_id = state
            .events
            .values()
            .find(|e| e.season == season && e.round == event.round)
            .map(|e| e.event_id)
            .unwrap_or_else(Uuid::new_v4);

        let stored = Event {
            event_id,
            season,
            round: event.round,
            name: event.name.clone(),
            country: event.country.clone(),
            location: event.location.clone(),
            circuit_name: event.circuit_name.clone(),
            starts_at: event.starts_at,
            has_sprint: event.has_sprint,
        };
        state.events.insert(event_id, stored.clone());
        Ok(stored)
    }

    async fn upsert_season_driver(&self, season: i32, driver: &RosterEntry) -> Result<()> {
        self.state
            .write()
            .await
            .rosters
            .entry(season)
            .or_default()
            .insert(driver.driver_number);
        Ok(())
    }
}
