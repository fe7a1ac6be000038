use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info};
use uuid::Uuid;

use super::policy::ScoringPolicy;
use super::scoring::score_batch;
use super::standings::standings;
use super::streak::StreakTracker;
use super::validation::validate_submission;
use crate::dto::league::LeagueStandingsResponse;
use crate::dto::prediction::SubmitPredictionRequest;
use crate::dto::score::EventScoringReport;
use crate::error::{EngineResult, PreconditionError};
use crate::models::{Event, Outcome, Prediction};
use crate::repository::{LeagueStore, OutcomeFeed, PredictionStore, RosterSource};

/// Validates and stores `user_id`'s prediction for the request's event.
///
/// A second submission for the same event replaces the first, keeping its id
/// and creation time.
pub async fn submit_prediction<S, R>(
    store: &S,
    roster: &R,
    user_id: Uuid,
    request: &SubmitPredictionRequest,
    now: DateTime<Utc>,
) -> EngineResult<Prediction>
where
    S: PredictionStore + ?Sized,
    R: RosterSource + ?Sized,
{
    let event = store
        .get_event(request.event_id)
        .await?
        .ok_or(PreconditionError::EventNotFound(request.event_id))?;

    let drivers = roster.drivers_for_season(event.season).await?;
    let validated = validate_submission(request, &event, &drivers, now)?;

    let existing = store.get_prediction(user_id, event.event_id).await?;
    let prediction = validated.into_prediction(user_id, existing.as_ref(), now);
    let stored = store.upsert_prediction(&prediction).await?;

    debug!(
        user_id = %user_id,
        event_id = %event.event_id,
        edit = existing.is_some(),
        "Stored prediction"
    );

    Ok(stored)
}

/// Scores every prediction of an event and replaces its previous scores.
pub async fn score_event<S, F>(
    store: &S,
    feed: &F,
    policy: &ScoringPolicy,
    event_id: Uuid,
    now: DateTime<Utc>,
) -> EngineResult<EventScoringReport>
where
    S: PredictionStore + ?Sized,
    F: OutcomeFeed + ?Sized,
{
    let event = store
        .get_event(event_id)
        .await?
        .ok_or(PreconditionError::EventNotFound(event_id))?;

    let outcome = feed
        .outcome_for(&event)
        .await?
        .ok_or(PreconditionError::OutcomeNotFinalized(event_id))?;

    score_with_outcome(store, policy, &event, &outcome, now).await
}

/// Rescores a whole season in round order, skipping rounds whose outcome is
/// not available yet. Each round is written before the next is scored, so
/// streaks see corrected results.
pub async fn score_season<S, F>(
    store: &S,
    feed: &F,
    policy: &ScoringPolicy,
    season: i32,
    now: DateTime<Utc>,
) -> EngineResult<Vec<EventScoringReport>>
where
    S: PredictionStore + ?Sized,
    F: OutcomeFeed + ?Sized,
{
    let mut events = store.list_season_events(season).await?;
    events.sort_by_key(|e| e.round);

    let mut reports = Vec::with_capacity(events.len());
    for event in &events {
        match feed.outcome_for(event).await? {
            Some(outcome) => {
                reports.push(score_with_outcome(store, policy, event, &outcome, now).await?);
            }
            None => debug!(season, round = event.round, "No outcome yet, skipping"),
        }
    }

    info!(season, events = reports.len(), "Season rescored");
    Ok(reports)
}

async fn score_with_outcome<S>(
    store: &S,
    policy: &ScoringPolicy,
    event: &Event,
    outcome: &Outcome,
    now: DateTime<Utc>,
) -> EngineResult<EventScoringReport>
where
    S: PredictionStore + ?Sized,
{
    let predictions = store.list_predictions_for_event(event.event_id).await?;

    let user_ids: Vec<Uuid> = predictions.iter().map(|p| p.user_id).collect();
    let history = if user_ids.is_empty() {
        Vec::new()
    } else {
        store.list_scores_for_users(&user_ids).await?
    };
    let calendar = store.list_season_events(event.season).await?;
    let tracker = StreakTracker::new(&calendar, &history);

    let scores = score_batch(policy, event, outcome, &predictions, &tracker, now);
    store.replace_event_scores(event.event_id, &scores).await?;

    let report = EventScoringReport {
        event_id: event.event_id,
        season: event.season,
        round: event.round,
        scored: scores.len(),
        perfect: scores.iter().filter(|s| s.is_perfect()).count(),
        top_total: scores.iter().map(|s| s.total()).max(),
    };

    info!(
        season = event.season,
        round = event.round,
        scored = report.scored,
        perfect = report.perfect,
        top_total = %report.top_total.unwrap_or(Decimal::ZERO),
        "Event scored"
    );

    Ok(report)
}

/// Builds the league table from the members' current scores.
pub async fn get_standings<L, S>(
    leagues: &L,
    store: &S,
    league_id: Uuid,
    now: DateTime<Utc>,
) -> EngineResult<LeagueStandingsResponse>
where
    L: LeagueStore + ?Sized,
    S: PredictionStore + ?Sized,
{
    let league = leagues
        .get_league(league_id)
        .await?
        .ok_or(PreconditionError::LeagueNotFound(league_id))?;

    let scores = store.list_scores_for_users(&league.member_ids()).await?;
    let table = standings(&league, &scores);

    Ok(LeagueStandingsResponse {
        league_id: league.league_id,
        league_name: league.name,
        standings: table,
        last_updated: now,
    })
}
