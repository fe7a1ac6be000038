use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use storage::dto::league::CreateLeagueRequest;
use storage::dto::prediction::SubmitPredictionRequest;
use storage::error::{
    EngineError, MembershipError, PreconditionError, StorageError, ValidationError,
};
use storage::models::{DriverNumber, Event, Outcome};
use storage::repository::{InMemoryStore, OutcomeFeed, PredictionStore};
use storage::services::league::{add_member, create_league, leagues_for_user, remove_member};
use storage::services::{
    ScoringPolicy, get_standings, score_event, score_season, submit_prediction,
};

const ORDER: [i32; 10] = [1, 4, 16, 81, 44, 63, 12, 14, 22, 10];
const SWAPPED: [i32; 10] = [4, 1, 16, 81, 44, 63, 12, 14, 22, 10];

#[derive(Default)]
struct StaticFeed {
    outcomes: HashMap<Uuid, Outcome>,
}

impl StaticFeed {
    fn publish(&mut self, event: &Event) {
        self.outcomes.insert(
            event.event_id,
            Outcome {
                event_id: event.event_id,
                finishing_order: drivers(&ORDER),
                pole: DriverNumber(1),
                sprint_winner: None,
                most_pit_stops: DriverNumber(22),
                fastest_lap: DriverNumber(81),
                most_positions_gained: DriverNumber(10),
            },
        );
    }
}

#[async_trait]
impl OutcomeFeed for StaticFeed {
    async fn outcome_for(&self, event: &Event) -> storage::error::Result<Option<Outcome>> {
        Ok(self.outcomes.get(&event.event_id).cloned())
    }
}

fn drivers(numbers: &[i32]) -> Vec<DriverNumber> {
    numbers.iter().copied().map(DriverNumber).collect()
}

fn before_season() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
}

fn event(round: i32) -> Event {
    Event {
        event_id: Uuid::new_v4(),
        season: 2025,
        round,
        name: format!("Grand Prix {round}"),
        country: "Italy".to_string(),
        location: "Monza".to_string(),
        circuit_name: "Autodromo Nazionale Monza".to_string(),
        starts_at: Utc.with_ymd_and_hms(2025, 4, 6, 13, 0, 0).unwrap()
            + Duration::weeks(round as i64),
        has_sprint: false,
    }
}

fn request(event: &Event, order: &[i32], pole: i32) -> SubmitPredictionRequest {
    SubmitPredictionRequest {
        event_id: event.event_id,
        top_ten: drivers(order),
        pole: DriverNumber(pole),
        sprint_winner: None,
        most_pit_stops: DriverNumber(22),
        fastest_lap: DriverNumber(81),
        most_positions_gained: DriverNumber(10),
    }
}

fn named(name: &str) -> CreateLeagueRequest {
    CreateLeagueRequest {
        name: name.to_string(),
    }
}

async fn store_with(events: &[Event]) -> InMemoryStore {
    let store = InMemoryStore::new();
    for event in events {
        store.insert_event(event.clone()).await;
    }
    store.set_roster(2025, drivers(&ORDER)).await;
    store
}

#[tokio::test]
async fn test_submit_then_score_event() {
    let race = event(1);
    let store = store_with(&[race.clone()]).await;
    let mut feed = StaticFeed::default();
    feed.publish(&race);
    let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());

    submit_prediction(&store, &store, alice, &request(&race, &ORDER, 1), before_season())
        .await
        .unwrap();
    submit_prediction(&store, &store, bob, &request(&race, &SWAPPED, 4), before_season())
        .await
        .unwrap();

    let report = score_event(&store, &feed, &ScoringPolicy::default(), race.event_id, Utc::now())
        .await
        .unwrap();
    assert_eq!(report.scored, 2);
    assert_eq!(report.perfect, 1);
    assert_eq!(report.top_total, Some(dec!(80)));

    let scores = store.list_scores_for_users(&[alice, bob]).await.unwrap();
    let total_of = |user| {
        scores
            .iter()
            .find(|s| s.user_id == user)
            .map(|s| s.total())
            .unwrap()
    };
    assert_eq!(total_of(alice), dec!(80));
    // 3 exact in the top five, 5 below, 2 + 2 partial, three category awards
    assert_eq!(total_of(bob), dec!(53));
}

#[tokio::test]
async fn test_edit_keeps_identity_and_marks_update() {
    let race = event(1);
    let store = store_with(&[race.clone()]).await;
    let user = Uuid::new_v4();

    let first = submit_prediction(&store, &store, user, &request(&race, &ORDER, 1), before_season())
        .await
        .unwrap();
    assert!(first.updated_at.is_none());

    let later = before_season() + Duration::days(2);
    let edited = submit_prediction(&store, &store, user, &request(&race, &SWAPPED, 4), later)
        .await
        .unwrap();

    assert_eq!(edited.prediction_id, first.prediction_id);
    assert_eq!(edited.created_at, first.created_at);
    assert_eq!(edited.updated_at, Some(later));
    assert_eq!(edited.pole, DriverNumber(4));
    assert_eq!(store.list_predictions_for_event(race.event_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_edit_after_lock_rejected() {
    let race = event(1);
    let store = store_with(&[race.clone()]).await;
    let user = Uuid::new_v4();
    submit_prediction(&store, &store, user, &request(&race, &ORDER, 1), before_season())
        .await
        .unwrap();

    let late = race.starts_at - Duration::hours(23);
    let err = submit_prediction(&store, &store, user, &request(&race, &SWAPPED, 4), late)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        EngineError::Validation(ValidationError::DeadlinePassed { .. })
    ));
    let stored = store.get_prediction(user, race.event_id).await.unwrap().unwrap();
    assert_eq!(stored.pole, DriverNumber(1));
}

#[tokio::test]
async fn test_unknown_event_is_precondition_failure() {
    let store = store_with(&[]).await;
    let ghost = event(1);

    let prediction = request(&ghost, &ORDER, 1);
    let err = submit_prediction(&store, &store, Uuid::new_v4(), &prediction, before_season())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Precondition(PreconditionError::EventNotFound(id)) if id == ghost.event_id
    ));
}

#[tokio::test]
async fn test_scoring_requires_finalized_outcome() {
    let race = event(1);
    let store = store_with(&[race.clone()]).await;

    let feed = StaticFeed::default();
    let err = score_event(&store, &feed, &ScoringPolicy::default(), race.event_id, Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Precondition(PreconditionError::OutcomeNotFinalized(_))
    ));
}

#[tokio::test]
async fn test_rescoring_replaces_scores() {
    let race = event(1);
    let store = store_with(&[race.clone()]).await;
    let mut feed = StaticFeed::default();
    feed.publish(&race);
    let user = Uuid::new_v4();
    submit_prediction(&store, &store, user, &request(&race, &ORDER, 1), before_season())
        .await
        .unwrap();

    let policy = ScoringPolicy::default();
    score_event(&store, &feed, &policy, race.event_id, Utc::now()).await.unwrap();
    score_event(&store, &feed, &policy, race.event_id, Utc::now()).await.unwrap();

    let scores = store.list_scores_for_users(&[user]).await.unwrap();
    assert_eq!(scores.len(), 1);
    assert_eq!(scores[0].total(), dec!(80));
}

#[tokio::test]
async fn test_season_rescore_builds_streak_in_round_order() {
    let rounds = [event(1), event(2), event(3), event(4)];
    let store = store_with(&rounds).await;
    let mut feed = StaticFeed::default();
    for race in &rounds[..3] {
        feed.publish(race);
    }
    let user = Uuid::new_v4();
    for race in &rounds {
        submit_prediction(&store, &store, user, &request(race, &ORDER, 1), before_season())
            .await
            .unwrap();
    }

    let reports = score_season(&store, &feed, &ScoringPolicy::default(), 2025, Utc::now())
        .await
        .unwrap();

    let rounds_scored: Vec<i32> = reports.iter().map(|r| r.round).collect();
    assert_eq!(rounds_scored, vec![1, 2, 3]);
    let tops: Vec<Option<Decimal>> = reports.iter().map(|r| r.top_total).collect();
    assert_eq!(tops, vec![Some(dec!(80)), Some(dec!(85)), Some(dec!(90))]);
}

#[tokio::test]
async fn test_zero_perfect_bonus_still_counts_perfect_calls() {
    let rounds = [event(1), event(2), event(3)];
    let store = store_with(&rounds).await;
    let mut feed = StaticFeed::default();
    for race in &rounds {
        feed.publish(race);
    }
    let user = Uuid::new_v4();
    let league = create_league(&store, user, &named("Parc Ferme"), before_season())
        .await
        .unwrap();
    for race in &rounds {
        submit_prediction(&store, &store, user, &request(race, &ORDER, 1), before_season())
            .await
            .unwrap();
    }

    let policy = ScoringPolicy {
        perfect_top_ten_bonus: Decimal::ZERO,
        ..ScoringPolicy::default()
    };
    assert_eq!(policy.validate(), Ok(()));
    let reports = score_season(&store, &feed, &policy, 2025, Utc::now()).await.unwrap();

    // streak keeps growing even though the perfect call itself is worth nothing
    let tops: Vec<Option<Decimal>> = reports.iter().map(|r| r.top_total).collect();
    assert_eq!(tops, vec![Some(dec!(60)), Some(dec!(65)), Some(dec!(70))]);
    assert!(reports.iter().all(|r| r.perfect == 1));

    let table = get_standings(&store, &store, league.league_id, Utc::now()).await.unwrap();
    assert_eq!(table.standings[0].perfect_predictions, 3);
    assert_eq!(table.standings[0].total_points, dec!(195));
}

#[tokio::test]
async fn test_league_standings_follow_scores() {
    let race = event(1);
    let store = store_with(&[race.clone()]).await;
    let mut feed = StaticFeed::default();
    feed.publish(&race);
    let (owner, rival, lurker) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    let now = before_season();

    let league = create_league(&store, owner, &named("Tifosi"), now).await.unwrap();
    add_member(&store, league.league_id, rival, now + Duration::hours(1)).await.unwrap();
    add_member(&store, league.league_id, lurker, now + Duration::hours(2)).await.unwrap();

    submit_prediction(&store, &store, owner, &request(&race, &SWAPPED, 4), now).await.unwrap();
    submit_prediction(&store, &store, rival, &request(&race, &ORDER, 1), now).await.unwrap();
    score_event(&store, &feed, &ScoringPolicy::default(), race.event_id, Utc::now())
        .await
        .unwrap();

    let table = get_standings(&store, &store, league.league_id, Utc::now()).await.unwrap();
    assert_eq!(table.league_name, "Tifosi");
    let rows: Vec<(Uuid, u32, Decimal, u32)> = table
        .standings
        .iter()
        .map(|s| (s.user_id, s.position, s.total_points, s.perfect_predictions))
        .collect();
    assert_eq!(
        rows,
        vec![
            (rival, 1, dec!(80), 1),
            (owner, 2, dec!(53), 0),
            (lurker, 3, Decimal::ZERO, 0),
        ]
    );
}

#[tokio::test]
async fn test_membership_rules() {
    let store = store_with(&[]).await;
    let (owner, member, stranger) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    let now = before_season();

    let league = create_league(&store, owner, &named("Backmarkers"), now).await.unwrap();
    let joined = add_member(&store, league.league_id, member, now).await.unwrap();
    let again = add_member(&store, league.league_id, member, now + Duration::days(1))
        .await
        .unwrap();
    assert_eq!(joined.members, again.members);

    let err = remove_member(&store, league.league_id, owner, member).await.unwrap_err();
    assert!(matches!(err, EngineError::Membership(MembershipError::NotOwner)));

    let err = remove_member(&store, league.league_id, owner, owner).await.unwrap_err();
    assert!(matches!(err, EngineError::Membership(MembershipError::OwnerRemoval)));

    let err = remove_member(&store, league.league_id, stranger, owner).await.unwrap_err();
    assert!(matches!(
        err,
        EngineError::Membership(MembershipError::NotMember(id)) if id == stranger
    ));

    assert_eq!(leagues_for_user(&store, member).await.unwrap().len(), 1);
    remove_member(&store, league.league_id, member, owner).await.unwrap();
    assert!(leagues_for_user(&store, member).await.unwrap().is_empty());
    assert_eq!(leagues_for_user(&store, owner).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_league_creation_rules() {
    let store = store_with(&[]).await;
    let owner = Uuid::new_v4();
    let now = before_season();

    let err = create_league(&store, owner, &named("F1"), now).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidRequest(_)));

    create_league(&store, owner, &named("Pit Wall"), now).await.unwrap();
    let err = create_league(&store, Uuid::new_v4(), &named("Pit Wall"), now)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Storage(StorageError::ConstraintViolation(_))
    ));
}

#[tokio::test]
async fn test_standings_for_missing_league() {
    let store = store_with(&[]).await;
    let err = get_standings(&store, &store, Uuid::new_v4(), Utc::now()).await.unwrap_err();
    assert!(matches!(
        err,
        EngineError::Precondition(PreconditionError::LeagueNotFound(_))
    ));
}
